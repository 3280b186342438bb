//! Registration of a finished binding table

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::binding::BindingTable;
use crate::domain::{Contract, TypeRef};

use super::resolver::{ContainerError, ResolutionContainer};

/// One binding the container refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationFailure {
    pub contract: Contract,
    pub implementation: TypeRef,
    pub reason: ContainerError,
}

impl fmt::Display for RegistrationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: {}", self.contract, self.implementation, self.reason)
    }
}

/// Every rejected binding from one [`apply`] pass
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{} registration(s) failed: {}", .failures.len(), join(.failures))]
pub struct RegistrationError {
    pub failures: Vec<RegistrationFailure>,
}

fn join(failures: &[RegistrationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Registers every binding in `table` into `container`
///
/// A rejected binding does not stop the pass; all rejections are returned
/// together so they can be fixed in one go. Returns the number of bindings
/// registered.
pub fn apply<C>(table: &BindingTable, container: &mut C) -> Result<usize, RegistrationError>
where
    C: ResolutionContainer + ?Sized,
{
    let mut registered = 0;
    let mut failures = Vec::new();

    for binding in table {
        let implementation = binding.implementation();
        match container.register(binding.contract(), implementation) {
            Ok(()) => registered += 1,
            Err(reason) => {
                warn!(
                    contract = %binding.contract(),
                    implementation = %implementation.name,
                    error = %reason,
                    "container rejected binding"
                );
                failures.push(RegistrationFailure {
                    contract: binding.contract().clone(),
                    implementation: implementation.type_ref(),
                    reason,
                });
            }
        }
    }

    info!(registered, failed = failures.len(), "registration complete");

    if failures.is_empty() {
        Ok(registered)
    } else {
        Err(RegistrationError { failures })
    }
}
