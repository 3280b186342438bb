//! In-process resolution container

use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::domain::{Constructor, Contract, DiscoveredType, TypeRef};

use super::instance::{short_type_name, Instance};

/// Why the container refused a registration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContainerError {
    #[error("type '{implementation}' has no constructor")]
    NotConstructible { implementation: String },

    #[error("contract '{contract}' is already registered to '{existing}'")]
    AlreadyRegistered { contract: Contract, existing: String },
}

/// Errors from resolving a contract
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("No implementation registered for contract '{0}'")]
    NotRegistered(String),

    #[error("Contract '{contract}' resolved to '{implementation}', which is not a {expected}")]
    TypeMismatch {
        contract: String,
        implementation: String,
        expected: &'static str,
    },
}

/// Something that accepts contract registrations
///
/// Implementors decide whether an implementation is acceptable; a rejected
/// pair is reported back to the registration sink.
pub trait ResolutionContainer {
    fn register(
        &mut self,
        contract: &Contract,
        implementation: &DiscoveredType,
    ) -> Result<(), ContainerError>;
}

struct Registration {
    implementation: TypeRef,
    constructor: Constructor,
}

/// Maps contracts to constructors and builds instances on request
///
/// Every [`resolve`](Self::resolve) call constructs a new value.
#[derive(Default)]
pub struct Container {
    registrations: HashMap<Contract, Registration>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs an instance of the implementation bound to `contract`
    pub fn resolve(&self, contract: &str) -> Result<Instance, ResolveError> {
        let registration = self
            .registrations
            .get(contract)
            .ok_or_else(|| ResolveError::NotRegistered(contract.to_string()))?;

        debug!(contract, implementation = %registration.implementation.name, "resolving");
        let value = (registration.constructor)();
        Ok(Instance::new(registration.implementation.clone(), value))
    }

    /// Resolves and downcasts to a concrete Rust type
    pub fn resolve_as<T: Any>(&self, contract: &str) -> Result<Box<T>, ResolveError> {
        self.resolve(contract)?
            .downcast::<T>()
            .map_err(|instance| ResolveError::TypeMismatch {
                contract: contract.to_string(),
                implementation: instance.implementation().to_string(),
                expected: short_type_name::<T>(),
            })
    }

    pub fn contains(&self, contract: &str) -> bool {
        self.registrations.contains_key(contract)
    }

    /// Type registered for `contract`
    pub fn implementation_of(&self, contract: &str) -> Option<&TypeRef> {
        self.registrations.get(contract).map(|r| &r.implementation)
    }

    /// Registered contracts, sorted by name
    pub fn contracts(&self) -> Vec<&Contract> {
        let mut contracts: Vec<_> = self.registrations.keys().collect();
        contracts.sort();
        contracts
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl ResolutionContainer for Container {
    fn register(
        &mut self,
        contract: &Contract,
        implementation: &DiscoveredType,
    ) -> Result<(), ContainerError> {
        if let Some(existing) = self.registrations.get(contract) {
            return Err(ContainerError::AlreadyRegistered {
                contract: contract.clone(),
                existing: existing.implementation.name.clone(),
            });
        }

        let constructor = implementation
            .constructor
            .clone()
            .ok_or_else(|| ContainerError::NotConstructible {
                implementation: implementation.name.clone(),
            })?;

        self.registrations.insert(
            contract.clone(),
            Registration {
                implementation: implementation.type_ref(),
                constructor,
            },
        );
        Ok(())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("count", &self.registrations.len())
            .field("contracts", &self.contracts())
            .finish()
    }
}
