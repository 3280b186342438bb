//! Contract identifiers
//!
//! A contract names an abstract capability (e.g. `IWriter`). Contracts are
//! never declared up front; any contract a discovered type claims to
//! implement becomes a key of the binding table.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ContractError {
    #[error("Contract name must not be empty")]
    Empty,

    #[error("Contract name must not contain whitespace: '{0}'")]
    Whitespace(String),
}

/// Identifier of an abstract capability
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Contract(String);

impl Contract {
    /// Creates a contract, validating the name
    pub fn new(name: impl Into<String>) -> Result<Self, ContractError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ContractError::Empty);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(ContractError::Whitespace(name));
        }
        Ok(Self(name))
    }

    /// Returns the contract name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl FromStr for Contract {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for Contract {
    type Error = ContractError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Contract> for String {
    fn from(contract: Contract) -> Self {
        contract.0
    }
}

impl Borrow<str> for Contract {
    fn borrow(&self) -> &str {
        &self.0
    }
}
