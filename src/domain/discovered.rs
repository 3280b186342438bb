//! Types found inside loaded modules

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::Contract;

/// Factory that builds a fresh value of a concrete type
pub type Constructor = Arc<dyn Fn() -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// Visibility a module declares for one of its types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// A type observed in a loaded module
///
/// Only public, non-abstract types are eligible to implement a contract.
/// The loader filters everything else out before binding.
#[derive(Clone)]
pub struct DiscoveredType {
    /// Type name as declared by the module
    pub name: String,

    /// Path of the module that defines this type
    pub module: PathBuf,

    pub visibility: Visibility,

    pub is_abstract: bool,

    /// Contracts this type directly implements
    pub contracts: BTreeSet<Contract>,

    /// Factory used by the container; `None` means the type cannot be built
    pub constructor: Option<Constructor>,
}

impl DiscoveredType {
    /// Creates a public, concrete type with no contracts
    pub fn new(name: impl Into<String>, module: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            visibility: Visibility::Public,
            is_abstract: false,
            contracts: BTreeSet::new(),
            constructor: None,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn as_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Adds a contract this type implements
    pub fn implementing(mut self, contract: Contract) -> Self {
        self.contracts.insert(contract);
        self
    }

    /// Sets the factory used to build values of this type
    pub fn with_constructor<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Any + Send + Sync> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(factory));
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// Returns true if this type may become a contract implementation
    pub fn is_eligible(&self) -> bool {
        self.is_public() && !self.is_abstract
    }

    pub fn module(&self) -> &Path {
        &self.module
    }

    /// Returns a lightweight, serializable reference to this type
    pub fn type_ref(&self) -> TypeRef {
        TypeRef {
            name: self.name.clone(),
            module: self.module.clone(),
        }
    }

    /// Builds a new value, if the type has a constructor
    pub fn construct(&self) -> Option<Box<dyn Any + Send + Sync>> {
        self.constructor.as_ref().map(|ctor| ctor())
    }
}

impl fmt::Debug for DiscoveredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveredType")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("visibility", &self.visibility)
            .field("is_abstract", &self.is_abstract)
            .field("contracts", &self.contracts)
            .field("constructible", &self.constructor.is_some())
            .finish()
    }
}

/// Name and defining module of a type, used in reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    pub module: PathBuf,
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let module = self
            .module
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| self.module.to_string_lossy());
        write!(f, "{} ({})", self.name, module)
    }
}
