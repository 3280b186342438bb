//! Type declarations made by module code
//!
//! A module describes its types through a [`ModuleRegistrar`]. This replaces
//! runtime reflection: the module states up front which types it defines,
//! their visibility, and the contracts each one implements.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::{Contract, DiscoveredType, Visibility};

use super::loader::ModuleLoadError;

/// Collects the types a module declares while it is being loaded
pub struct ModuleRegistrar {
    module: PathBuf,
    types: Vec<DiscoveredType>,
    errors: Vec<String>,
}

impl ModuleRegistrar {
    pub(crate) fn new(module: impl Into<PathBuf>) -> Self {
        Self {
            module: module.into(),
            types: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Path of the module being registered
    pub fn module(&self) -> &Path {
        &self.module
    }

    /// Declares a public, concrete type
    pub fn public_type(&mut self, name: &str) -> TypeBuilder<'_> {
        self.declare(name, Visibility::Public, false)
    }

    /// Declares a type that is not visible outside the module
    pub fn private_type(&mut self, name: &str) -> TypeBuilder<'_> {
        self.declare(name, Visibility::Private, false)
    }

    /// Declares a public type that cannot be instantiated
    pub fn abstract_type(&mut self, name: &str) -> TypeBuilder<'_> {
        self.declare(name, Visibility::Public, true)
    }

    fn declare(&mut self, name: &str, visibility: Visibility, is_abstract: bool) -> TypeBuilder<'_> {
        let name = name.trim();
        if name.is_empty() {
            self.errors.push("type declared with an empty name".to_string());
        } else if self.types.iter().any(|t| t.name == name) {
            self.errors.push(format!("type '{}' declared twice", name));
        }

        let mut ty = DiscoveredType::new(name, self.module.clone()).with_visibility(visibility);
        if is_abstract {
            ty = ty.as_abstract();
        }
        self.types.push(ty);

        let index = self.types.len() - 1;
        TypeBuilder {
            registrar: self,
            index,
        }
    }

    /// Consumes the registrar, returning the declared types or every
    /// declaration problem found
    fn finish(self) -> Result<Vec<DiscoveredType>, ModuleLoadError> {
        if self.errors.is_empty() {
            Ok(self.types)
        } else {
            Err(ModuleLoadError::InvalidDeclaration(self.errors))
        }
    }
}

/// Builder for a single declared type
pub struct TypeBuilder<'a> {
    registrar: &'a mut ModuleRegistrar,
    index: usize,
}

impl<'a> TypeBuilder<'a> {
    /// Adds a contract this type implements
    pub fn implements(self, contract: &str) -> Self {
        match Contract::new(contract) {
            Ok(contract) => {
                self.registrar.types[self.index].contracts.insert(contract);
            }
            Err(e) => {
                let name = self.registrar.types[self.index].name.clone();
                self.registrar.errors.push(format!("type '{}': {}", name, e));
            }
        }
        self
    }

    /// Sets the factory the container uses to build this type
    pub fn constructor<F>(self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Any + Send + Sync> + Send + Sync + 'static,
    {
        let ty = &mut self.registrar.types[self.index];
        ty.constructor = Some(Arc::new(factory));
        self
    }

    /// Uses `T::default()` as the factory
    pub fn constructs<T>(self) -> Self
    where
        T: Default + Any + Send + Sync,
    {
        self.constructor(|| Box::new(T::default()))
    }
}

/// Runs module registration code, turning declaration errors and panics
/// into a load failure for that module
pub(crate) fn run_registration<F>(module: &Path, register: F) -> Result<Vec<DiscoveredType>, ModuleLoadError>
where
    F: FnOnce(&mut ModuleRegistrar),
{
    let mut registrar = ModuleRegistrar::new(module);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| register(&mut registrar)));

    match outcome {
        Ok(()) => registrar.finish(),
        Err(payload) => Err(ModuleLoadError::Panicked(panic_message(payload.as_ref()))),
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct JsonWriter;

    fn register(module: &str, f: impl FnOnce(&mut ModuleRegistrar)) -> Result<Vec<DiscoveredType>, ModuleLoadError> {
        run_registration(Path::new(module), f)
    }

    #[test]
    fn declares_types_in_order() {
        let types = register("writers.so", |r| {
            r.public_type("JsonWriter").implements("IWriter").constructs::<JsonWriter>();
            r.abstract_type("BaseWriter").implements("IWriter");
            r.private_type("Buffer");
        })
        .unwrap();

        assert_eq!(types.len(), 3);
        assert_eq!(types[0].name, "JsonWriter");
        assert!(types[0].is_eligible());
        assert!(types[0].constructor.is_some());
        assert!(types[1].is_abstract);
        assert_eq!(types[2].visibility, Visibility::Private);
        assert!(types.iter().all(|t| t.module == Path::new("writers.so")));
    }

    #[test]
    fn invalid_contract_fails_module() {
        let err = register("m.so", |r| {
            r.public_type("Broken").implements("not valid");
        })
        .unwrap_err();

        match err {
            ModuleLoadError::InvalidDeclaration(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("Broken"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_type_name_fails_module() {
        let err = register("m.so", |r| {
            r.public_type("Twice");
            r.public_type("Twice");
        })
        .unwrap_err();

        assert!(err.to_string().contains("declared twice"));
    }

    #[test]
    fn panic_in_registration_is_caught() {
        let err = register("m.so", |_| panic!("static init exploded")).unwrap_err();
        assert!(matches!(err, ModuleLoadError::Panicked(ref msg) if msg == "static init exploded"));
    }

    #[test]
    fn constructor_builds_declared_type() {
        let types = register("m.so", |r| {
            r.public_type("Answer").constructor(|| Box::new(42i64));
        })
        .unwrap();

        let value = types[0].construct().unwrap();
        assert_eq!(value.downcast_ref::<i64>(), Some(&42));
    }
}
