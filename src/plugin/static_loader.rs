//! Compiled-in module registry
//!
//! Maps module file names to registration functions linked into the host.
//! Useful when plugins are built statically, and for exercising the whole
//! pipeline without compiling shared libraries.

use std::collections::HashMap;
use std::path::Path;

use crate::domain::DiscoveredType;

use super::loader::{ModuleLoadError, ModuleLoader};
use super::registrar::{run_registration, ModuleRegistrar};

type RegisterFn = Box<dyn Fn(&mut ModuleRegistrar) + Send + Sync>;

/// Loader backed by registration functions known at compile time
///
/// A file in the plugin directory "loads" when its file name matches a
/// registered module; any other file fails with
/// [`ModuleLoadError::NotAModule`].
#[derive(Default)]
pub struct StaticModuleLoader {
    modules: HashMap<String, RegisterFn>,
}

impl StaticModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a module under the given file name
    pub fn register_module<F>(&mut self, file_name: impl Into<String>, register: F)
    where
        F: Fn(&mut ModuleRegistrar) + Send + Sync + 'static,
    {
        self.modules.insert(file_name.into(), Box::new(register));
    }

    /// Builder form of [`register_module`](Self::register_module)
    pub fn with_module<F>(mut self, file_name: impl Into<String>, register: F) -> Self
    where
        F: Fn(&mut ModuleRegistrar) + Send + Sync + 'static,
    {
        self.register_module(file_name, register);
        self
    }

    pub fn contains(&self, file_name: &str) -> bool {
        self.modules.contains_key(file_name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleLoader for StaticModuleLoader {
    fn load_types_from(&self, path: &Path) -> Result<Vec<DiscoveredType>, ModuleLoadError> {
        let register = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|name| self.modules.get(name))
            .ok_or(ModuleLoadError::NotAModule)?;

        run_registration(path, |registrar| register(registrar))
    }
}

impl std::fmt::Debug for StaticModuleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.modules.keys().collect();
        names.sort();
        f.debug_struct("StaticModuleLoader")
            .field("modules", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_file_is_not_a_module() {
        let loader = StaticModuleLoader::new();
        let err = loader.load_types_from(Path::new("/plugins/random.bin")).unwrap_err();
        assert!(matches!(err, ModuleLoadError::NotAModule));
    }

    #[test]
    fn registered_module_yields_types() {
        let loader = StaticModuleLoader::new().with_module("writers.so", |r| {
            r.public_type("JsonWriter").implements("IWriter");
        });

        assert!(loader.contains("writers.so"));
        let types = loader.load_types_from(Path::new("/plugins/writers.so")).unwrap();
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].module, Path::new("/plugins/writers.so"));
    }

    #[test]
    fn module_may_be_loaded_from_any_directory() {
        let loader = StaticModuleLoader::new().with_module("m.so", |r| {
            r.public_type("A");
        });

        assert!(loader.load_types_from(Path::new("one/m.so")).is_ok());
        assert!(loader.load_types_from(Path::new("two/m.so")).is_ok());
    }
}
