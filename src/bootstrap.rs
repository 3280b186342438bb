//! Start-up wiring: discover, bind, register
//!
//! [`Bootstrapper`] owns the application container and runs the three
//! stages in order over a plugin directory. Module load failures and
//! contract conflicts are reported, not fatal; a missing directory or a
//! rejected registration stops the run.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::binding::{bind, BindingSummary, Conflict};
use crate::config::Config;
use crate::container::{apply, Container, RegistrationError};
use crate::plugin::{discover_with, DiscoverError, ModuleLoader, ModuleRecord};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Discover(#[from] DiscoverError),

    #[error("{} contract conflict(s) found and conflicts are denied: {}", .0.len(), describe(.0))]
    ConflictsDenied(Vec<Conflict>),

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

fn describe(conflicts: &[Conflict]) -> String {
    conflicts
        .iter()
        .map(|c| format!("{} claimed by {} and {}", c.contract, c.winner, c.discarded))
        .collect::<Vec<_>>()
        .join("; ")
}

/// What a bootstrap run did
#[derive(Debug, Clone, Serialize)]
pub struct BootstrapReport {
    /// Every module file that was attempted
    pub modules: Vec<ModuleRecord>,

    pub bindings: Vec<BindingSummary>,

    /// Candidates discarded because a contract was already bound
    pub conflicts: Vec<Conflict>,

    /// Number of bindings registered into the container
    pub registered: usize,
}

impl BootstrapReport {
    pub fn failed_modules(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.iter().filter(|m| !m.loaded_successfully)
    }
}

/// Loads plugins from a directory into an application container
pub struct Bootstrapper<L> {
    loader: L,
    config: Config,
    container: Container,
}

impl<L: ModuleLoader> Bootstrapper<L> {
    pub fn new(loader: L) -> Self {
        Self::with_config(loader, Config::default())
    }

    pub fn with_config(loader: L, config: Config) -> Self {
        Self {
            loader,
            config,
            container: Container::new(),
        }
    }

    /// Discovers, binds and registers every module in `dir`
    ///
    /// Loading runs each module's initialization code.
    pub fn register_modules_from(&mut self, dir: &Path) -> Result<BootstrapReport, BootstrapError> {
        info!(dir = %dir.display(), "registering modules");

        let discovery = discover_with(dir, &self.loader, &self.config.discovery)?;
        let (modules, types) = discovery.into_parts();

        let table = bind(types);
        if self.config.binding.deny_conflicts && table.has_conflicts() {
            return Err(BootstrapError::ConflictsDenied(table.conflicts().to_vec()));
        }

        let registered = apply(&table, &mut self.container)?;

        Ok(BootstrapReport {
            modules,
            bindings: table.summaries(),
            conflicts: table.conflicts().to_vec(),
            registered,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn into_container(self) -> Container {
        self.container
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BindingConfig;
    use crate::plugin::StaticModuleLoader;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Plain;

    fn dir_with(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for f in files {
            fs::write(dir.path().join(f), b"").unwrap();
        }
        dir
    }

    fn competing_loader() -> StaticModuleLoader {
        StaticModuleLoader::new()
            .with_module("a.so", |r| {
                r.public_type("First").implements("IThing").constructs::<Plain>();
            })
            .with_module("b.so", |r| {
                r.public_type("Second").implements("IThing").constructs::<Plain>();
            })
    }

    #[test]
    fn missing_directory_stops_run() {
        let dir = TempDir::new().unwrap();
        let mut boot = Bootstrapper::new(StaticModuleLoader::new());

        let err = boot.register_modules_from(&dir.path().join("gone")).unwrap_err();
        assert!(matches!(err, BootstrapError::Discover(DiscoverError::DirectoryNotFound(_))));
        assert!(boot.container().is_empty());
    }

    #[test]
    fn conflicts_are_reported_by_default() {
        let dir = dir_with(&["a.so", "b.so"]);
        let mut boot = Bootstrapper::new(competing_loader());

        let report = boot.register_modules_from(dir.path()).unwrap();
        assert_eq!(report.registered, 1);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].winner.name, "First");
        assert_eq!(boot.container().resolve("IThing").unwrap().implementation(), "First");
    }

    #[test]
    fn conflicts_can_be_denied() {
        let dir = dir_with(&["a.so", "b.so"]);
        let config = Config {
            binding: BindingConfig {
                deny_conflicts: true,
            },
            ..Config::default()
        };
        let mut boot = Bootstrapper::with_config(competing_loader(), config);

        let err = boot.register_modules_from(dir.path()).unwrap_err();
        match err {
            BootstrapError::ConflictsDenied(conflicts) => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].discarded.name, "Second");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(boot.container().is_empty());
    }

    #[test]
    fn registration_failures_surface_together() {
        let dir = dir_with(&["m.so"]);
        let loader = StaticModuleLoader::new().with_module("m.so", |r| {
            r.public_type("NoCtorA").implements("IA");
            r.public_type("NoCtorB").implements("IB");
        });
        let mut boot = Bootstrapper::new(loader);

        let err = boot.register_modules_from(dir.path()).unwrap_err();
        match err {
            BootstrapError::Registration(e) => assert_eq!(e.failures.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn report_lists_failed_modules() {
        let dir = dir_with(&["a.so", "readme.txt"]);
        let mut boot = Bootstrapper::new(competing_loader());

        let report = boot.register_modules_from(dir.path()).unwrap();
        let failed: Vec<_> = report.failed_modules().collect();
        assert_eq!(failed.len(), 1);
        assert!(failed[0].path.ends_with("readme.txt"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["registered"], 1);
        assert_eq!(json["bindings"][0]["contract"], "IThing");
    }
}
