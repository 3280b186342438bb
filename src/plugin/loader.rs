//! Module discovery and loading
//!
//! Every regular file directly inside the plugin directory is a candidate
//! module, whatever its extension. Each file is handed to a
//! [`ModuleLoader`]; a file that fails to load is recorded and skipped so
//! one bad module never stops the scan.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DiscoveryConfig;
use crate::domain::DiscoveredType;

/// Fatal discovery errors
#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("Plugin directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Failed to read plugin directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Why a single module could not be loaded
#[derive(Debug, Error)]
pub enum ModuleLoadError {
    #[error("not a plugwire module")]
    NotAModule,

    #[error("failed to open library: {0}")]
    Open(String),

    #[error("symbol '{symbol}' not found: {reason}")]
    MissingSymbol { symbol: &'static str, reason: String },

    #[error("ABI version mismatch: host expects {expected}, module reports {found}")]
    AbiMismatch { expected: u32, found: u32 },

    #[error("invalid type declarations: {}", .0.join("; "))]
    InvalidDeclaration(Vec<String>),

    #[error("module panicked while loading: {0}")]
    Panicked(String),
}

/// Loads a module file and reports the types it defines
///
/// Loading a module runs its static initialization code (for native
/// libraries: constructors and the registration function). Callers should
/// only point a loader at directories they trust; loaded code runs with
/// the full privileges of the host process.
pub trait ModuleLoader {
    /// Returns every type the module defines, including private and
    /// abstract ones. Filtering happens in [`discover`].
    fn load_types_from(&self, path: &Path) -> Result<Vec<DiscoveredType>, ModuleLoadError>;
}

impl<L: ModuleLoader + ?Sized> ModuleLoader for Box<L> {
    fn load_types_from(&self, path: &Path) -> Result<Vec<DiscoveredType>, ModuleLoadError> {
        (**self).load_types_from(path)
    }
}

impl<L: ModuleLoader + ?Sized> ModuleLoader for &L {
    fn load_types_from(&self, path: &Path) -> Result<Vec<DiscoveredType>, ModuleLoadError> {
        (**self).load_types_from(path)
    }
}

/// Outcome of loading one module file
#[derive(Debug, Clone, Serialize)]
pub struct ModuleRecord {
    /// Path to the module file
    pub path: PathBuf,

    pub loaded_successfully: bool,

    /// Eligible types yielded from this module
    pub types_found: usize,

    /// Private or abstract types that were observed and dropped
    pub types_skipped: usize,

    /// Load failure, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of scanning a plugin directory
#[derive(Debug, Default)]
pub struct Discovery {
    modules: Vec<ModuleRecord>,
    types: Vec<DiscoveredType>,
}

impl Discovery {
    /// Eligible types in module order, then type order
    pub fn types(&self) -> impl Iterator<Item = &DiscoveredType> {
        self.types.iter()
    }

    pub fn into_types(self) -> Vec<DiscoveredType> {
        self.types
    }

    /// Splits into module records and types
    pub fn into_parts(self) -> (Vec<ModuleRecord>, Vec<DiscoveredType>) {
        (self.modules, self.types)
    }

    /// Every module file that was attempted
    pub fn modules(&self) -> &[ModuleRecord] {
        &self.modules
    }

    /// Modules that failed to load
    pub fn failures(&self) -> impl Iterator<Item = &ModuleRecord> {
        self.modules.iter().filter(|m| !m.loaded_successfully)
    }
}

/// Discovers eligible types in `dir` with default options (sorted)
pub fn discover(dir: &Path, loader: &dyn ModuleLoader) -> Result<Discovery, DiscoverError> {
    discover_with(dir, loader, &DiscoveryConfig::default())
}

/// Discovers eligible types in `dir`
///
/// With `options.sort` set, module files are processed in file-name order
/// and types within a module in type-name order, making downstream
/// binding reproducible across runs and platforms.
pub fn discover_with(
    dir: &Path,
    loader: &dyn ModuleLoader,
    options: &DiscoveryConfig,
) -> Result<Discovery, DiscoverError> {
    if !dir.is_dir() {
        return Err(DiscoverError::DirectoryNotFound(dir.to_path_buf()));
    }

    let files = module_files(dir, options.sort)?;
    debug!(dir = %dir.display(), candidates = files.len(), "scanning plugin directory");

    let mut discovery = Discovery::default();

    for path in files {
        match loader.load_types_from(&path) {
            Ok(mut types) => {
                if options.sort {
                    types.sort_by(|a, b| a.name.cmp(&b.name));
                }

                let total = types.len();
                let mut found = 0;
                for ty in types {
                    if ty.is_eligible() {
                        debug!(module = %path.display(), ty = %ty.name, "discovered type");
                        discovery.types.push(ty);
                        found += 1;
                    } else {
                        debug!(
                            module = %path.display(),
                            ty = %ty.name,
                            public = ty.is_public(),
                            is_abstract = ty.is_abstract,
                            "skipping non-instantiable type"
                        );
                    }
                }

                discovery.modules.push(ModuleRecord {
                    path,
                    loaded_successfully: true,
                    types_found: found,
                    types_skipped: total - found,
                    error: None,
                });
            }
            Err(e) => {
                warn!(module = %path.display(), error = %e, "skipping module that failed to load");
                discovery.modules.push(ModuleRecord {
                    path,
                    loaded_successfully: false,
                    types_found: 0,
                    types_skipped: 0,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    info!(
        modules = discovery.modules.len(),
        failed = discovery.failures().count(),
        types = discovery.types.len(),
        "discovery complete"
    );

    Ok(discovery)
}

/// Lists regular files directly inside `dir`
fn module_files(dir: &Path, sort: bool) -> Result<Vec<PathBuf>, DiscoverError> {
    let entries = std::fs::read_dir(dir).map_err(|source| DiscoverError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = readable_entries(dir, entries.map(|e| e.map(|entry| entry.path())))
        .filter(|path| path.is_file())
        .collect();

    if sort {
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    }

    Ok(files)
}

/// Drops directory entries that could not be read, logging each one
fn readable_entries<'a, I>(dir: &'a Path, entries: I) -> impl Iterator<Item = PathBuf> + 'a
where
    I: Iterator<Item = io::Result<PathBuf>> + 'a,
{
    entries.filter_map(move |entry| match entry {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
            None
        }
    })
}
