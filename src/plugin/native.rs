//! Native module loading from shared libraries
//!
//! Only available with the `dynamic-loading` feature.
//!
//! Opening a library runs its static constructors, and the registration
//! function runs arbitrary plugin code. Libraries are never unloaded: once
//! a library opens, its handle is leaked for the rest of the process, so
//! constructors handed to a container stay valid after the loader (or the
//! bootstrapper owning it) is dropped.

#![allow(unsafe_code)]

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use libloading::Library;
use tracing::debug;

use crate::domain::DiscoveredType;

use super::abi::{ABI_VERSION, ABI_VERSION_SYMBOL, REGISTER_SYMBOL};
use super::loader::{ModuleLoadError, ModuleLoader};
use super::registrar::{panic_message, run_registration, ModuleRegistrar};

type AbiVersionFn = extern "C" fn() -> u32;
type RegisterFn = fn(&mut ModuleRegistrar);

/// Loads modules from `.so` / `.dylib` / `.dll` files
#[derive(Default)]
pub struct NativeModuleLoader {
    /// Libraries this loader has opened and retained
    opened: AtomicUsize,
}

impl NativeModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of libraries this loader has opened
    ///
    /// Counts every library that opened, including ones whose symbols or
    /// registration were rejected afterwards.
    pub fn loaded_count(&self) -> usize {
        self.opened.load(Ordering::Relaxed)
    }

    /// Opens the library and keeps it loaded for the life of the process
    fn open(&self, path: &Path) -> Result<&'static Library, ModuleLoadError> {
        // SAFETY: loading a library runs its initializers; the trait docs
        // make callers responsible for trusting the plugin directory.
        let library = unsafe { Library::new(path) }.map_err(|e| ModuleLoadError::Open(e.to_string()))?;

        self.opened.fetch_add(1, Ordering::Relaxed);
        debug!(module = %path.display(), "native module opened");

        // Initializers have run and may have handed out pointers into the
        // library, so it must outlive everything, even on a failed load.
        Ok(Box::leak(Box::new(library)))
    }

    /// Checks the ABI version and resolves the registration function
    fn entry_point(library: &'static Library) -> Result<RegisterFn, ModuleLoadError> {
        // SAFETY: the symbol type matches what `declare_module!` exports.
        let abi_version: AbiVersionFn = unsafe {
            *library
                .get::<AbiVersionFn>(ABI_VERSION_SYMBOL.as_bytes())
                .map_err(|e| ModuleLoadError::MissingSymbol {
                    symbol: ABI_VERSION_SYMBOL,
                    reason: e.to_string(),
                })?
        };

        let found = abi_version();
        if found != ABI_VERSION {
            return Err(ModuleLoadError::AbiMismatch {
                expected: ABI_VERSION,
                found,
            });
        }

        // SAFETY: as above; the ABI version check guards the registrar layout.
        let register: RegisterFn = unsafe {
            *library
                .get::<RegisterFn>(REGISTER_SYMBOL.as_bytes())
                .map_err(|e| ModuleLoadError::MissingSymbol {
                    symbol: REGISTER_SYMBOL,
                    reason: e.to_string(),
                })?
        };

        Ok(register)
    }
}

impl ModuleLoader for NativeModuleLoader {
    fn load_types_from(&self, path: &Path) -> Result<Vec<DiscoveredType>, ModuleLoadError> {
        let register = panic::catch_unwind(AssertUnwindSafe(|| {
            self.open(path).and_then(Self::entry_point)
        }))
        .map_err(|payload| ModuleLoadError::Panicked(panic_message(payload.as_ref())))??;

        run_registration(path, register)
    }
}

impl std::fmt::Debug for NativeModuleLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeModuleLoader")
            .field("loaded", &self.loaded_count())
            .finish()
    }
}
