//! # Module Loading
//!
//! Finds plugin modules in a directory and reports the types they define.
//!
//! ## Overview
//!
//! Every regular file directly inside the plugin directory is a candidate
//! module. Files are loaded through a [`ModuleLoader`]; a file that fails to
//! load is recorded in the [`Discovery`] and the scan moves on.
//!
//! ## Loaders
//!
//! | Loader | Source | Notes |
//! |--------|--------|-------|
//! | [`NativeModuleLoader`] | Shared libraries | Feature `dynamic-loading` |
//! | [`StaticModuleLoader`] | Registration functions linked into the host | Keyed by file name |
//!
//! ## Declaring Types
//!
//! Modules describe their types through a [`ModuleRegistrar`]: name,
//! visibility, whether the type is abstract, which contracts it implements,
//! and how to construct it. Native modules export the registration
//! function with [`declare_module!`](crate::declare_module).
//!
//! ## Side Effects
//!
//! Loading a module executes its initialization code. Loaded code is fully
//! trusted; there is no isolation.

mod abi;
mod loader;
#[cfg(feature = "dynamic-loading")]
mod native;
mod registrar;
mod static_loader;

pub use abi::{ABI_VERSION, ABI_VERSION_SYMBOL, REGISTER_SYMBOL};
pub use loader::{
    discover, discover_with, DiscoverError, Discovery, ModuleLoadError, ModuleLoader, ModuleRecord,
};
#[cfg(feature = "dynamic-loading")]
pub use native::NativeModuleLoader;
pub use registrar::{ModuleRegistrar, TypeBuilder};
pub use static_loader::StaticModuleLoader;
