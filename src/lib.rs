//! plugwire - plugin discovery and contract binding
//!
//! Scans a directory for plugin modules, collects the public concrete types
//! they declare, picks one implementation per contract, and registers the
//! result into a resolution container.
//!
//! ```text
//! discover(dir) ──► bind(types) ──► apply(table, container)
//!   plugin            binding           container
//! ```
//!
//! [`bootstrap::Bootstrapper`] runs all three stages.

#![deny(unsafe_code)]

pub mod binding;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod container;
pub mod domain;
pub mod plugin;

pub use binding::{bind, Binding, BindingTable, Conflict};
pub use bootstrap::{BootstrapError, BootstrapReport, Bootstrapper};
pub use container::{apply, Container, Instance, RegistrationError, ResolutionContainer};
pub use domain::{Contract, DiscoveredType};
pub use plugin::{discover, DiscoverError, Discovery, ModuleLoadError, ModuleLoader};
