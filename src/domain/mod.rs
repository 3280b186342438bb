//! Domain models for plugwire
//!
//! Contracts and the types modules expose, without any loading concerns.

mod contract;
mod discovered;

pub use contract::{Contract, ContractError};
pub use discovered::{Constructor, DiscoveredType, TypeRef, Visibility};
