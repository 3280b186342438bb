//! # Contract Binding
//!
//! Chooses one implementation per contract from the discovered types.
//!
//! The policy is first-writer-wins: the first type (in discovery order) to
//! implement a contract keeps it. Later candidates are not errors; they are
//! recorded as [`Conflict`]s so operators can see which plugins competed.

mod binder;
mod table;

pub use binder::bind;
pub use table::{Binding, BindingSummary, BindingTable, Conflict};
