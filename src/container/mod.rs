//! # Resolution Container
//!
//! Receives a finished [`BindingTable`](crate::binding::BindingTable) and
//! constructs implementations on request.
//!
//! - [`ResolutionContainer`] - the registration seam; implement it to feed
//!   another container
//! - [`Container`] - built-in container, constructs a new [`Instance`] per
//!   resolve
//! - [`apply`] - registers a whole table, collecting every rejection

mod instance;
mod resolver;
mod sink;

pub use instance::Instance;
pub use resolver::{Container, ContainerError, ResolutionContainer, ResolveError};
pub use sink::{apply, RegistrationError, RegistrationFailure};
