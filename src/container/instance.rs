//! Values produced by the container

use std::any::{self, Any};
use std::fmt;

use crate::domain::TypeRef;

/// A freshly constructed implementation of some contract
pub struct Instance {
    implementation: TypeRef,
    value: Box<dyn Any + Send + Sync>,
}

impl Instance {
    pub(crate) fn new(implementation: TypeRef, value: Box<dyn Any + Send + Sync>) -> Self {
        Self {
            implementation,
            value,
        }
    }

    /// Name of the concrete implementation type that built this value
    pub fn implementation(&self) -> &str {
        &self.implementation.name
    }

    pub fn type_ref(&self) -> &TypeRef {
        &self.implementation
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Converts into the concrete Rust type, or returns `self` unchanged
    pub fn downcast<T: Any>(self) -> Result<Box<T>, Self> {
        let Self {
            implementation,
            value,
        } = self;

        value.downcast::<T>().map_err(|value| Self {
            implementation,
            value,
        })
    }

    pub fn into_inner(self) -> Box<dyn Any + Send + Sync> {
        self.value
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("implementation", &self.implementation)
            .finish_non_exhaustive()
    }
}

pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
