//! A component is a plain data record that can be attached to an entity.
//!
//! Any `Send + 'static` type can be used as a component.
//! Each distinct component type is assigned a small [`ComponentId`]
//! the first time it is registered in a [`ComponentTypes`] table.
//! Since component ownership is tracked in fixed-width [`Signature`]s,
//! at most [`MAX_COMPONENT_TYPES`] types can be registered in the same table.
//!
//! # Registration
//! Component types are registered lazily,
//! when a component of that type is first added to an entity
//! or when a system first requires it.
//! Queries such as [`Registry::has_component`](crate::Registry::has_component)
//! never register a type, so they cannot fail because of the capacity.
//!
//! The process-wide table returned by [`ComponentTypes::global`] is shared by
//! all registries built with the default configuration and is never reset.
//! Use [`registry::Builder::component_types`](crate::registry::Builder::component_types)
//! to give a registry an isolated table.

use std::fmt;

/// The maximum number of distinct component types in a [`ComponentTypes`] table.
pub const MAX_COMPONENT_TYPES: usize = 32;

/// A type that can be attached to an entity.
///
/// This trait is blanket-implemented for all eligible types.
pub trait Component: Send + 'static {}

impl<T: Send + 'static> Component for T {}

/// Identifies a component type within a [`ComponentTypes`] table.
///
/// The value is always in the range `0..MAX_COMPONENT_TYPES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(usize);

impl ComponentId {
    /// Returns the ID as an index.
    pub fn index(self) -> usize { self.0 }

    pub(crate) fn new(index: usize) -> Self {
        assert!(index < MAX_COMPONENT_TYPES, "component ID {index} exceeds the capacity");
        Self(index)
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}

mod signature;
pub use signature::Signature;

mod types;
pub use types::ComponentTypes;
