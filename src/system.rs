//! Systems are processing units that operate on every entity owning a set of components.
//!
//! A system declares its required components once, when it is added to the registry,
//! through [`System::require`].
//! The registry then keeps a [`Base`] for the system,
//! which stores the required [`Signature`] and the entities currently matching it.
//! Membership is only recomputed in [`Registry::update`](crate::Registry::update).
//!
//! Processing logic is not part of this trait.
//! Concrete systems expose their own methods
//! and are driven through [`Registry::run_system`](crate::Registry::run_system),
//! which lends the system its membership snapshot together with the registry.

use std::any;

use crate::comp::{Component, ComponentTypes, Signature};
use crate::Result;

mod base;
pub use base::Base;

/// A system that processes the entities matching its required components.
///
/// Only one instance of each implementor type can be registered in a registry at a time.
pub trait System: Send + 'static {
    /// Declares the components an entity must own to be processed by this system.
    ///
    /// Called exactly once, by [`Registry::add_system`](crate::Registry::add_system).
    fn require(&self, require: &mut Require<'_>) -> Result<()>;

    /// A name used in logs and tracers.
    fn debug_name(&self) -> &str { any::type_name::<Self>() }
}

/// Collects the required components of a system during registration.
pub struct Require<'t> {
    types:     &'t ComponentTypes,
    signature: Signature,
}

impl<'t> Require<'t> {
    pub(crate) fn new(types: &'t ComponentTypes) -> Self { Self { types, signature: Signature::new() } }

    /// Requires entities to own a component of type `T`.
    ///
    /// # Errors
    /// Returns [`Error::TooManyComponentTypes`](crate::Error::TooManyComponentTypes)
    /// if `T` cannot be registered.
    pub fn component<T: Component>(&mut self) -> Result<&mut Self> {
        let id = self.types.id_of::<T>()?;
        self.signature.set(id, true);
        Ok(self)
    }

    pub(crate) fn finish(self) -> Signature { self.signature }
}
