//! Errors returned by registry operations.

use crate::Entity;

/// The error type for all fallible operations in this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A new component type was referenced after all component IDs were assigned.
    #[error(
        "cannot register component type `{name}`: at most {max} component types are supported"
    )]
    TooManyComponentTypes {
        /// The type that could not be registered.
        name: &'static str,
        /// The fixed capacity.
        max:  usize,
    },

    /// The entity was allocated by another registry.
    #[error("entity {entity} was not created by this registry")]
    ForeignEntity {
        /// The offending entity.
        entity: Entity,
    },

    /// The entity was destroyed during a previous reconciliation.
    #[error("entity {entity} has been destroyed")]
    DeadEntity {
        /// The offending entity.
        entity: Entity,
    },

    /// The entity does not own the requested component.
    #[error("entity {entity} does not own a component of type `{component}`")]
    MissingComponent {
        /// The entity that was queried.
        entity:    Entity,
        /// The requested component type.
        component: &'static str,
    },

    /// No system of the requested type is registered.
    #[error("system `{system}` is not registered")]
    MissingSystem {
        /// The requested system type.
        system: &'static str,
    },

    /// A system of the same type is already registered.
    #[error("system `{system}` is already registered")]
    DuplicateSystem {
        /// The system type.
        system: &'static str,
    },

    /// The system is currently lent out by [`Registry::run_system`](crate::Registry::run_system).
    #[error("system `{system}` is currently running")]
    SystemBusy {
        /// The system type.
        system: &'static str,
    },

    /// A pool slot was written before the pool was resized to cover it.
    #[error("index {index} is out of bounds for a pool of length {len}")]
    OutOfBounds {
        /// The requested slot.
        index: usize,
        /// The current pool length.
        len:   usize,
    },
}

/// Shorthand for results with [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
