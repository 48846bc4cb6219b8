//! A small entity-component-system registry.
//!
//! # Overview
//! Entities are opaque identities that own components.
//! Components are plain data records of any `Send + 'static` type,
//! stored densely in one [pool](storage::Pool) per type and indexed by entity identity.
//! Systems declare the components they require;
//! the [`Registry`] keeps, for each system,
//! the list of entities owning all of those components.
//!
//! # Deferred activation
//! Entity creation and destruction are deferred.
//! A created entity is invisible to systems until the next [`Registry::update`],
//! and a killed entity stays intact until then.
//! This allows systems to create and kill entities while the membership they iterate is stable.
//!
//! ```
//! use signet::system::{Require, System};
//! use signet::{Registry, Result};
//!
//! struct Position(f32, f32);
//! struct Velocity(f32, f32);
//!
//! struct Movement;
//!
//! impl System for Movement {
//!     fn require(&self, require: &mut Require<'_>) -> Result<()> {
//!         require.component::<Position>()?.component::<Velocity>()?;
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.add_system(Movement)?;
//!
//! let tank = registry.create_entity();
//! registry.add_component(tank, Position(10.0, 30.0))?;
//! registry.add_component(tank, Velocity(40.0, 0.0))?;
//! assert!(registry.system_entities::<Movement>()?.is_empty());
//!
//! registry.update();
//! assert_eq!(registry.system_entities::<Movement>()?, vec![tank]);
//!
//! registry.run_system::<Movement, _>(|_, entities, registry| -> Result<()> {
//!     for &entity in entities {
//!         let velocity = registry.get_component::<Velocity>(entity)?.0;
//!         registry.get_component_mut::<Position>(entity)?.0 += velocity;
//!     }
//!     Ok(())
//! })??;
//! assert_eq!(registry.get_component::<Position>(tank)?.0, 50.0);
//! # Ok::<(), signet::Error>(())
//! ```
//!
//! # Component types
//! Each registry assigns component IDs through a [`ComponentTypes`](comp::ComponentTypes) table,
//! which supports at most [`MAX_COMPONENT_TYPES`](comp::MAX_COMPONENT_TYPES) types.
//! Registries share a process-wide table unless configured otherwise
//! through [`registry::Builder`].

#![cfg_attr(not(debug_assertions), deny(missing_docs))]
#![cfg_attr(doc, warn(missing_docs))]

pub mod tracer;

pub mod comp;
pub use comp::{Component, Signature};

pub mod entity;
pub use entity::Entity;

mod error;
pub use error::{Error, Result};

pub mod registry;
pub use registry::Registry;

pub mod storage;

pub mod system;
pub use system::System;

#[cfg(any(test, feature = "internal-bench"))]
pub mod test_util;

pub mod util;

static_assertions::assert_impl_all!(Registry: Send, Default);
static_assertions::assert_impl_all!(Error: std::error::Error, Send, Sync);
