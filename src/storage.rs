//! A pool is the data structure where components of the same type for all entities are stored.
//!
//! Pools are indexed by entity identity directly.
//! The registry keeps one pool per component type,
//! erased behind [`AnyPool`] so that pools of different types can share one collection.

mod pool;
pub use pool::Pool;

mod any;
pub use any::AnyPool;
