//! An entity is an opaque identity that owns components.
//!
//! Entity identities are allocated sequentially from 0 by each [`Registry`](crate::Registry)
//! and are never reused within that registry, even after the entity is destroyed.
//!
//! An [`Entity`] value is just the identity plus a tag of the registry that allocated it.
//! It does not keep the registry alive;
//! passing it to another registry is rejected with [`Error::ForeignEntity`](crate::Error::ForeignEntity).
//! [`EntityRef`] and [`EntityMut`] pair an entity with a borrow of its registry
//! to call component operations directly on the entity.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};
use std::{cmp, fmt, hash};

mod handle;
pub use handle::{EntityMut, EntityRef};

/// A raw entity identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Raw(u32);

impl Raw {
    pub(crate) fn new(id: u32) -> Self { Self(id) }

    pub(crate) fn get(self) -> u32 { self.0 }

    pub(crate) fn usize(self) -> usize { self.0.try_into().expect("usize >= u32") }
}

/// Tags the registry that allocated an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RegistryId(NonZeroU64);

impl RegistryId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        let id = NEXT.fetch_add(1, Ordering::Relaxed);
        Self(NonZeroU64::new(id).expect("registry ID overflow"))
    }
}

/// A handle to an entity.
///
/// Equality, ordering and hashing only consider the identity,
/// so entities are ordered by creation.
#[derive(Clone, Copy)]
pub struct Entity {
    id:       Raw,
    registry: RegistryId,
}

impl Entity {
    pub(crate) fn new(id: Raw, registry: RegistryId) -> Self { Self { id, registry } }

    /// Returns the identity of this entity.
    pub fn id(self) -> u32 { self.id.get() }

    pub(crate) fn raw(self) -> Raw { self.id }

    pub(crate) fn registry(self) -> RegistryId { self.registry }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl Eq for Entity {}

impl PartialOrd for Entity {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> { Some(self.cmp(other)) }
}

impl Ord for Entity {
    fn cmp(&self, other: &Self) -> cmp::Ordering { self.id.cmp(&other.id) }
}

impl hash::Hash for Entity {
    fn hash<H: hash::Hasher>(&self, state: &mut H) { self.id.hash(state) }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "Entity({self})") }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.id.get()) }
}

#[cfg(test)]
mod tests;
