use indexmap::IndexSet;

use crate::comp::Signature;
use crate::Entity;

/// The registry-maintained state of a system.
///
/// The signature is fixed when the system is added.
/// The entity list is ordered by admission and never contains duplicates.
pub struct Base {
    signature: Signature,
    entities:  IndexSet<Entity>,
}

impl Base {
    pub(crate) fn new(signature: Signature) -> Self { Self { signature, entities: IndexSet::new() } }

    /// The components required by the system.
    pub fn signature(&self) -> &Signature { &self.signature }

    /// Whether an entity with `entity_signature` satisfies this system.
    pub fn is_interested(&self, entity_signature: &Signature) -> bool {
        entity_signature.contains(&self.signature)
    }

    /// Appends `entity` unless it is already a member.
    /// Returns whether it was appended.
    pub(crate) fn add_entity(&mut self, entity: Entity) -> bool { self.entities.insert(entity) }

    /// Removes `entity`, preserving the order of other members.
    /// Returns whether it was a member.
    pub(crate) fn remove_entity(&mut self, entity: Entity) -> bool {
        self.entities.shift_remove(&entity)
    }

    /// Iterates over the members in admission order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ { self.entities.iter().copied() }

    /// Copies the members in admission order.
    pub fn snapshot(&self) -> Vec<Entity> { self.entities().collect() }

    /// Whether `entity` is a member.
    pub fn contains(&self, entity: Entity) -> bool { self.entities.contains(&entity) }

    /// The number of members.
    pub fn len(&self) -> usize { self.entities.len() }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool { self.entities.is_empty() }
}
