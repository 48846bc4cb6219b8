use super::Entity;
use crate::comp::{Component, Signature};
use crate::{Registry, Result};

/// A shared borrow of a registry, focused on one live entity.
///
/// Obtained from [`Registry::entity`].
pub struct EntityRef<'r> {
    registry: &'r Registry,
    entity:   Entity,
}

impl<'r> EntityRef<'r> {
    pub(crate) fn new(registry: &'r Registry, entity: Entity) -> Self { Self { registry, entity } }

    /// The entity this handle refers to.
    pub fn entity(&self) -> Entity { self.entity }

    /// Whether the entity owns a component of type `T`.
    pub fn has<T: Component>(&self) -> Result<bool> { self.registry.has_component::<T>(self.entity) }

    /// Returns the component of type `T`.
    pub fn get<T: Component>(&self) -> Result<&'r T> { self.registry.get_component::<T>(self.entity) }

    /// The components currently owned by the entity.
    pub fn signature(&self) -> Result<&'r Signature> { self.registry.signature_of(self.entity) }
}

/// An exclusive borrow of a registry, focused on one live entity.
///
/// Obtained from [`Registry::entity_mut`] or [`Registry::spawn`].
/// Mutating methods return `&mut Self` so that components can be attached in a chain:
///
/// ```
/// # struct Position(f32, f32);
/// # struct Velocity(f32, f32);
/// let mut registry = signet::Registry::new();
/// let tank = registry
///     .spawn()
///     .add(Position(10.0, 30.0))?
///     .add(Velocity(40.0, 0.0))?
///     .entity();
/// assert!(registry.has_component::<Velocity>(tank)?);
/// # Ok::<(), signet::Error>(())
/// ```
pub struct EntityMut<'r> {
    registry: &'r mut Registry,
    entity:   Entity,
}

impl<'r> EntityMut<'r> {
    pub(crate) fn new(registry: &'r mut Registry, entity: Entity) -> Self { Self { registry, entity } }

    /// The entity this handle refers to.
    pub fn entity(&self) -> Entity { self.entity }

    /// Attaches a component, replacing the one the entity already owns.
    ///
    /// Use [`Registry::add_component`] to retrieve the replaced value.
    pub fn add<T: Component>(&mut self, component: T) -> Result<&mut Self> {
        self.registry.add_component(self.entity, component)?;
        Ok(self)
    }

    /// Detaches a component. Returns whether the entity owned it.
    pub fn remove<T: Component>(&mut self) -> Result<bool> {
        self.registry.remove_component::<T>(self.entity)
    }

    /// Whether the entity owns a component of type `T`.
    pub fn has<T: Component>(&self) -> Result<bool> { self.registry.has_component::<T>(self.entity) }

    /// Returns the component of type `T`.
    pub fn get<T: Component>(&self) -> Result<&T> { self.registry.get_component::<T>(self.entity) }

    /// Returns the component of type `T` mutably.
    pub fn get_mut<T: Component>(&mut self) -> Result<&mut T> {
        self.registry.get_component_mut::<T>(self.entity)
    }

    /// Queues the entity for destruction at the next [`Registry::update`].
    pub fn kill(self) -> Result<()> { self.registry.kill_entity(self.entity) }
}
