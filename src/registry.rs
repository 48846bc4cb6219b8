//! The registry owns all entities, component pools and systems.
//!
//! # Deferred reconciliation
//! Entities created with [`Registry::create_entity`] are not visible to any system
//! until the next [`Registry::update`].
//! Likewise, [`Registry::kill_entity`] only queues the entity for destruction;
//! it keeps its components and memberships until the next update.
//! `update` should be called once per frame,
//! after the frame's component mutations and before systems are driven.
//!
//! # Reconcile policies
//! How membership of already-active entities is maintained is configured through
//! [`ReconcilePolicy`]:
//!
//! - [`Incremental`](ReconcilePolicy::Incremental) (the default) re-evaluates
//!   every active entity whose components changed since the last update,
//!   and populates systems added since the last update with existing entities.
//!   After each update, an entity is a member of a system
//!   iff it owns every component the system requires.
//! - [`ActivationOnly`](ReconcilePolicy::ActivationOnly) only matches entities
//!   when they are activated.
//!   Components added to or removed from an active entity do not change its memberships,
//!   and systems added after an entity was activated never see it.

use std::any::{self, Any};
use std::mem;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use crate::comp::{Component, ComponentId, ComponentTypes, Signature};
use crate::entity::{EntityMut, EntityRef, Raw, RegistryId};
use crate::storage::{AnyPool, Pool};
use crate::system::{Base, Require, System};
use crate::tracer::{self, Tracer};
use crate::util::DbgTypeId;
use crate::{Entity, Error, Result};

mod builder;
pub use builder::{Builder, DEFAULT_POOL_CAPACITY};

/// Determines which entities are matched against systems during [`Registry::update`].
///
/// See the [module-level documentation](self) for details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcilePolicy {
    /// Match activated entities, re-match changed entities and backfill new systems.
    #[default]
    Incremental,
    /// Only match entities when they are activated.
    ActivationOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Created but not reconciled yet.
    Pending,
    /// Visible to systems.
    Active,
    /// Destroyed. The identity is never reused.
    Dead,
}

struct Record {
    signature: Signature,
    state:     State,
}

trait AnySystem: System {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<S: System> AnySystem for S {
    fn as_any(&self) -> &dyn Any { self }
    fn as_any_mut(&mut self) -> &mut dyn Any { self }
    fn into_any(self: Box<Self>) -> Box<dyn Any> { self }
}

struct Slot {
    base:   Base,
    name:   String,
    /// `None` while the system is lent out by `run_system`.
    system: Option<Box<dyn AnySystem>>,
}

/// Stores entities, their components and the systems interested in them.
pub struct Registry {
    id:            RegistryId,
    types:         Arc<ComponentTypes>,
    policy:        ReconcilePolicy,
    pool_capacity: usize,

    /// Indexed by entity identity.
    records: Vec<Record>,
    /// Number of entities not destroyed yet.
    live:    usize,
    /// Indexed by component ID.
    pools:   Vec<Option<Box<dyn AnyPool>>>,
    /// Ordered by registration.
    systems: IndexMap<DbgTypeId, Slot>,

    to_activate:   IndexSet<Entity>,
    to_kill:       IndexSet<Entity>,
    to_reevaluate: IndexSet<Entity>,
    to_backfill:   Vec<DbgTypeId>,
}

impl Default for Registry {
    fn default() -> Self { Self::new() }
}

impl Registry {
    /// Creates a registry with the default configuration.
    pub fn new() -> Self { Builder::default().build() }

    /// Returns a [`Builder`] to configure a new registry.
    pub fn builder() -> Builder { Builder::default() }

    /// The component type table used by this registry.
    pub fn component_types(&self) -> &Arc<ComponentTypes> { &self.types }

    /// The reconcile policy of this registry.
    pub fn policy(&self) -> ReconcilePolicy { self.policy }

    fn record(&self, entity: Entity) -> Result<&Record> {
        if entity.registry() != self.id {
            return Err(Error::ForeignEntity { entity });
        }
        let record =
            self.records.get(entity.raw().usize()).ok_or(Error::ForeignEntity { entity })?;
        match record.state {
            State::Dead => Err(Error::DeadEntity { entity }),
            _ => Ok(record),
        }
    }

    fn record_mut(&mut self, entity: Entity) -> Result<&mut Record> {
        self.record(entity)?;
        Ok(&mut self.records[entity.raw().usize()])
    }

    /// Queues an active entity for re-evaluation if the policy tracks changes.
    fn mark_changed(&mut self, entity: Entity) {
        if self.policy == ReconcilePolicy::Incremental
            && self.records[entity.raw().usize()].state == State::Active
        {
            self.to_reevaluate.insert(entity);
        }
    }
}

/// Entity management.
impl Registry {
    /// Allocates a new entity.
    ///
    /// The entity is not visible to systems until the next [`update`](Self::update).
    pub fn create_entity(&mut self) -> Entity {
        let id = u32::try_from(self.records.len()).expect("entity identities exhausted");
        let entity = Entity::new(Raw::new(id), self.id);

        self.records.push(Record { signature: Signature::new(), state: State::Pending });
        self.live += 1;
        self.to_activate.insert(entity);

        log::trace!("Created entity {entity}");
        entity
    }

    /// Allocates a new entity and returns a handle to populate it.
    pub fn spawn(&mut self) -> EntityMut<'_> {
        let entity = self.create_entity();
        EntityMut::new(self, entity)
    }

    /// Queues an entity for destruction at the next [`update`](Self::update).
    ///
    /// Until then, the entity keeps its components and system memberships.
    pub fn kill_entity(&mut self, entity: Entity) -> Result<()> {
        self.record(entity)?;
        if self.to_kill.insert(entity) {
            log::debug!("Entity {entity} queued for destruction");
        }
        Ok(())
    }

    /// Returns a shared handle to `entity`.
    pub fn entity(&self, entity: Entity) -> Result<EntityRef<'_>> {
        self.record(entity)?;
        Ok(EntityRef::new(self, entity))
    }

    /// Returns an exclusive handle to `entity`.
    pub fn entity_mut(&mut self, entity: Entity) -> Result<EntityMut<'_>> {
        self.record(entity)?;
        Ok(EntityMut::new(self, entity))
    }

    /// Whether `entity` belongs to this registry and has not been destroyed.
    pub fn is_alive(&self, entity: Entity) -> bool { self.record(entity).is_ok() }

    /// Whether `entity` has been reconciled and is visible to systems.
    pub fn is_active(&self, entity: Entity) -> bool {
        matches!(self.record(entity), Ok(record) if record.state == State::Active)
    }

    /// The signature of the components currently owned by `entity`.
    pub fn signature_of(&self, entity: Entity) -> Result<&Signature> {
        Ok(&self.record(entity)?.signature)
    }

    /// The number of entities that have not been destroyed.
    pub fn entity_count(&self) -> usize { self.live }

    /// The number of entities waiting for activation.
    pub fn pending_activations(&self) -> usize { self.to_activate.len() }

    /// The number of entities waiting for destruction.
    pub fn pending_kills(&self) -> usize { self.to_kill.len() }
}

/// Component management.
impl Registry {
    fn pool_or_insert<T: Component>(
        pools: &mut Vec<Option<Box<dyn AnyPool>>>,
        id: ComponentId,
        initial_len: usize,
    ) -> &mut Pool<T> {
        if pools.len() <= id.index() {
            pools.resize_with(id.index() + 1, || None);
        }

        pools[id.index()]
            .get_or_insert_with(|| {
                log::debug!("Created pool for component {} (#{id})", any::type_name::<T>());
                Box::new(Pool::<T>::with_len(initial_len)) as Box<dyn AnyPool>
            })
            .typed_mut::<T>()
    }

    /// Attaches a component to an entity, replacing the one it already owns.
    ///
    /// Returns the replaced component, if any.
    ///
    /// # Errors
    /// - [`Error::TooManyComponentTypes`] if `T` is new and cannot be registered.
    /// - [`Error::ForeignEntity`] or [`Error::DeadEntity`] if `entity` is invalid.
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<Option<T>> {
        self.record(entity)?;
        let comp_id = self.types.id_of::<T>()?;
        let index = entity.raw().usize();

        let covered = self.records.len().max(self.pool_capacity);
        let pool = Self::pool_or_insert::<T>(&mut self.pools, comp_id, covered);
        pool.resize_at_least(covered);
        let old = pool.set(index, component)?;

        let signature = &mut self.records[index].signature;
        if signature.test(comp_id) {
            return Ok(old);
        }

        signature.set(comp_id, true);
        self.mark_changed(entity);
        log::debug!("Component {} (#{comp_id}) added to entity {entity}", any::type_name::<T>());
        Ok(None)
    }

    /// Detaches a component from an entity.
    ///
    /// Returns whether the entity owned the component.
    /// The value remains in the pool but can no longer be read.
    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Result<bool> {
        let comp_id = self.types.get::<T>();
        let record = self.record_mut(entity)?;

        match comp_id {
            Some(comp_id) if record.signature.test(comp_id) => {
                record.signature.set(comp_id, false);
                self.mark_changed(entity);
                log::debug!(
                    "Component {} (#{comp_id}) removed from entity {entity}",
                    any::type_name::<T>()
                );
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Whether `entity` owns a component of type `T`.
    ///
    /// This never registers `T`.
    pub fn has_component<T: Component>(&self, entity: Entity) -> Result<bool> {
        let record = self.record(entity)?;
        Ok(self.types.get::<T>().map_or(false, |id| record.signature.test(id)))
    }

    /// Returns the component of type `T` owned by `entity`.
    ///
    /// # Errors
    /// Returns [`Error::MissingComponent`] if `entity` does not own `T`.
    pub fn get_component<T: Component>(&self, entity: Entity) -> Result<&T> {
        let signature = self.record(entity)?.signature;
        let missing = move || Error::MissingComponent { entity, component: any::type_name::<T>() };

        let comp_id = self.types.get::<T>().filter(|&id| signature.test(id)).ok_or_else(missing)?;
        let pool = self.pools.get(comp_id.index()).and_then(Option::as_ref).ok_or_else(missing)?;
        pool.typed::<T>().get(entity.raw().usize()).ok_or_else(missing)
    }

    /// Returns the component of type `T` owned by `entity` mutably.
    ///
    /// # Errors
    /// Returns [`Error::MissingComponent`] if `entity` does not own `T`.
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Result<&mut T> {
        let signature = self.record(entity)?.signature;
        let missing = move || Error::MissingComponent { entity, component: any::type_name::<T>() };

        let comp_id = self.types.get::<T>().filter(|&id| signature.test(id)).ok_or_else(missing)?;
        let pool =
            self.pools.get_mut(comp_id.index()).and_then(Option::as_mut).ok_or_else(missing)?;
        pool.typed_mut::<T>().get_mut(entity.raw().usize()).ok_or_else(missing)
    }
}

/// System management.
impl Registry {
    fn slot<S: System>(&self) -> Result<&Slot> {
        self.systems
            .get(&DbgTypeId::of::<S>())
            .ok_or(Error::MissingSystem { system: any::type_name::<S>() })
    }

    /// Registers a system.
    ///
    /// [`System::require`] is called once to compute the required signature.
    /// The system only receives entities from the next [`update`](Self::update) onwards.
    ///
    /// # Errors
    /// - [`Error::DuplicateSystem`] if a system of type `S` is already registered.
    /// - Any error returned by [`System::require`].
    pub fn add_system<S: System>(&mut self, system: S) -> Result<()> {
        let key = DbgTypeId::of::<S>();
        if self.systems.contains_key(&key) {
            return Err(Error::DuplicateSystem { system: key.name });
        }

        let mut require = Require::new(&self.types);
        system.require(&mut require)?;
        let signature = require.finish();

        let name = system.debug_name().to_string();
        log::info!("Added system {name} requiring {signature}");

        self.systems.insert(key, Slot { base: Base::new(signature), name, system: Some(Box::new(system)) });
        if self.policy == ReconcilePolicy::Incremental {
            self.to_backfill.push(key);
        }
        Ok(())
    }

    /// Unregisters the system of type `S` and returns it.
    ///
    /// # Errors
    /// - [`Error::MissingSystem`] if no system of type `S` is registered.
    /// - [`Error::SystemBusy`] if the system is running.
    pub fn remove_system<S: System>(&mut self) -> Result<S> {
        let key = DbgTypeId::of::<S>();
        if self.slot::<S>()?.system.is_none() {
            return Err(Error::SystemBusy { system: key.name });
        }

        let slot = self.systems.shift_remove(&key).expect("checked above");
        self.to_backfill.retain(|&pending| pending != key);
        log::info!("Removed system {}", slot.name);

        let system = slot.system.expect("checked above").into_any();
        Ok(*system.downcast::<S>().expect("TypeId mismatch"))
    }

    /// Whether a system of type `S` is registered.
    pub fn has_system<S: System>(&self) -> bool { self.systems.contains_key(&DbgTypeId::of::<S>()) }

    /// Returns the system of type `S`.
    pub fn get_system<S: System>(&self) -> Result<&S> {
        let system = self.slot::<S>()?.system.as_ref();
        let system = system.ok_or(Error::SystemBusy { system: any::type_name::<S>() })?;
        Ok(system.as_any().downcast_ref::<S>().expect("TypeId mismatch"))
    }

    /// Returns the system of type `S` mutably.
    pub fn get_system_mut<S: System>(&mut self) -> Result<&mut S> {
        let name = any::type_name::<S>();
        let slot = self
            .systems
            .get_mut(&DbgTypeId::of::<S>())
            .ok_or(Error::MissingSystem { system: name })?;
        let system = slot.system.as_mut().ok_or(Error::SystemBusy { system: name })?;
        Ok(system.as_any_mut().downcast_mut::<S>().expect("TypeId mismatch"))
    }

    /// Returns the signature and membership of the system of type `S`.
    pub fn system_base<S: System>(&self) -> Result<&Base> { Ok(&self.slot::<S>()?.base) }

    /// Copies the entities matched to the system of type `S` as of the last update.
    pub fn system_entities<S: System>(&self) -> Result<Vec<Entity>> {
        Ok(self.slot::<S>()?.base.snapshot())
    }

    /// Lends the system of type `S` to `run`
    /// together with its entities and the registry.
    ///
    /// While `run` executes, the system cannot be accessed through the registry.
    ///
    /// # Errors
    /// - [`Error::MissingSystem`] if no system of type `S` is registered.
    /// - [`Error::SystemBusy`] if the system is already running.
    pub fn run_system<S: System, R>(
        &mut self,
        run: impl FnOnce(&mut S, &[Entity], &mut Self) -> R,
    ) -> Result<R> {
        let key = DbgTypeId::of::<S>();
        let slot = self.systems.get_mut(&key).ok_or(Error::MissingSystem { system: key.name })?;
        let mut system = slot.system.take().ok_or(Error::SystemBusy { system: key.name })?;
        let entities = slot.base.snapshot();

        let typed = system.as_any_mut().downcast_mut::<S>().expect("TypeId mismatch");
        let output = run(typed, &entities, self);

        // a lent system can neither be removed nor replaced
        let slot = self.systems.get_mut(&key).expect("lent system slot is retained");
        slot.system = Some(system);
        Ok(output)
    }
}

/// Reconciliation.
impl Registry {
    /// Reconciles pending entities into systems, logging events at trace level.
    ///
    /// See [`update_traced`](Self::update_traced).
    pub fn update(&mut self) { self.update_traced(&tracer::Log(log::Level::Trace)) }

    /// Reconciles pending entities into systems.
    ///
    /// The steps are performed in this order:
    /// 1. Entities queued by [`kill_entity`](Self::kill_entity) are evicted from all systems
    ///    and destroyed, in queue order.
    /// 2. Created entities are activated in creation order,
    ///    joining every matching system in registration order.
    /// 3. With [`ReconcilePolicy::Incremental`],
    ///    active entities whose components changed are re-matched in mutation order,
    ///    then systems added since the last update receive all matching active entities
    ///    in identity order.
    pub fn update_traced(&mut self, tracer: &impl Tracer) {
        tracer.start_update();

        let to_kill = mem::take(&mut self.to_kill);
        for &entity in &to_kill {
            self.destroy(entity, tracer);
        }

        let to_activate = mem::take(&mut self.to_activate);
        for &entity in &to_activate {
            let record = &mut self.records[entity.raw().usize()];
            record.state = State::Active;
            tracer.activate(entity);

            for slot in self.systems.values_mut() {
                if slot.base.is_interested(&record.signature) && slot.base.add_entity(entity) {
                    tracer.admit(entity, &slot.name);
                }
            }
        }

        let to_reevaluate = mem::take(&mut self.to_reevaluate);
        for &entity in &to_reevaluate {
            let signature = self.records[entity.raw().usize()].signature;
            tracer.reevaluate(entity);

            for slot in self.systems.values_mut() {
                if slot.base.is_interested(&signature) {
                    if slot.base.add_entity(entity) {
                        tracer.admit(entity, &slot.name);
                    }
                } else if slot.base.remove_entity(entity) {
                    tracer.evict(entity, &slot.name);
                }
            }
        }

        for key in mem::take(&mut self.to_backfill) {
            let Some(slot) = self.systems.get_mut(&key) else { continue };
            tracer.backfill(&slot.name);

            for (index, record) in self.records.iter().enumerate() {
                if record.state == State::Active && slot.base.is_interested(&record.signature) {
                    let id = u32::try_from(index).expect("records are indexed by u32 identities");
                    let entity = Entity::new(Raw::new(id), self.id);
                    if slot.base.add_entity(entity) {
                        tracer.admit(entity, &slot.name);
                    }
                }
            }
        }

        tracer.end_update(to_activate.len(), to_kill.len(), to_reevaluate.len());
    }

    fn destroy(&mut self, entity: Entity, tracer: &impl Tracer) {
        let index = entity.raw().usize();

        for slot in self.systems.values_mut() {
            if slot.base.remove_entity(entity) {
                tracer.evict(entity, &slot.name);
            }
        }

        // also drops stale values of removed components
        for pool in self.pools.iter_mut().flatten() {
            pool.drop_slot(index);
        }

        let record = &mut self.records[index];
        record.signature.clear();
        record.state = State::Dead;
        self.live -= 1;

        self.to_activate.shift_remove(&entity);
        self.to_reevaluate.shift_remove(&entity);

        tracer.kill(entity);
        log::debug!("Destroyed entity {entity}");
    }
}
