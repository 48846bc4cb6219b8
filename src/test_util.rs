#![allow(missing_docs)]

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use indexmap::IndexSet;
use parking_lot::{Mutex, Once};

use crate::comp::ComponentTypes;
use crate::registry::{Builder, ReconcilePolicy};
use crate::system::{Require, System};
use crate::{tracer, Entity, Registry, Result};

/// Records reconciliation events in emission order.
///
/// Each `(before, after)` pair passed to [`EventTracer::new`] asserts that
/// `after` is only emitted once `before` has been seen.
/// Emitting the same event twice in one tracer panics,
/// which catches duplicate admissions within an update.
pub struct EventTracer<T: fmt::Debug + Eq + Hash> {
    prerequisites: HashMap<T, Vec<T>>,
    events:        Mutex<IndexSet<T>>,
}

impl<T: fmt::Debug + Eq + Hash> EventTracer<T> {
    pub fn new(orders: impl IntoIterator<Item = (T, T)>) -> Self {
        let mut prerequisites: HashMap<T, Vec<T>> = HashMap::new();
        for (before, after) in orders {
            prerequisites.entry(after).or_default().push(before);
        }

        Self { prerequisites, events: Mutex::new(IndexSet::new()) }
    }

    /// # Panics
    /// Panics if `event` was already recorded or one of its prerequisites was not.
    pub fn trace(&self, event: T) {
        let mut events = self.events.lock();

        let missing = self
            .prerequisites
            .get(&event)
            .into_iter()
            .flatten()
            .find(|before| !events.contains(*before));
        if let Some(before) = missing {
            panic!("{event:?} was emitted before {before:?}");
        }

        if let Some(position) = events.get_index_of(&event) {
            panic!("{event:?} was emitted twice, first at position {position}");
        }
        events.insert(event);
    }

    /// Consumes the tracer and returns the recorded events in order.
    pub fn get_events(self) -> Vec<T> { self.events.into_inner().into_iter().collect() }
}

/// A reconciliation event, keyed by entity identity and system debug name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    Start,
    End { activated: usize, killed: usize, reevaluated: usize },
    Kill(u32),
    Activate(u32),
    Reevaluate(u32),
    Backfill(String),
    Admit(u32, String),
    Evict(u32, String),
}

impl tracer::Tracer for EventTracer<Event> {
    fn start_update(&self) { self.trace(Event::Start) }

    fn end_update(&self, activated: usize, killed: usize, reevaluated: usize) {
        self.trace(Event::End { activated, killed, reevaluated })
    }

    fn kill(&self, entity: Entity) { self.trace(Event::Kill(entity.id())) }

    fn activate(&self, entity: Entity) { self.trace(Event::Activate(entity.id())) }

    fn reevaluate(&self, entity: Entity) { self.trace(Event::Reevaluate(entity.id())) }

    fn backfill(&self, system: &str) { self.trace(Event::Backfill(system.to_string())) }

    fn admit(&self, entity: Entity, system: &str) {
        self.trace(Event::Admit(entity.id(), system.to_string()))
    }

    fn evict(&self, entity: Entity, system: &str) {
        self.trace(Event::Evict(entity.id(), system.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub dx: f32,
    pub dy: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub asset:   &'static str,
    pub width:   u32,
    pub height:  u32,
    pub z_index: i32,
}

impl Sprite {
    pub fn new(asset: &'static str, z_index: i32) -> Self {
        Self { asset, width: 32, height: 32, z_index }
    }
}

/// Requires [`Position`] and [`Velocity`], integrates positions.
#[derive(Debug, Default)]
pub struct Movement {
    pub ticks: usize,
}

impl System for Movement {
    fn require(&self, require: &mut Require<'_>) -> Result<()> {
        require.component::<Position>()?.component::<Velocity>()?;
        Ok(())
    }

    fn debug_name(&self) -> &str { "Movement" }
}

impl Movement {
    pub fn update(&mut self, entities: &[Entity], registry: &mut Registry, dt: f32) -> Result<()> {
        self.ticks += 1;
        for &entity in entities {
            let velocity = *registry.get_component::<Velocity>(entity)?;
            let position = registry.get_component_mut::<Position>(entity)?;
            position.x += velocity.dx * dt;
            position.y += velocity.dy * dt;
        }
        Ok(())
    }
}

/// Requires [`Position`] and [`Sprite`], collects draw calls ordered by z-index.
#[derive(Debug, Default)]
pub struct Render {
    pub drawn: Vec<(u32, &'static str)>,
}

impl System for Render {
    fn require(&self, require: &mut Require<'_>) -> Result<()> {
        require.component::<Position>()?.component::<Sprite>()?;
        Ok(())
    }

    fn debug_name(&self) -> &str { "Render" }
}

impl Render {
    pub fn update(&mut self, entities: &[Entity], registry: &Registry) -> Result<()> {
        let mut sprites = entities
            .iter()
            .map(|&entity| Ok((entity, registry.get_component::<Sprite>(entity)?)))
            .collect::<Result<Vec<_>>>()?;
        sprites.sort_by_key(|(_, sprite)| sprite.z_index);

        self.drawn = sprites.into_iter().map(|(entity, sprite)| (entity.id(), sprite.asset)).collect();
        Ok(())
    }
}

/// Requires [`Position`] only.
#[derive(Debug, Default)]
pub struct Locator;

impl System for Locator {
    fn require(&self, require: &mut Require<'_>) -> Result<()> {
        require.component::<Position>()?;
        Ok(())
    }

    fn debug_name(&self) -> &str { "Locator" }
}

/// Requires nothing, so every active entity matches.
#[derive(Debug, Default)]
pub struct Everything;

impl System for Everything {
    fn require(&self, _: &mut Require<'_>) -> Result<()> { Ok(()) }

    fn debug_name(&self) -> &str { "Everything" }
}

/// Creates a registry with an isolated component type table.
pub fn registry() -> Registry { registry_with(ReconcilePolicy::default()) }

/// Creates a registry with an isolated component type table and the given policy.
pub fn registry_with(policy: ReconcilePolicy) -> Registry {
    init_logger();
    Builder::default()
        .component_types(Arc::new(ComponentTypes::new()))
        .reconcile_policy(policy)
        .build()
}

pub fn init_logger() {
    static SET_LOGGER_ONCE: Once = Once::new();
    SET_LOGGER_ONCE.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}
