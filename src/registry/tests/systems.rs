//! Tests system registration and driving.

use std::any;

use crate::system::{Require, System};
use crate::test_util::*;
use crate::{Error, Result, Signature};

#[test]
fn test_system_registry() {
    let mut registry = registry();
    assert!(!registry.has_system::<Movement>());

    registry.add_system(Movement { ticks: 3 }).expect("new system");
    assert!(registry.has_system::<Movement>());
    assert_eq!(registry.get_system::<Movement>().map(|system| system.ticks), Ok(3));

    registry.get_system_mut::<Movement>().expect("registered").ticks = 4;
    let system = registry.remove_system::<Movement>().expect("registered");
    assert_eq!(system.ticks, 4);
    assert!(!registry.has_system::<Movement>());

    let missing = Error::MissingSystem { system: any::type_name::<Movement>() };
    assert_eq!(registry.get_system::<Movement>().map(|_| ()), Err(missing.clone()));
    assert_eq!(registry.system_entities::<Movement>(), Err(missing.clone()));
    assert_eq!(registry.remove_system::<Movement>().map(|_| ()), Err(missing));
}

#[test]
fn test_duplicate_system() {
    let mut registry = registry();
    registry.add_system(Movement { ticks: 1 }).expect("new system");

    assert_eq!(
        registry.add_system(Movement { ticks: 2 }),
        Err(Error::DuplicateSystem { system: any::type_name::<Movement>() })
    );
    assert_eq!(registry.get_system::<Movement>().map(|system| system.ticks), Ok(1));
}

#[test]
fn test_required_signature() {
    let mut registry = registry();
    registry.add_system(Render::default()).expect("new system");

    let types = registry.component_types();
    let position = types.get::<Position>().expect("registered by require");
    let sprite = types.get::<Sprite>().expect("registered by require");
    assert_eq!(types.get::<Velocity>(), None);

    let signature = registry.system_base::<Render>().expect("registered").signature();
    assert_eq!(*signature, [position, sprite].into_iter().collect::<Signature>());
}

#[test]
fn test_removed_system_is_not_backfilled() {
    let mut registry = registry();
    let entity = registry.create_entity();
    registry.add_component(entity, Position::default()).expect("valid entity");
    registry.update();

    registry.add_system(Locator).expect("new system");
    registry.remove_system::<Locator>().expect("registered");

    let tracer = EventTracer::<Event>::new([]);
    registry.update_traced(&tracer);
    assert_eq!(tracer.get_events(), vec![
        Event::Start,
        Event::End { activated: 0, killed: 0, reevaluated: 0 },
    ]);
}

#[test]
fn test_run_movement() {
    let mut registry = registry();
    registry.add_system(Movement::default()).expect("new system");

    let tank = registry.create_entity();
    registry.add_component(tank, Position { x: 10.0, y: 30.0 }).expect("valid entity");
    registry.add_component(tank, Velocity { dx: 40.0, dy: 0.0 }).expect("valid entity");
    let truck = registry.create_entity();
    registry.add_component(truck, Position { x: 50.0, y: 100.0 }).expect("valid entity");
    registry.update();

    registry
        .run_system::<Movement, _>(|system, entities, registry| system.update(entities, registry, 0.5))
        .expect("registered")
        .expect("components present");

    assert_eq!(registry.get_component::<Position>(tank), Ok(&Position { x: 30.0, y: 30.0 }));
    assert_eq!(registry.get_component::<Position>(truck), Ok(&Position { x: 50.0, y: 100.0 }));
    assert_eq!(registry.get_system::<Movement>().map(|system| system.ticks), Ok(1));
}

#[test]
fn test_run_render_sorts_by_z_index() {
    let mut registry = registry();
    registry.add_system(Render::default()).expect("new system");

    for (asset, z_index) in [("radar", 2), ("tree", 1), ("grass", 0)] {
        let mut entity = registry.spawn();
        entity.add(Position::default()).expect("valid entity");
        entity.add(Sprite::new(asset, z_index)).expect("valid entity");
    }
    registry.update();

    registry
        .run_system::<Render, _>(|system, entities, registry| system.update(entities, registry))
        .expect("registered")
        .expect("components present");

    let render = registry.get_system::<Render>().expect("registered");
    assert_eq!(render.drawn, vec![(2, "grass"), (1, "tree"), (0, "radar")]);
}

#[test]
fn test_running_system_is_busy() {
    let mut registry = registry();
    registry.add_system(Movement::default()).expect("new system");
    registry.add_system(Locator).expect("new system");

    let busy = Error::SystemBusy { system: any::type_name::<Movement>() };
    let nested = registry
        .run_system::<Movement, _>(|_, _, registry| {
            assert_eq!(registry.get_system::<Movement>().map(|_| ()), Err(busy.clone()));
            assert_eq!(registry.remove_system::<Movement>().map(|_| ()), Err(busy.clone()));
            assert_eq!(registry.run_system::<Movement, _>(|_, _, _| ()), Err(busy.clone()));
            registry.run_system::<Locator, _>(|_, _, _| "nested")
        })
        .expect("registered");

    assert_eq!(nested, Ok("nested"));
    assert!(registry.get_system::<Movement>().is_ok());
}

#[test]
fn test_system_spawns_during_run() {
    let mut registry = registry();
    registry.add_system(Locator).expect("new system");

    let parent = registry.create_entity();
    registry.add_component(parent, Position::default()).expect("valid entity");
    registry.update();

    let child = registry
        .run_system::<Locator, _>(|_, entities, registry| {
            assert_eq!(entities, [parent]);
            let child = registry.create_entity();
            registry.add_component(child, Position::default()).expect("valid entity");
            assert_eq!(registry.system_entities::<Locator>(), Ok(vec![parent]));
            child
        })
        .expect("registered");

    registry.update();
    assert_eq!(registry.system_entities::<Locator>(), Ok(vec![parent, child]));
}

#[test]
fn test_require_capacity_error_propagates() {
    struct Greedy;

    impl System for Greedy {
        fn require(&self, require: &mut Require<'_>) -> Result<()> {
            macro_rules! require_all {
                ($($n:literal)*) => {
                    $(require.component::<[u8; $n]>()?;)*
                };
            }
            require_all!(0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16 17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32);
            Ok(())
        }
    }

    let mut registry = registry();
    assert_eq!(
        registry.add_system(Greedy),
        Err(Error::TooManyComponentTypes { name: any::type_name::<[u8; 32]>(), max: 32 })
    );
    assert!(!registry.has_system::<Greedy>());
}
