//! Tests deferred entity destruction and handle validation.

use crate::test_util::*;
use crate::Error;

#[test]
fn test_kill_is_deferred() {
    let mut registry = registry();
    registry.add_system(Locator).expect("new system");

    let entity = registry.create_entity();
    registry.add_component(entity, Position { x: 1.0, y: 2.0 }).expect("valid entity");
    registry.update();

    registry.kill_entity(entity).expect("alive");
    assert!(registry.is_alive(entity));
    assert_eq!(registry.get_component::<Position>(entity), Ok(&Position { x: 1.0, y: 2.0 }));
    assert_eq!(registry.system_entities::<Locator>(), Ok(vec![entity]));

    registry.update();
    assert!(!registry.is_alive(entity));
    assert!(!registry.is_active(entity));
    assert_eq!(registry.system_entities::<Locator>(), Ok(vec![]));
    assert_eq!(registry.entity_count(), 0);
}

#[test]
fn test_dead_entity_is_rejected() {
    let mut registry = registry();
    let entity = registry.create_entity();
    registry.add_component(entity, Position::default()).expect("valid entity");
    registry.kill_entity(entity).expect("alive");
    registry.update();

    let dead = Error::DeadEntity { entity };
    assert_eq!(registry.has_component::<Position>(entity), Err(dead.clone()));
    assert_eq!(registry.remove_component::<Position>(entity), Err(dead.clone()));
    assert_eq!(registry.add_component(entity, Position::default()), Err(dead.clone()));
    assert_eq!(registry.kill_entity(entity), Err(dead));
    assert!(registry.entity(entity).is_err());
}

#[test]
fn test_kill_pending_entity() {
    let mut registry = registry();
    registry.add_system(Everything).expect("new system");

    let entity = registry.create_entity();
    registry.kill_entity(entity).expect("alive");
    registry.kill_entity(entity).expect("still alive until update");
    assert_eq!(registry.pending_kills(), 1);

    let tracer = EventTracer::<Event>::new([]);
    registry.update_traced(&tracer);
    assert_eq!(tracer.get_events(), vec![
        Event::Start,
        Event::Kill(0),
        Event::Backfill("Everything".to_string()),
        Event::End { activated: 0, killed: 1, reevaluated: 0 },
    ]);
    assert_eq!(registry.system_entities::<Everything>(), Ok(vec![]));
}

#[test]
fn test_identities_are_not_reused() {
    let mut registry = registry();
    let first = registry.create_entity();
    registry.kill_entity(first).expect("alive");
    registry.update();

    let second = registry.create_entity();
    assert_ne!(first, second);
    assert!(second > first);
    assert!(registry.is_alive(second));
    assert!(!registry.is_alive(first));
}

#[test]
fn test_foreign_entity_is_rejected() {
    let mut first = registry();
    let mut second = registry();

    let entity = first.create_entity();
    second.create_entity();

    let foreign = Error::ForeignEntity { entity };
    assert_eq!(second.has_component::<Position>(entity), Err(foreign.clone()));
    assert_eq!(second.kill_entity(entity), Err(foreign));
    assert!(!second.is_alive(entity));
    assert_eq!(second.pending_kills(), 0);
}
