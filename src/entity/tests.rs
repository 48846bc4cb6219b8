use std::collections::HashSet;

use super::{Entity, Raw, RegistryId};

static_assertions::assert_impl_all!(Entity: Copy, Send, Sync, Ord, std::hash::Hash);

#[test]
fn test_identity_only_comparison() {
    let first = RegistryId::next();
    let second = RegistryId::next();
    assert_ne!(first, second);

    let a = Entity::new(Raw::new(3), first);
    let b = Entity::new(Raw::new(3), second);
    let c = Entity::new(Raw::new(4), first);

    assert_eq!(a, b);
    assert!(a < c);
    assert_eq!([a, b, c].into_iter().collect::<HashSet<_>>().len(), 2);
}

#[test]
fn test_format() {
    let entity = Entity::new(Raw::new(12), RegistryId::next());
    assert_eq!(entity.to_string(), "#12");
    assert_eq!(format!("{entity:?}"), "Entity(#12)");
    assert_eq!(entity.id(), 12);
}
