use std::sync::Arc;

use indexmap::map::Entry;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::{Component, ComponentId, MAX_COMPONENT_TYPES};
use crate::util::DbgTypeId;
use crate::{Error, Result};

static GLOBAL: Lazy<Arc<ComponentTypes>> = Lazy::new(|| Arc::new(ComponentTypes::new()));

/// Assigns stable [`ComponentId`]s to component types.
///
/// IDs are assigned in registration order starting from 0 and are never reassigned.
/// The ID of a type is also its index in the table.
#[derive(Default)]
pub struct ComponentTypes {
    ids: RwLock<IndexMap<DbgTypeId, ComponentId>>,
}

impl ComponentTypes {
    /// Creates an empty table.
    pub fn new() -> Self { Self::default() }

    /// Returns the process-wide table.
    ///
    /// The table is created on first use and lives until the process exits.
    pub fn global() -> Arc<Self> { Arc::clone(&GLOBAL) }

    /// Returns the ID of `T`, registering it if it was never seen.
    ///
    /// # Errors
    /// Returns [`Error::TooManyComponentTypes`]
    /// if `T` is new and [`MAX_COMPONENT_TYPES`] types are already registered.
    pub fn id_of<T: Component>(&self) -> Result<ComponentId> {
        let ty = DbgTypeId::of::<T>();

        if let Some(&id) = self.ids.read().get(&ty) {
            return Ok(id);
        }

        let mut ids = self.ids.write();
        let len = ids.len();
        match ids.entry(ty) {
            // another registry may have raced between the two locks
            Entry::Occupied(entry) => Ok(*entry.get()),
            Entry::Vacant(entry) => {
                if len >= MAX_COMPONENT_TYPES {
                    return Err(Error::TooManyComponentTypes {
                        name: ty.name,
                        max:  MAX_COMPONENT_TYPES,
                    });
                }

                let id = ComponentId::new(len);
                entry.insert(id);
                log::debug!("Registered component type {ty} as #{id}");
                Ok(id)
            }
        }
    }

    /// Returns the ID of `T` if it has been registered.
    pub fn get<T: Component>(&self) -> Option<ComponentId> {
        self.ids.read().get(&DbgTypeId::of::<T>()).copied()
    }

    /// Returns the name of the type registered as `id`.
    pub fn name_of(&self, id: ComponentId) -> Option<&'static str> {
        self.ids.read().get_index(id.index()).map(|(ty, _)| ty.name)
    }

    /// Returns the number of registered types.
    pub fn len(&self) -> usize { self.ids.read().len() }

    /// Returns whether no types are registered.
    pub fn is_empty(&self) -> bool { self.ids.read().is_empty() }
}
