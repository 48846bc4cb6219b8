use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use super::{ReconcilePolicy, Registry};
use crate::comp::ComponentTypes;
use crate::entity::RegistryId;

/// The default number of slots preallocated in each component pool.
pub const DEFAULT_POOL_CAPACITY: usize = 100;

/// Configures a [`Registry`].
///
/// ```
/// use std::sync::Arc;
/// use signet::comp::ComponentTypes;
/// use signet::registry::{Builder, ReconcilePolicy};
///
/// let registry = Builder::default()
///     .component_types(Arc::new(ComponentTypes::new()))
///     .reconcile_policy(ReconcilePolicy::ActivationOnly)
///     .build();
/// assert_eq!(registry.policy(), ReconcilePolicy::ActivationOnly);
/// ```
#[must_use = "call .build() to create the registry"]
pub struct Builder {
    component_types: Option<Arc<ComponentTypes>>,
    policy:          ReconcilePolicy,
    entity_capacity: usize,
    pool_capacity:   usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            component_types: None,
            policy:          ReconcilePolicy::default(),
            entity_capacity: 0,
            pool_capacity:   DEFAULT_POOL_CAPACITY,
        }
    }
}

impl Builder {
    /// Uses `types` instead of the process-wide [`ComponentTypes::global`] table.
    pub fn component_types(mut self, types: Arc<ComponentTypes>) -> Self {
        self.component_types = Some(types);
        self
    }

    /// Sets the reconcile policy.
    pub fn reconcile_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reserves space for `capacity` entities.
    pub fn entity_capacity(mut self, capacity: usize) -> Self {
        self.entity_capacity = capacity;
        self
    }

    /// Sets the number of slots each component pool is created with.
    pub fn pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    /// Creates the registry.
    pub fn build(self) -> Registry {
        let types = self.component_types.unwrap_or_else(ComponentTypes::global);
        log::debug!(
            "Building registry with {:?} policy and pool capacity {}",
            self.policy,
            self.pool_capacity
        );

        Registry {
            id: RegistryId::next(),
            types,
            policy: self.policy,
            pool_capacity: self.pool_capacity,
            records: Vec::with_capacity(self.entity_capacity),
            live: 0,
            pools: Vec::new(),
            systems: IndexMap::new(),
            to_activate: IndexSet::with_capacity(self.entity_capacity),
            to_kill: IndexSet::new(),
            to_reevaluate: IndexSet::new(),
            to_backfill: Vec::new(),
        }
    }
}
