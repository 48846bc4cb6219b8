use std::any::{self, Any};

use super::Pool;
use crate::comp::Component;

/// A type-erased [`Pool`].
///
/// The registry downcasts it back with [`as_any`](Self::as_any)
/// using the component type that created it.
pub trait AnyPool: Send {
    /// Returns the name of the stored component type.
    fn component_name(&self) -> &'static str;

    /// See [`Pool::len`].
    fn len(&self) -> usize;

    /// See [`Pool::resize_at_least`].
    fn resize_at_least(&mut self, len: usize);

    /// Drops the value in slot `index`, if any.
    fn drop_slot(&mut self, index: usize);

    /// Upcasts to [`Any`] for downcasting to the concrete pool.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts to [`Any`] for downcasting to the concrete pool.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyPool for Pool<T> {
    fn component_name(&self) -> &'static str { any::type_name::<T>() }

    fn len(&self) -> usize { Pool::len(self) }

    fn resize_at_least(&mut self, len: usize) { Pool::resize_at_least(self, len) }

    fn drop_slot(&mut self, index: usize) { drop(self.take(index)); }

    fn as_any(&self) -> &dyn Any { self }

    fn as_any_mut(&mut self) -> &mut dyn Any { self }
}

impl dyn AnyPool {
    /// Downcasts to the concrete pool of `T`.
    ///
    /// # Panics
    /// Panics if this pool does not store `T`.
    pub fn typed<T: Component>(&self) -> &Pool<T> {
        match self.as_any().downcast_ref::<Pool<T>>() {
            Some(pool) => pool,
            None => panic!(
                "TypeId mismatch: expected pool of {}, got pool of {}",
                any::type_name::<T>(),
                self.component_name()
            ),
        }
    }

    /// Downcasts to the concrete pool of `T`.
    ///
    /// # Panics
    /// Panics if this pool does not store `T`.
    pub fn typed_mut<T: Component>(&mut self) -> &mut Pool<T> {
        let name = self.component_name();
        match self.as_any_mut().downcast_mut::<Pool<T>>() {
            Some(pool) => pool,
            None => panic!(
                "TypeId mismatch: expected pool of {}, got pool of {name}",
                any::type_name::<T>(),
            ),
        }
    }
}
