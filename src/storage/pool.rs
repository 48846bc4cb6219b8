use crate::{Error, Result};

/// Dense storage of components of type `T`, indexed by entity identity.
///
/// A pool only grows; slots keep their values across resizes.
/// Slots that were never written read as `None`.
pub struct Pool<T> {
    cardinality: usize,
    data:        Vec<Option<T>>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self { Self { cardinality: 0, data: Vec::new() } }
}

impl<T> Pool<T> {
    /// Creates a pool with `len` empty slots.
    pub fn with_len(len: usize) -> Self {
        let mut pool = Self::default();
        pool.resize_at_least(len);
        pool
    }

    /// Returns the number of slots.
    pub fn len(&self) -> usize { self.data.len() }

    /// Returns whether the pool has no slots.
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Returns the number of slots holding a value.
    pub fn cardinality(&self) -> usize { self.cardinality }

    /// Grows the pool to at least `len` slots. Never shrinks.
    pub fn resize_at_least(&mut self, len: usize) {
        if self.data.len() < len {
            self.data.resize_with(len, || None);
        }
    }

    /// Writes `value` into slot `index`, returning the value previously stored there.
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if the pool was not resized to cover `index`.
    pub fn set(&mut self, index: usize, value: T) -> Result<Option<T>> {
        let len = self.data.len();
        let slot = self.data.get_mut(index).ok_or(Error::OutOfBounds { index, len })?;

        let old = slot.replace(value);
        if old.is_none() {
            self.cardinality += 1;
        }
        Ok(old)
    }

    /// Empties slot `index`, returning its value.
    pub fn take(&mut self, index: usize) -> Option<T> {
        let old = self.data.get_mut(index)?.take();
        if old.is_some() {
            self.cardinality -= 1;
        }
        old
    }

    /// Gets a shared reference to the value in slot `index`.
    pub fn get(&self, index: usize) -> Option<&T> { self.data.get(index)?.as_ref() }

    /// Gets a mutable reference to the value in slot `index`.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> { self.data.get_mut(index)?.as_mut() }

    /// Iterates over all written slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        self.data.iter().enumerate().filter_map(|(index, slot)| Some((index, slot.as_ref()?)))
    }
}
