use std::{fmt, hash};

use bitvec::prelude::{BitArr, BitArray, Lsb0};
use itertools::Itertools;

use super::{ComponentId, MAX_COMPONENT_TYPES};

type Bits = BitArr!(for MAX_COMPONENT_TYPES, in u32, Lsb0);

/// A fixed-width set of component types.
///
/// An entity signature has bit `c` set iff the entity owns component `c`.
/// A system signature has bit `c` set iff the system requires component `c`.
#[derive(Clone, Copy)]
pub struct Signature {
    bits: Bits,
}

impl Signature {
    /// Creates an empty signature.
    pub fn new() -> Self { Self { bits: BitArray::ZERO } }

    /// Sets or clears the bit for `id`.
    pub fn set(&mut self, id: ComponentId, value: bool) { self.bits.set(id.index(), value); }

    /// Tests the bit for `id`.
    pub fn test(&self, id: ComponentId) -> bool { self.bits[id.index()] }

    /// Returns whether every bit set in `required` is also set in `self`,
    /// i.e. `(self & required) == required`.
    pub fn contains(&self, required: &Signature) -> bool {
        self.bits
            .as_raw_slice()
            .iter()
            .zip(required.bits.as_raw_slice())
            .all(|(&have, &want)| have & want == want)
    }

    /// Clears all bits.
    pub fn clear(&mut self) { self.bits.fill(false); }

    /// Returns whether no bits are set.
    pub fn is_empty(&self) -> bool { self.bits.not_any() }

    /// Returns the number of bits set.
    pub fn len(&self) -> usize { self.bits.count_ones() }

    /// Iterates over the component IDs whose bits are set, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.bits.iter_ones().map(ComponentId::new)
    }
}

impl Default for Signature {
    fn default() -> Self { Self::new() }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool { self.bits.as_raw_slice() == other.bits.as_raw_slice() }
}

impl Eq for Signature {}

impl hash::Hash for Signature {
    fn hash<H: hash::Hasher>(&self, state: &mut H) { self.bits.as_raw_slice().hash(state) }
}

impl FromIterator<ComponentId> for Signature {
    fn from_iter<I: IntoIterator<Item = ComponentId>>(iter: I) -> Self {
        let mut signature = Self::new();
        for id in iter {
            signature.set(id, true);
        }
        signature
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "Signature{self}") }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}}}", self.iter().join(", "))
    }
}
