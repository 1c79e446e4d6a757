//! Per-entity component membership bitsets.
//!
//! Every entity carries one fixed-width mask recording which component
//! types it currently has. Queries build a requirement mask the same way
//! and match with a superset test.

use std::fmt;

use stratum_foundation::{EntityId, Error, Result};

/// Maximum number of component types; one bit per type in a `u32` mask.
pub const MAX_COMPONENTS: usize = 32;

/// A set of component bit positions.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ComponentMask(u32);

impl ComponentMask {
    /// The mask with no bits set.
    pub const EMPTY: Self = Self(0);

    /// Creates a mask from its raw bits.
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Creates a mask with a single bit set.
    #[must_use]
    pub const fn bit(position: u8) -> Self {
        Self(1 << position)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns a mask with `position` added.
    #[must_use]
    pub const fn with(self, position: u8) -> Self {
        Self(self.0 | (1 << position))
    }

    /// Returns a mask with `position` removed.
    #[must_use]
    pub const fn without(self, position: u8) -> Self {
        Self(self.0 & !(1 << position))
    }

    /// Checks if `position` is set.
    #[must_use]
    pub const fn contains(self, position: u8) -> bool {
        self.0 & (1 << position) != 0
    }

    /// Checks if every bit of `other` is set in `self` (superset test).
    #[must_use]
    pub const fn contains_all(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Checks if `self` and `other` share at least one bit.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns true if no bits are set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of bits set.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates set bit positions in ascending order.
    pub fn positions(self) -> impl Iterator<Item = u8> {
        let mut remaining = self.0;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            #[allow(clippy::cast_possible_truncation)]
            let position = remaining.trailing_zeros() as u8;
            remaining &= remaining - 1;
            Some(position)
        })
    }
}

impl FromIterator<u8> for ComponentMask {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl fmt::Debug for ComponentMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentMask({:#034b})", self.0)
    }
}

/// Fixed-capacity table of per-entity component masks.
///
/// Pure bit arithmetic; knows nothing about component data. Callers are
/// responsible for passing in-range entities.
#[derive(Clone, Debug)]
pub struct BitsetManager {
    masks: Vec<ComponentMask>,
}

impl BitsetManager {
    /// Creates a bitset table for `capacity` entities.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `component_count` exceeds
    /// [`MAX_COMPONENTS`].
    pub fn new(component_count: usize, capacity: usize) -> Result<Self> {
        if component_count > MAX_COMPONENTS {
            return Err(Error::configuration(format!(
                "too many component types ({component_count}); maximum is {MAX_COMPONENTS}"
            )));
        }
        Ok(Self {
            masks: vec![ComponentMask::EMPTY; capacity],
        })
    }

    /// Sets `position` for `entity`.
    pub fn add(&mut self, entity: EntityId, position: u8) {
        let slot = &mut self.masks[entity.index()];
        *slot = slot.with(position);
    }

    /// Clears `position` for `entity`.
    pub fn remove(&mut self, entity: EntityId, position: u8) {
        let slot = &mut self.masks[entity.index()];
        *slot = slot.without(position);
    }

    /// Zeroes the mask of `entity`.
    pub fn clear(&mut self, entity: EntityId) {
        self.masks[entity.index()] = ComponentMask::EMPTY;
    }

    /// Checks if `entity` has `position` set.
    #[must_use]
    pub fn has(&self, entity: EntityId, position: u8) -> bool {
        self.masks[entity.index()].contains(position)
    }

    /// Returns the full mask of `entity`.
    #[must_use]
    pub fn mask_of(&self, entity: EntityId) -> ComponentMask {
        self.masks[entity.index()]
    }

    /// Builds a requirement mask from bit positions.
    #[must_use]
    pub fn create_mask(positions: &[u8]) -> ComponentMask {
        positions.iter().copied().collect()
    }

    /// Checks if `entity` carries at least every component in `mask`.
    ///
    /// Extra components on the entity are allowed.
    #[must_use]
    pub fn matches_mask(&self, entity: EntityId, mask: ComponentMask) -> bool {
        self.masks[entity.index()].contains_all(mask)
    }

    /// Returns the number of entity slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.masks.len()
    }
}
