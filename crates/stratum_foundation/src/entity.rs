//! Entity identifiers.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Entity identifier addressing one slot of the fixed-capacity entity table.
///
/// Identifiers are plain indices: a destroyed entity's index is handed out
/// again by a later `create`. Liveness is decided by the entity manager's
/// active set, never by the identifier alone, so an id saved across a
/// destroy/create cycle compares equal to its successor.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityId(u32);

impl EntityId {
    /// Creates an entity ID for the given slot index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the storage slot this entity occupies.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw index value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<EntityId> for usize {
    fn from(id: EntityId) -> Self {
        id.index()
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}
