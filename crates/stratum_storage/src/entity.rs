//! Entity lifecycle management with index recycling.
//!
//! The `EntityManager` hands out indices from a fixed-capacity table and
//! tracks which ones are currently active.

use stratum_foundation::{EntityId, Error, Result};

/// Manages entity allocation, recycling, and liveness.
///
/// Entities are allocated from a free list when available, otherwise the
/// next sequential index is taken. When an entity is destroyed, its index
/// is pushed onto the free list. Capacity is fixed at construction.
#[derive(Debug, Clone)]
pub struct EntityManager {
    /// Liveness flag for each allocated index.
    active: Vec<bool>,
    /// Free list of indices available for reuse.
    free_list: Vec<u32>,
    /// Maximum number of simultaneously allocated indices.
    capacity: usize,
    /// Count of live entities.
    live_count: usize,
}

impl EntityManager {
    /// Creates an entity manager with a fixed capacity.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `capacity` is zero or does not fit
    /// in an entity index.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::configuration("entity capacity must be at least 1"));
        }
        if u32::try_from(capacity).is_err() {
            return Err(Error::configuration(format!(
                "entity capacity {capacity} exceeds the index range"
            )));
        }
        Ok(Self {
            active: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            capacity,
            live_count: 0,
        })
    }

    /// Creates a new entity, returns its ID.
    ///
    /// Reuses the most recently freed index when available.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExceeded` once every index is in use.
    pub fn create(&mut self) -> Result<EntityId> {
        let id = if let Some(index) = self.free_list.pop() {
            self.active[index as usize] = true;
            EntityId::new(index)
        } else {
            if self.active.len() >= self.capacity {
                return Err(Error::capacity_exceeded(self.capacity));
            }
            // Capacity was checked against u32 at construction.
            #[allow(clippy::cast_possible_truncation)]
            let index = self.active.len() as u32;
            self.active.push(true);
            EntityId::new(index)
        };

        self.live_count += 1;
        Ok(id)
    }

    /// Destroys an entity and returns its index to the free list.
    ///
    /// # Errors
    ///
    /// Returns `StaleEntity` if the entity is not currently active,
    /// including a second destroy of the same id.
    pub fn destroy(&mut self, id: EntityId) -> Result<()> {
        self.validate(id)?;

        self.active[id.index()] = false;
        self.free_list.push(id.raw());
        self.live_count -= 1;

        Ok(())
    }

    /// Checks if an entity is currently active.
    #[must_use]
    pub fn is_valid(&self, id: EntityId) -> bool {
        self.active.get(id.index()).copied().unwrap_or(false)
    }

    /// Validates that an entity is live.
    ///
    /// # Errors
    ///
    /// Returns `StaleEntity` if the entity is inactive or never existed.
    pub fn validate(&self, id: EntityId) -> Result<()> {
        if self.is_valid(id) {
            Ok(())
        } else {
            Err(Error::stale_entity(id))
        }
    }

    /// Returns the number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Returns the fixed capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over all live entity IDs in ascending index order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.active
            .iter()
            .enumerate()
            .filter(|(_, live)| **live)
            .map(|(idx, _)| EntityId::new(idx as u32))
    }

    /// Returns the live entity IDs in ascending index order.
    #[must_use]
    pub fn active_ids(&self) -> Vec<EntityId> {
        self.iter().collect()
    }
}
