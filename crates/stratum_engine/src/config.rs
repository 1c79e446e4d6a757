//! Construction-time configuration for a [`crate::World`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use stratum_foundation::{Error, Result};

/// Default maximum number of live entities.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default number of cached query results.
pub const DEFAULT_QUERY_CACHE_CAPACITY: usize = 64;

/// Sizing for a world. Everything here is fixed once the world is built.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Maximum number of simultaneously live entities.
    pub capacity: usize,

    /// Maximum number of memoized query results; zero disables the cache.
    pub query_cache_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            query_cache_capacity: DEFAULT_QUERY_CACHE_CAPACITY,
        }
    }
}

impl WorldConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the entity capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Builder method to set the query cache capacity.
    #[must_use]
    pub fn with_query_cache_capacity(mut self, capacity: usize) -> Self {
        self.query_cache_capacity = capacity;
        self
    }

    /// Builder method to turn off query caching.
    #[must_use]
    pub fn without_query_cache(self) -> Self {
        self.with_query_cache_capacity(0)
    }

    /// Checks the configuration before anything is allocated.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the capacity is zero or exceeds the
    /// entity index range.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::configuration("capacity must be at least 1"));
        }
        if u32::try_from(self.capacity).is_err() {
            return Err(Error::configuration(format!(
                "capacity {} exceeds the entity index range",
                self.capacity
            )));
        }
        Ok(())
    }
}
