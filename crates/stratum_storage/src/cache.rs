//! Least-recently-used memoization of query results, keyed by requirement mask.
//!
//! Invalidation is selective: a composition change touching component bits
//! `B` drops only the entries whose mask intersects `B`. Unrelated cached
//! queries survive unrelated mutations.

use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::bitset::ComponentMask;

/// Counters describing cache behavior since construction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found no entry.
    pub misses: u64,
    /// Entries dropped to make room for a new one.
    pub evictions: u64,
    /// Entries dropped because a mutation touched their mask.
    pub invalidations: u64,
}

/// Bounded LRU cache from requirement mask to query result.
///
/// A capacity of zero disables caching: lookups always miss and inserts
/// are ignored.
#[derive(Clone, Debug)]
pub struct QueryCache<V> {
    entries: HashMap<ComponentMask, V>,
    /// Recency order, least recently used at the front.
    order: VecDeque<ComponentMask>,
    capacity: usize,
    stats: CacheStats,
}

impl<V: Clone> QueryCache<V> {
    /// Creates a cache holding at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            stats: CacheStats::default(),
        }
    }

    /// Returns true if the cache can hold entries.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    /// Returns the configured capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks for an entry without touching recency or counters.
    #[must_use]
    pub fn contains(&self, mask: ComponentMask) -> bool {
        self.entries.contains_key(&mask)
    }

    /// Looks up an entry and promotes it to most recently used.
    pub fn get(&mut self, mask: ComponentMask) -> Option<V> {
        if let Some(value) = self.entries.get(&mask) {
            self.stats.hits += 1;
            let value = value.clone();
            self.touch(mask);
            Some(value)
        } else {
            self.stats.misses += 1;
            None
        }
    }

    /// Stores an entry as most recently used, evicting the least recently
    /// used entry first if the cache is full.
    pub fn insert(&mut self, mask: ComponentMask, value: V) {
        if !self.is_enabled() {
            return;
        }
        if self.entries.insert(mask, value).is_some() {
            self.touch(mask);
            return;
        }
        if self.entries.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
                self.stats.evictions += 1;
                debug!(mask = ?oldest, "evicted least recently used query");
            }
        }
        self.order.push_back(mask);
    }

    /// Drops every entry whose mask shares a bit with `changed`.
    ///
    /// Returns the number of entries dropped.
    pub fn invalidate(&mut self, changed: ComponentMask) -> usize {
        if changed.is_empty() || self.entries.is_empty() {
            return 0;
        }
        let before = self.entries.len();
        self.entries.retain(|mask, _| !mask.intersects(changed));
        let dropped = before - self.entries.len();
        if dropped > 0 {
            self.order.retain(|mask| !mask.intersects(changed));
            self.stats.invalidations += dropped as u64;
            debug!(?changed, dropped, "invalidated cached queries");
        }
        dropped
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Returns the cache counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn touch(&mut self, mask: ComponentMask) {
        if let Some(pos) = self.order.iter().position(|m| *m == mask) {
            self.order.remove(pos);
        }
        self.order.push_back(mask);
    }
}
