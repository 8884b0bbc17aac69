//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{
    CacheEntry, CacheStats, Clock, EntryMetadata, EvictionPolicy, LruTracker, SystemClock,
};
use crate::config::CacheConfig;
use crate::error::Result;

// == Cache Store ==
/// Bounded cache storage with LRU eviction and lazy TTL expiration.
///
/// The store is not synchronized; share it through
/// [`crate::request::RequestCache`], which serializes every operation behind
/// one lock.
#[derive(Debug)]
pub struct CacheStore<V, P = LruTracker> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Eviction index, always tracking exactly the keys of `entries`
    policy: P,
    /// Cumulative counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL for entries stored without an explicit one
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
    /// Logical recency counter, bumped on every insert and hit
    tick: u64,
}

impl<V> CacheStore<V, LruTracker> {
    // == Constructor ==
    /// Creates a store with the system clock and LRU eviction.
    ///
    /// Fails with `CacheError::InvalidConfig` on zero capacity or zero TTL.
    pub fn new(config: CacheConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a store reading time from `clock`.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::with_policy(config, clock, LruTracker::new())
    }
}

impl<V, P: EvictionPolicy> CacheStore<V, P> {
    /// Creates a store with a custom eviction policy.
    pub fn with_policy(config: CacheConfig, clock: Arc<dyn Clock>, policy: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            entries: HashMap::new(),
            policy,
            stats: CacheStats::new(),
            capacity: config.capacity,
            default_ttl: config.default_ttl,
            clock,
            tick: 0,
        })
    }

    // == Get ==
    /// Looks up `key`, counting the lookup in the statistics.
    ///
    /// An expired entry is removed on discovery and reported as absent. A hit
    /// refreshes the entry's recency and access count.
    pub fn get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.stats.record_request();
        let now = self.clock.now();

        let Some(entry) = self.entries.get_mut(key) else {
            debug!(key, "cache miss");
            return None;
        };

        if entry.is_expired(now) {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            debug!(key, "cache miss: entry expired");
            return None;
        }

        self.tick += 1;
        entry.touch(now, self.tick);
        self.policy.touch(key, entry.stamp());
        self.stats.record_hit();
        debug!(key, access_count = entry.access_count, "cache hit");
        Some(entry.value.clone())
    }

    // == Put ==
    /// Stores `value` under `key` for `ttl` (or the default TTL).
    ///
    /// Overwriting an existing key first prunes every expired entry. Inserting
    /// a new key into a full store evicts the least recently used entry. A zero
    /// TTL stores nothing and drops any previous value for the key.
    pub fn put(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let ttl = ttl.unwrap_or(self.default_ttl);

        if ttl.is_zero() {
            self.remove_entry(&key);
            debug!(key = %key, "zero TTL, value not cached");
            return;
        }

        if self.entries.contains_key(&key) {
            let pruned = self.cleanup_expired();
            if pruned > 0 {
                debug!(pruned, "pruned expired entries on overwrite");
            }
        }

        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.entries.len() >= self.capacity {
            self.evict_one();
        }

        let now = self.clock.now();
        self.tick += 1;
        let entry = CacheEntry::new(value, ttl, now, self.tick);
        self.policy.touch(&key, entry.stamp());
        self.entries.insert(key, entry);
    }

    // == Remove ==
    /// Deletes `key`. Returns whether an entry was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Clear ==
    /// Drops every entry. Statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.policy.clear();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.len(),
            ..self.stats
        }
    }

    /// Zeroes the cumulative counters.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        self.stats.record_expirations(expired_keys.len());
        expired_keys.len()
    }

    /// Bookkeeping for `key` without counting a lookup or touching recency.
    pub fn entry_metadata(&self, key: &str) -> Option<EntryMetadata> {
        let now = self.clock.now();
        self.entries
            .get(key)
            .map(|entry| EntryMetadata::of(entry, now))
    }

    /// The key the next eviction would remove.
    pub fn peek_victim(&self) -> Option<&str> {
        self.policy.peek_oldest()
    }

    /// Whether `key` is stored, expired or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.policy.remove(key);
            true
        } else {
            false
        }
    }

    fn evict_one(&mut self) {
        if let Some(evicted) = self.policy.evict_oldest() {
            self.entries.remove(&evicted);
            self.stats.record_eviction();
            debug!(key = %evicted, "evicted least recently used entry");
        }
    }
}
