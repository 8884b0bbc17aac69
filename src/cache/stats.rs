//! Cache Statistics Module
//!
//! Tracks lookups, hits, evictions and expirations for observability.

use serde::Serialize;

// == Cache Stats ==
/// Cumulative cache counters plus the current entry count.
///
/// Counters survive `clear()` and only go back to zero on an explicit reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Current number of entries in the cache
    pub size: usize,
    /// Number of `get` lookups
    pub total_requests: u64,
    /// Number of lookups answered from the cache
    pub cache_hits: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Number of entries purged because their TTL elapsed
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns cache_hits / total_requests, or 0.0 if no lookups were made.
    pub fn hit_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.total_requests as f64
        }
    }

    /// Lookups that were not served from the cache.
    pub fn misses(&self) -> u64 {
        self.total_requests - self.cache_hits
    }

    // == Record Lookup ==
    pub fn record_request(&mut self) {
        self.total_requests += 1;
    }

    pub fn record_hit(&mut self) {
        self.cache_hits += 1;
    }

    // == Record Eviction ==
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    // == Reset ==
    /// Zeroes every counter while keeping the entry count.
    pub fn reset(&mut self) {
        *self = Self {
            size: self.size,
            ..Self::default()
        };
    }
}
