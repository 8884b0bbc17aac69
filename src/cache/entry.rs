//! Cache Entry Module
//!
//! Defines a single cached result together with its TTL and access metadata.

use std::time::{Duration, Instant};

use crate::cache::lru::AccessStamp;

// == Cache Entry ==
/// A cached value with expiration and recency metadata.
///
/// `last_accessed_at` is never earlier than `stored_at`. Entries are created
/// and touched only by the store, which owns the recency tick:
///
/// ```compile_fail
/// use request_cache::cache::CacheEntry;
///
/// fn reorder(entry: &mut CacheEntry<u32>) {
///     entry.tick = 0;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached payload
    pub value: V,
    /// Creation time
    pub stored_at: Instant,
    /// Validity window starting at `stored_at`
    pub ttl: Duration,
    /// Time of the last successful read (or creation)
    pub last_accessed_at: Instant,
    /// Number of cache hits served from this entry
    pub access_count: u64,
    /// Store-wide logical time of the last insert or hit
    pub(crate) tick: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a fresh entry stored at `now`.
    pub(crate) fn new(value: V, ttl: Duration, now: Instant, tick: u64) -> Self {
        Self {
            value,
            stored_at: now,
            ttl,
            last_accessed_at: now,
            access_count: 0,
            tick,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry is stale at `now`.
    ///
    /// Once the full TTL has elapsed the entry is expired, so an entry read
    /// exactly at `stored_at + ttl` is already gone.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.age(now) >= self.ttl
    }

    // == Touch ==
    /// Records a cache hit at `now` with the store's logical `tick`.
    pub(crate) fn touch(&mut self, now: Instant, tick: u64) {
        // Never moves backwards, so it stays >= stored_at.
        self.last_accessed_at = now.max(self.last_accessed_at);
        self.access_count += 1;
        self.tick = tick;
    }

    /// Time elapsed since the entry was stored.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.stored_at)
    }

    /// Time elapsed since the entry was last read.
    pub fn idle(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_accessed_at)
    }

    // == Time To Live ==
    /// Remaining validity, `Duration::ZERO` once expired.
    pub fn ttl_remaining(&self, now: Instant) -> Duration {
        self.ttl.saturating_sub(self.age(now))
    }

    /// Ordering key used by the eviction policy.
    pub fn stamp(&self) -> AccessStamp {
        AccessStamp {
            last_accessed: self.last_accessed_at,
            tick: self.tick,
        }
    }
}

// == Entry Metadata ==
/// Read-only view of an entry's bookkeeping, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryMetadata {
    pub access_count: u64,
    pub age: Duration,
    pub idle: Duration,
    pub ttl: Duration,
    pub ttl_remaining: Duration,
}

impl EntryMetadata {
    pub(crate) fn of<V>(entry: &CacheEntry<V>, now: Instant) -> Self {
        Self {
            access_count: entry.access_count,
            age: entry.age(now),
            idle: entry.idle(now),
            ttl: entry.ttl,
            ttl_remaining: entry.ttl_remaining(now),
        }
    }
}
