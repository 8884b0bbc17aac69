//! LRU Tracker Module
//!
//! Eviction policy seam and its least-recently-used implementation.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

// == Access Stamp ==
/// Recency ordering key for one cached entry.
///
/// Ordered by last access time, then by the store's logical access tick, so
/// the smallest stamp is always the eviction candidate. The tick keeps the
/// order strict when several touches land on the same clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccessStamp {
    pub last_accessed: Instant,
    pub tick: u64,
}

// == Eviction Policy ==
/// Decides which key a full store sheds before accepting a new one.
pub trait EvictionPolicy: std::fmt::Debug {
    /// Records an insert or access for `key`, replacing any previous stamp.
    ///
    /// Distinct keys must never share a stamp.
    fn touch(&mut self, key: &str, stamp: AccessStamp);

    /// Forgets `key`. No-op when untracked.
    fn remove(&mut self, key: &str);

    /// Returns the next eviction candidate without removing it.
    fn peek_oldest(&self) -> Option<&str>;

    /// Removes and returns the next eviction candidate.
    fn evict_oldest(&mut self) -> Option<String>;

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// == LRU Tracker ==
/// Strict LRU ordering over an ordered index.
///
/// `order` maps stamps to keys (smallest first = least recently used) and
/// `stamps` maps keys back to their current stamp, so touch, remove and evict
/// are all O(log n).
#[derive(Debug, Default)]
pub struct LruTracker {
    order: BTreeMap<AccessStamp, String>,
    stamps: HashMap<String, AccessStamp>,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.stamps.contains_key(key)
    }

    /// Current stamp recorded for `key`.
    pub fn stamp_of(&self, key: &str) -> Option<AccessStamp> {
        self.stamps.get(key).copied()
    }
}

impl EvictionPolicy for LruTracker {
    fn touch(&mut self, key: &str, stamp: AccessStamp) {
        if let Some(previous) = self.stamps.insert(key.to_string(), stamp) {
            self.order.remove(&previous);
        }
        self.order.insert(stamp, key.to_string());
    }

    fn remove(&mut self, key: &str) {
        if let Some(previous) = self.stamps.remove(key) {
            self.order.remove(&previous);
        }
    }

    fn peek_oldest(&self) -> Option<&str> {
        self.order.first_key_value().map(|(_, key)| key.as_str())
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.stamps.remove(&key);
        Some(key)
    }

    fn clear(&mut self) {
        self.order.clear();
        self.stamps.clear();
    }

    fn len(&self) -> usize {
        self.stamps.len()
    }
}
