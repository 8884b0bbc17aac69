//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod clock;
mod entry;
mod key;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, EntryMetadata};
pub use key::{generate_key, generate_key_from_pairs};
pub use lru::{AccessStamp, EvictionPolicy, LruTracker};
pub use stats::CacheStats;
pub use store::CacheStore;
