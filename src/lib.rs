//! Request Cache - A bounded read-through response cache
//!
//! Serves repeated idempotent reads from memory with TTL expiration and LRU
//! eviction, and ships a small caching proxy built on top of it.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod request;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use cache::{generate_key, CacheStats, CacheStore};
pub use config::{CacheConfig, Config};
pub use error::CacheError;
pub use request::RequestCache;
pub use tasks::spawn_cleanup_task;
