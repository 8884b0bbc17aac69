//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheStats, EntryMetadata};

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Current number of entries in cache
    pub size: usize,
    /// Number of lookups
    pub total_requests: u64,
    /// Number of lookups served from the cache
    pub cache_hits: u64,
    pub misses: u64,
    /// Number of LRU evictions
    pub evictions: u64,
    /// Number of entries purged after their TTL elapsed
    pub expirations: u64,
    /// Hit rate (cache_hits / total_requests)
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            size: stats.size,
            total_requests: stats.total_requests,
            cache_hits: stats.cache_hits,
            misses: stats.misses(),
            evictions: stats.evictions,
            expirations: stats.expirations,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for GET /cache/*key
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub key: String,
    pub access_count: u64,
    /// Seconds since the entry was stored
    pub age_secs: f64,
    /// Seconds since the entry was last read
    pub idle_secs: f64,
    pub ttl_secs: f64,
    pub ttl_remaining_secs: f64,
}

impl EntryResponse {
    pub fn new(key: impl Into<String>, meta: EntryMetadata) -> Self {
        Self {
            key: key.into(),
            access_count: meta.access_count,
            age_secs: meta.age.as_secs_f64(),
            idle_secs: meta.idle.as_secs_f64(),
            ttl_secs: meta.ttl.as_secs_f64(),
            ttl_remaining_secs: meta.ttl_remaining.as_secs_f64(),
        }
    }
}

/// Response body for DELETE /cache/*key
#[derive(Debug, Clone, Serialize)]
pub struct RemoveResponse {
    /// The key that was targeted
    pub key: String,
    /// Whether an entry was actually present
    pub removed: bool,
}

impl RemoveResponse {
    pub fn new(key: impl Into<String>, removed: bool) -> Self {
        Self {
            key: key.into(),
            removed,
        }
    }
}

/// Response body for DELETE /cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
