//! Configuration Module
//!
//! Cache construction parameters and the server configuration loaded from
//! environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default maximum number of cached entries.
pub const DEFAULT_CAPACITY: usize = 100;

/// Default time-to-live for entries stored without an explicit TTL.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Default background sweep interval, in seconds.
pub const DEFAULT_CLEANUP_INTERVAL: u64 = 60;

// == Cache Config ==
/// Construction-time parameters of a cache store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Hard upper bound on the number of entries
    pub capacity: usize,
    /// TTL applied when a caller does not specify one
    pub default_ttl: Duration,
}

impl CacheConfig {
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        Self {
            capacity,
            default_ttl,
        }
    }

    /// Rejects a zero capacity or a zero default TTL. Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfig(
                "capacity must be greater than zero".to_string(),
            ));
        }
        if self.default_ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "default TTL must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

// == Server Config ==
/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub capacity: usize,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Base URL the read-through proxy forwards misses to
    pub upstream_url: String,
    /// Upstream request timeout in seconds
    pub upstream_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cache entries (default: 100)
    /// - `CACHE_DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60, or the
    ///   default TTL when that is shorter)
    /// - `UPSTREAM_URL` - Backend base URL (default: http://127.0.0.1:8080)
    /// - `UPSTREAM_TIMEOUT` - Backend timeout in seconds (default: 10)
    ///
    /// Unparseable values fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let default_ttl = env_or("CACHE_DEFAULT_TTL", defaults.default_ttl);
        Self {
            capacity: env_or("CACHE_CAPACITY", defaults.capacity),
            default_ttl,
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or(
                "CLEANUP_INTERVAL",
                defaults.cleanup_interval.min(default_ttl),
            ),
            upstream_url: env_or("UPSTREAM_URL", defaults.upstream_url),
            upstream_timeout: env_or("UPSTREAM_TIMEOUT", defaults.upstream_timeout),
        }
    }

    /// Cache parameters carried by this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new(self.capacity, Duration::from_secs(self.default_ttl))
    }

    /// Checks every value that would otherwise fail later at runtime.
    ///
    /// The cleanup interval may not exceed the default TTL, so an expired
    /// entry that is never read again is swept within two TTL periods.
    pub fn validate(&self) -> Result<()> {
        self.cache_config().validate()?;
        if self.cleanup_interval == 0 {
            return Err(CacheError::InvalidConfig(
                "cleanup interval must be greater than zero".to_string(),
            ));
        }
        if self.cleanup_interval > self.default_ttl {
            return Err(CacheError::InvalidConfig(format!(
                "cleanup interval ({}s) must not exceed the default TTL ({}s)",
                self.cleanup_interval, self.default_ttl
            )));
        }
        if self.upstream_url.trim().is_empty() {
            return Err(CacheError::InvalidConfig(
                "upstream URL must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            default_ttl: DEFAULT_TTL.as_secs(),
            server_port: 3000,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            upstream_url: "http://127.0.0.1:8080".to_string(),
            upstream_timeout: 10,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
