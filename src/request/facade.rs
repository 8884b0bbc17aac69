//! Read-through facade
//!
//! Shared, lock-guarded handle over a [`CacheStore`] exposing the
//! "return cached value if fresh, else fetch and store" contract.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{generate_key, CacheStats, CacheStore, Clock, EntryMetadata};
use crate::config::CacheConfig;
use crate::error::Result;

// == Request Cache ==
/// Cloneable handle to one cache store.
///
/// Every clone shares the same store. All mutations, including the
/// expiration purge inside `get`, run under one write lock; `stats` and
/// `entry_metadata` only need the read lock. Fetchers always run with no
/// lock held, so two concurrent misses on the same key both fetch and the
/// last `put` wins.
#[derive(Debug)]
pub struct RequestCache<V> {
    store: Arc<RwLock<CacheStore<V>>>,
}

impl<V> Clone for RequestCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<V: Clone> RequestCache<V> {
    // == Constructors ==
    /// Creates a cache from `config`, failing fast on invalid values.
    pub fn new(config: CacheConfig) -> Result<Self> {
        Ok(Self::from_store(CacheStore::new(config)?))
    }

    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        Ok(Self::from_store(CacheStore::with_clock(config, clock)?))
    }

    pub fn from_store(store: CacheStore<V>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    // == Cached Request ==
    /// Returns the cached value for `key`, or runs `fetcher` and caches its result.
    ///
    /// With `force` set the cache is bypassed for the read but still refreshed
    /// on success. A fetcher error is returned unchanged and leaves the store
    /// exactly as it was, including any earlier value for `key`.
    pub async fn cached_request<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        force: bool,
        fetcher: F,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        if !force {
            let cached = self.store.write().await.get(key);
            if let Some(value) = cached {
                return Ok(value);
            }
        }

        let value = match fetcher().await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, force, "fetch failed, cache left untouched");
                return Err(e);
            }
        };

        self.store.write().await.put(key, value.clone(), ttl);
        debug!(key, force, "stored fetched value");
        Ok(value)
    }

    /// [`Self::cached_request`] keyed by `resource` and its parameters.
    pub async fn cached_resource<F, Fut, E>(
        &self,
        resource: &str,
        params: Option<&Map<String, Value>>,
        ttl: Option<Duration>,
        force: bool,
        fetcher: F,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        let key = generate_key(resource, params);
        self.cached_request(&key, ttl, force, fetcher).await
    }

    // == Store Operations ==
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.write().await.get(key)
    }

    pub async fn put(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.store.write().await.put(key, value, ttl);
    }

    /// Removes `key`; returns whether it was present.
    pub async fn remove(&self, key: &str) -> bool {
        self.store.write().await.remove(key)
    }

    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    pub async fn reset_stats(&self) {
        self.store.write().await.reset_stats();
    }

    pub async fn cleanup_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    pub async fn entry_metadata(&self, key: &str) -> Option<EntryMetadata> {
        self.store.read().await.entry_metadata(key)
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}
