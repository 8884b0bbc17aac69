//! Upstream Module
//!
//! HTTP client for the backend the read-through proxy sits in front of.

use std::time::Duration;

use axum::body::Bytes;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{CacheError, Result};

// == Cached Response ==
/// Upstream response body and the headers replayed on a cache hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

// == Upstream ==
/// Fetches resources from the configured backend.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: reqwest::Client,
    base_url: String,
}

impl Upstream {
    /// Creates a client for `base_url` with a per-request `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CacheError::InvalidConfig(format!("upstream client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.upstream_url.clone(),
            Duration::from_secs(config.upstream_timeout),
        )
    }

    /// Absolute URL for a resource path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    // == Fetch ==
    /// GETs `path` with `query` from the backend.
    ///
    /// Transport errors and non-2xx statuses are both reported as
    /// `CacheError::Upstream`, so neither is ever cached.
    pub async fn fetch(&self, path: &str, query: &[(String, String)]) -> Result<CachedResponse> {
        let url = self.url_for(path);
        debug!(url = %url, "fetching from upstream");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "upstream request failed");
                CacheError::Upstream(format!("{}: {}", url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "upstream returned error status");
            return Err(CacheError::Upstream(format!("{} returned {}", url, status)));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response
            .bytes()
            .await
            .map_err(|e| CacheError::Upstream(format!("{}: {}", url, e)))?;

        Ok(CachedResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
