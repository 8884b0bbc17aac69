//! API Handlers
//!
//! HTTP request handlers for the read-through proxy and the cache admin endpoints.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{ClearResponse, EntryResponse, HealthResponse, RemoveResponse, StatsResponse};
use crate::request::RequestCache;
use crate::upstream::{CachedResponse, Upstream};

/// Response header reporting whether the proxy served from cache.
pub const X_CACHE: &str = "x-cache";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared response cache
    pub cache: RequestCache<CachedResponse>,
    /// Backend the proxy reads through to
    pub upstream: Upstream,
}

impl AppState {
    /// Creates a new AppState from an existing cache and upstream client.
    pub fn new(cache: RequestCache<CachedResponse>, upstream: Upstream) -> Self {
        Self { cache, upstream }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Fails when the cache parameters are invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = RequestCache::new(config.cache_config())?;
        let upstream = Upstream::from_config(config)?;
        Ok(Self::new(cache, upstream))
    }
}

/// Handler for GET /proxy/*path
///
/// Serves the upstream resource from cache when fresh, otherwise fetches it,
/// caches it and returns it. `Cache-Control: no-cache` forces a refresh.
pub async fn proxy_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Result<Response> {
    let resource = validate_resource(&path)?;
    let params = query_params(&query);
    let force = wants_refresh(&headers);

    let mut fetched = false;
    let cached = state
        .cache
        .cached_resource(&resource, Some(&params), None, force, || {
            fetched = true;
            state.upstream.fetch(&resource, &query)
        })
        .await?;

    let status = StatusCode::from_u16(cached.status).unwrap_or(StatusCode::OK);
    let mut response = (status, cached.body).into_response();

    if let Some(content_type) = cached
        .content_type
        .as_deref()
        .and_then(|v| HeaderValue::from_str(v).ok())
    {
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, content_type);
    }
    response.headers_mut().insert(
        X_CACHE,
        HeaderValue::from_static(if fetched { "MISS" } else { "HIT" }),
    );

    Ok(response)
}

/// Handler for GET /cache/*key
///
/// Returns an entry's bookkeeping without counting a lookup.
pub async fn entry_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<EntryResponse>> {
    let key = validate_key(key)?;
    let meta = state
        .cache
        .entry_metadata(&key)
        .await
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(EntryResponse::new(key, meta)))
}

/// Handler for DELETE /cache/*key
///
/// Removing an absent key is not an error.
pub async fn remove_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<RemoveResponse>> {
    let key = validate_key(key)?;
    let removed = state.cache.remove(&key).await;

    Ok(Json(RemoveResponse::new(key, removed)))
}

/// Handler for DELETE /cache
///
/// Drops every entry; statistics are kept.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    state.cache.clear().await;
    Json(ClearResponse::cleared())
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.cache.stats().await.into())
}

/// Handler for DELETE /stats
///
/// Zeroes the counters and returns the fresh statistics.
pub async fn reset_stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    state.cache.reset_stats().await;
    Json(state.cache.stats().await.into())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Groups query pairs by name; repeated names become arrays in arrival order.
fn query_params(pairs: &[(String, String)]) -> Map<String, Value> {
    let mut params = Map::new();
    for (name, value) in pairs {
        let value = Value::String(value.clone());
        match params.get_mut(name) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                params.insert(name.clone(), value);
            }
        }
    }
    params
}

fn wants_refresh(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::CACHE_CONTROL)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|directive| directive.trim().eq_ignore_ascii_case("no-cache"))
}

/// Normalizes the proxied path to `/path`.
///
/// A decoded `?` would make the upstream URL carry a query the cache key does
/// not, so such paths are rejected.
fn validate_resource(path: &str) -> Result<String> {
    if path.contains('?') {
        return Err(CacheError::InvalidRequest(
            "Proxied path cannot contain '?'".to_string(),
        ));
    }
    Ok(format!("/{}", path.trim_start_matches('/')))
}

fn validate_key(key: String) -> Result<String> {
    if key.trim().is_empty() {
        return Err(CacheError::InvalidRequest("Key cannot be empty".to_string()));
    }
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use std::time::Duration;

    fn test_state() -> AppState {
        let cache = RequestCache::new(CacheConfig::default()).unwrap();
        let upstream = Upstream::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap();
        AppState::new(cache, upstream)
    }

    fn cached(body: &'static str) -> CachedResponse {
        CachedResponse {
            status: 200,
            content_type: Some("text/plain".to_string()),
            body: body.into(),
        }
    }

    #[tokio::test]
    async fn test_entry_and_remove_handler() {
        let state = test_state();
        state.cache.put("/users", cached("[]"), None).await;

        let entry = entry_handler(State(state.clone()), Path("/users".to_string()))
            .await
            .unwrap();
        assert_eq!(entry.access_count, 0);

        let removed = remove_handler(State(state.clone()), Path("/users".to_string()))
            .await
            .unwrap();
        assert!(removed.removed);

        let result = entry_handler(State(state), Path("/users".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_absent_key_is_ok() {
        let state = test_state();
        let response = remove_handler(State(state), Path("nonexistent".to_string()))
            .await
            .unwrap();
        assert!(!response.removed);
    }

    #[tokio::test]
    async fn test_remove_blank_key_is_rejected() {
        let state = test_state();
        let result = remove_handler(State(state), Path("  ".to_string())).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_clear_keeps_stats() {
        let state = test_state();
        state.cache.put("a", cached("x"), None).await;
        state.cache.get("a").await;

        clear_handler(State(state.clone())).await;

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.size, 0);
        assert_eq!(stats.cache_hits, 1);
    }

    #[tokio::test]
    async fn test_reset_stats_handler() {
        let state = test_state();
        state.cache.get("missing").await;

        let stats = reset_stats_handler(State(state)).await;
        assert_eq!(stats.total_requests, 0);
    }

    #[tokio::test]
    async fn test_proxy_serves_cached_entry_without_upstream() {
        let state = test_state();
        let key = crate::cache::generate_key_from_pairs("/users", [("page", "1")]);
        state.cache.put(key, cached("page one"), None).await;

        let response = proxy_handler(
            State(state),
            Path("users".to_string()),
            Query(vec![("page".to_string(), "1".to_string())]),
            HeaderMap::new(),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[X_CACHE], "HIT");
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    }

    #[tokio::test]
    async fn test_proxy_rejects_encoded_query_in_path() {
        let state = test_state();

        let result = proxy_handler(
            State(state.clone()),
            Path(r#"users?{"page":"1"}"#.to_string()),
            Query(Vec::new()),
            HeaderMap::new(),
        )
        .await;

        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
        assert!(state.cache.is_empty().await);
        assert_eq!(state.cache.stats().await.total_requests, 0);
    }

    #[test]
    fn test_validate_resource() {
        assert_eq!(validate_resource("users/1").unwrap(), "/users/1");
        assert_eq!(validate_resource("/users").unwrap(), "/users");
        assert!(validate_resource("users?page=1").is_err());
    }

    #[tokio::test]
    async fn test_proxy_upstream_failure_is_bad_gateway() {
        let state = test_state();

        let result = proxy_handler(
            State(state.clone()),
            Path("users".to_string()),
            Query(Vec::new()),
            HeaderMap::new(),
        )
        .await;

        assert!(matches!(result, Err(CacheError::Upstream(_))));
        assert!(state.cache.is_empty().await);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_query_params_groups_repeated_names() {
        let pairs = vec![
            ("tag".to_string(), "a".to_string()),
            ("page".to_string(), "2".to_string()),
            ("tag".to_string(), "b".to_string()),
            ("tag".to_string(), "c".to_string()),
        ];
        let params = query_params(&pairs);
        assert_eq!(params["page"], "2");
        assert_eq!(params["tag"], serde_json::json!(["a", "b", "c"]));
    }

    #[test]
    fn test_wants_refresh() {
        let mut headers = HeaderMap::new();
        assert!(!wants_refresh(&headers));

        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0, No-Cache"));
        assert!(wants_refresh(&headers));

        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        assert!(!wants_refresh(&headers));
    }
}
