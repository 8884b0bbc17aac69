//! Integration Tests for API Endpoints
//!
//! Drives the full router against a real upstream server bound on an
//! ephemeral local port.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::Query,
    http::{header, Request, StatusCode},
    response::Response,
    routing::get,
    Json, Router,
};
use request_cache::{
    api::{create_router, X_CACHE},
    upstream::Upstream,
    AppState, CacheConfig, RequestCache,
};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

/// Starts a backend that reports how many times it has been called.
async fn spawn_upstream() -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let backend = Router::new()
        .route(
            "/users",
            get(move |Query(query): Query<HashMap<String, String>>| {
                let counter = counter.clone();
                async move {
                    let call = counter.fetch_add(1, Ordering::SeqCst) + 1;
                    Json(json!({ "call": call, "query": query }))
                }
            }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, backend).await.unwrap();
    });

    (format!("http://{}", addr), calls)
}

async fn create_test_app() -> (Router, Arc<AtomicUsize>) {
    let (base_url, calls) = spawn_upstream().await;
    let cache = RequestCache::new(CacheConfig::new(100, Duration::from_secs(300))).unwrap();
    let upstream = Upstream::new(base_url, Duration::from_secs(5)).unwrap();
    (create_router(AppState::new(cache, upstream)), calls)
}

async fn send(app: &Router, method: &str, uri: &str) -> Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_to_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn cache_status(response: &Response) -> &str {
    response.headers()[X_CACHE].to_str().unwrap()
}

// == Read-Through Tests ==

#[tokio::test]
async fn test_proxy_miss_then_hit() {
    let (app, calls) = create_test_app().await;

    let first = send(&app, "GET", "/proxy/users?page=1").await;
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(cache_status(&first), "MISS");
    assert!(first.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .contains("application/json"));
    let first_json = body_to_json(first).await;
    assert_eq!(first_json["call"], 1);
    assert_eq!(first_json["query"]["page"], "1");

    let second = send(&app, "GET", "/proxy/users?page=1").await;
    assert_eq!(cache_status(&second), "HIT");
    assert_eq!(body_to_json(second).await["call"], 1);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_proxy_param_order_shares_entry() {
    let (app, calls) = create_test_app().await;

    let first = send(&app, "GET", "/proxy/users?page=1&sort=name").await;
    assert_eq!(cache_status(&first), "MISS");

    let reordered = send(&app, "GET", "/proxy/users?sort=name&page=1").await;
    assert_eq!(cache_status(&reordered), "HIT");

    let different = send(&app, "GET", "/proxy/users?page=2&sort=name").await;
    assert_eq!(cache_status(&different), "MISS");

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_proxy_forced_refresh() {
    let (app, calls) = create_test_app().await;

    send(&app, "GET", "/proxy/users").await;

    let refreshed = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/proxy/users")
                .header(header::CACHE_CONTROL, "no-cache")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(cache_status(&refreshed), "MISS");
    assert_eq!(body_to_json(refreshed).await["call"], 2);

    // The refreshed value replaced the old one.
    let after = send(&app, "GET", "/proxy/users").await;
    assert_eq!(cache_status(&after), "HIT");
    assert_eq!(body_to_json(after).await["call"], 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_proxy_upstream_error_is_not_cached() {
    let (app, _) = create_test_app().await;

    let response = send(&app, "GET", "/proxy/broken").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_to_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("500"));

    let entry = send(&app, "GET", "/cache/%2Fbroken").await;
    assert_eq!(entry.status(), StatusCode::NOT_FOUND);

    let stats = body_to_json(send(&app, "GET", "/stats").await).await;
    assert_eq!(stats["size"], 0);
}

#[tokio::test]
async fn test_encoded_query_in_path_cannot_fill_another_entry() {
    let (app, calls) = create_test_app().await;

    let smuggled = send(
        &app,
        "GET",
        "/proxy/users%3F%7B%22page%22%3A%221%22%7D",
    )
    .await;
    assert_eq!(smuggled.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let genuine = send(&app, "GET", "/proxy/users?page=1").await;
    assert_eq!(cache_status(&genuine), "MISS");
    let json = body_to_json(genuine).await;
    assert_eq!(json["call"], 1);
    assert_eq!(json["query"]["page"], "1");
}

// == Admin Endpoint Tests ==

#[tokio::test]
async fn test_entry_and_remove_endpoints() {
    let (app, calls) = create_test_app().await;

    send(&app, "GET", "/proxy/users").await;
    send(&app, "GET", "/proxy/users").await;

    let entry = send(&app, "GET", "/cache/%2Fusers").await;
    assert_eq!(entry.status(), StatusCode::OK);
    let entry_json = body_to_json(entry).await;
    assert_eq!(entry_json["key"], "/users");
    assert_eq!(entry_json["access_count"], 1);

    let removed = send(&app, "DELETE", "/cache/%2Fusers").await;
    assert_eq!(removed.status(), StatusCode::OK);
    assert_eq!(body_to_json(removed).await["removed"], true);

    let again = send(&app, "DELETE", "/cache/%2Fusers").await;
    assert_eq!(again.status(), StatusCode::OK);
    assert_eq!(body_to_json(again).await["removed"], false);

    let refetched = send(&app, "GET", "/proxy/users").await;
    assert_eq!(cache_status(&refetched), "MISS");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_stats_endpoint_tracks_lookups() {
    let (app, _) = create_test_app().await;

    send(&app, "GET", "/proxy/users").await; // miss
    send(&app, "GET", "/proxy/users").await; // hit
    send(&app, "GET", "/proxy/users").await; // hit
    send(&app, "GET", "/proxy/users?page=9").await; // miss

    let stats = body_to_json(send(&app, "GET", "/stats").await).await;
    assert_eq!(stats["size"], 2);
    assert_eq!(stats["total_requests"], 4);
    assert_eq!(stats["cache_hits"], 2);
    assert_eq!(stats["misses"], 2);
    assert_eq!(stats["hit_rate"], 0.5);
}

#[tokio::test]
async fn test_clear_keeps_statistics() {
    let (app, _) = create_test_app().await;

    send(&app, "GET", "/proxy/users").await;
    send(&app, "GET", "/proxy/users").await;

    let cleared = send(&app, "DELETE", "/cache").await;
    assert_eq!(cleared.status(), StatusCode::OK);

    let stats = body_to_json(send(&app, "GET", "/stats").await).await;
    assert_eq!(stats["size"], 0);
    assert_eq!(stats["total_requests"], 2);
    assert_eq!(stats["cache_hits"], 1);

    let reset = body_to_json(send(&app, "DELETE", "/stats").await).await;
    assert_eq!(reset["total_requests"], 0);
    assert_eq!(reset["hit_rate"], 0.0);
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app().await;

    let response = send(&app, "GET", "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}
