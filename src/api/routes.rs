//! API Routes
//!
//! Configures the Axum router with the proxy and admin endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, entry_handler, health_handler, proxy_handler, remove_handler,
    reset_stats_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /proxy/*path` - Read-through to the upstream backend
/// - `GET /cache/*key` - Inspect a cached entry
/// - `DELETE /cache/*key` - Remove a cached entry
/// - `DELETE /cache` - Clear all entries
/// - `GET /stats` - Get cache statistics
/// - `DELETE /stats` - Reset cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/proxy/*path", get(proxy_handler))
        .route("/cache", delete(clear_handler))
        .route("/cache/*key", get(entry_handler).delete(remove_handler))
        .route("/stats", get(stats_handler).delete(reset_stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
