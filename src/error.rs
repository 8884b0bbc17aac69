//! Error types for the request cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the cache and its HTTP host.
///
/// Fetch failures inside [`crate::request::RequestCache::cached_request`] keep
/// the caller's own error type; this enum only covers what the crate itself
/// can fail at.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Rejected construction parameters (zero capacity, zero TTL, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Key not found in cache
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Upstream fetch failed or answered with an error status
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Upstream(_) => StatusCode::BAD_GATEWAY,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the request cache.
pub type Result<T> = std::result::Result<T, CacheError>;
