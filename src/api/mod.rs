//! API Module
//!
//! HTTP handlers and routing for the caching proxy.
//!
//! # Endpoints
//! - `GET /proxy/*path` - Read-through to the upstream backend
//! - `GET /cache/*key` / `DELETE /cache/*key` - Inspect or remove an entry
//! - `DELETE /cache` - Clear all entries
//! - `GET /stats` / `DELETE /stats` - Read or reset statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
