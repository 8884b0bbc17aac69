//! Request Module
//!
//! Read-through caching for idempotent requests.

mod facade;

pub use facade::RequestCache;
