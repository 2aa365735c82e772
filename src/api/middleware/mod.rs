//! HTTP middleware for request processing and protection.
//!
//! Provides authentication, rate limiting, error rendering, and observability middleware.

pub mod auth;
pub mod error_path;
pub mod rate_limit;
pub mod tracing;
