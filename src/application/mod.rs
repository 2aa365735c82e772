//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::url_service::UrlService`] - Shortening, resolution, update and deletion
//! - [`services::code_resolver::CodeResolver`] - Collision-free short code selection
//! - [`services::stats_service::StatsService`] - Per-user statistics
//! - [`services::auth_service::AuthService`] - Registration, login and token authentication

pub mod services;
