//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{code}`   - Short link redirect (public)
//! - `GET  /health`   - Store health check (public)
//! - `/api/v1/*`      - REST API (see [`crate::api::routes`])
//! - `/api/v2/*`      - Placeholder for the next API version
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Error path** - Request path in error bodies
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments)
//! - **Authentication** - Bearer token on protected routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{
    fallback_handler, health_handler, method_not_allowed_handler, redirect_handler, v2_handler,
};
use crate::api::middleware::rate_limit::{self, RateLimitSettings};
use crate::api::middleware::{auth, error_path, tracing};
use crate::state::AppState;
use axum::routing::{any, get};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `rate_limit` - whether to rate limit and how to find the client IP
pub fn app_router(state: AppState, rate_limit: RateLimitSettings) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(api_router(state, rate_limit))
}

/// Same as [`app_router`] without trailing slash normalization.
///
/// Path normalization has to wrap the router from the outside, so the
/// result of this function is what integration tests serve directly.
pub fn api_router(state: AppState, rate_limit: RateLimitSettings) -> Router {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let v1 = Router::new()
        .merge(rate_limit::secure(api::routes::credential_routes(), rate_limit))
        .merge(rate_limit::public(api::routes::public_routes(), rate_limit))
        .merge(rate_limit::public(protected, rate_limit));

    let redirect = rate_limit::public(
        Router::new().route("/{code}", get(redirect_handler)),
        rate_limit,
    );

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v2", any(v2_handler))
        .route("/api/v2/{*rest}", any(v2_handler))
        .nest("/api/v1", v1)
        .merge(redirect)
        .method_not_allowed_fallback(method_not_allowed_handler)
        .fallback(fallback_handler)
        .with_state(state)
        .layer(middleware::from_fn(error_path::layer))
        .layer(tracing::layer())
}
