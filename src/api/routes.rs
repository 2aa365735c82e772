//! API route configuration.
//!
//! Public routes are open; protected routes require Bearer token
//! authentication via [`crate::api::middleware::auth`].

use crate::api::handlers::{
    active_urls_handler, all_urls_handler, delete_handler, login_handler, logout_handler,
    register_handler, resolve_handler, shorten_handler, update_handler, visits_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Registration and login.
///
/// # Endpoints
///
/// - `POST /auth/register` - Create an account
/// - `POST /auth/login`    - Exchange credentials for a bearer token
pub fn credential_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
}

/// Routes anyone may call.
///
/// # Endpoints
///
/// - `POST /url/{code}` - Resolve a short code (counts a visit)
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/url/{code}", post(resolve_handler))
}

/// Routes acting on behalf of the authenticated user.
///
/// # Endpoints
///
/// - `POST   /url`               - Create a short URL
/// - `PATCH  /url`               - Issue a new code (and optionally expiry)
/// - `DELETE /url/{code}`        - Delete a short URL
/// - `GET    /url/all`           - All own URLs with visit total
/// - `GET    /url/active`        - Own non-expired URLs with visit total
/// - `GET    /url/visits/{code}` - Visit count of one own URL
/// - `POST   /auth/logout`       - Revoke the presented token
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/url", post(shorten_handler).patch(update_handler))
        .route("/url/{code}", delete(delete_handler))
        .route("/url/all", get(all_urls_handler))
        .route("/url/active", get(active_urls_handler))
        .route("/url/visits/{code}", get(visits_handler))
        .route("/auth/logout", post(logout_handler))
}
