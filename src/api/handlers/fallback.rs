//! Handlers for unmatched routes and methods.

use serde_json::json;

use crate::error::AppError;

/// Renders unknown paths with the standard error body.
pub async fn fallback_handler() -> AppError {
    AppError::not_found("Resource not found", json!({}))
}

/// Renders a known path hit with an unsupported method.
pub async fn method_not_allowed_handler() -> AppError {
    AppError::method_not_allowed("Method not allowed", json!({}))
}
