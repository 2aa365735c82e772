//! Placeholder for the next API version.

use axum::Json;
use serde_json::{Value, json};

/// Answers every `/api/v2/*` request.
pub async fn v2_handler() -> Json<Value> {
    Json(json!({ "message": "Version 2 is under development." }))
}
