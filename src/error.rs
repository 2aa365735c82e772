//! Application error type and its HTTP representation.
//!
//! Every fallible operation in the service and repository layers returns
//! [`AppError`]. Handlers propagate it with `?` and axum renders it through
//! [`IntoResponse`] as:
//!
//! ```json
//! {
//!   "status": 404,
//!   "error": "Not Found",
//!   "path": "/api/v1/url/visits/abc123",
//!   "message": "Short URL not found"
//! }
//! ```
//!
//! The `path` field is filled in by [`crate::api::middleware::error_path`],
//! since the error itself does not know which request produced it.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Serialized error body returned to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub details: Value,
}

/// Unified error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("{message}")]
    MethodNotAllowed { message: String, details: Value },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// A bounded internal retry loop ran out of attempts.
    #[error("{message}")]
    Exhausted { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn method_not_allowed(message: impl Into<String>, details: Value) -> Self {
        Self::MethodNotAllowed {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn exhausted(message: impl Into<String>, details: Value) -> Self {
        Self::Exhausted {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Exhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Builds the response body without a request path.
    pub fn to_body(&self) -> ErrorBody {
        let status = self.status_code();
        let details = match self {
            AppError::Validation { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::Unauthorized { details, .. }
            | AppError::MethodNotAllowed { details, .. }
            | AppError::Conflict { details, .. }
            | AppError::Exhausted { details, .. }
            | AppError::Internal { details, .. } => details.clone(),
        };

        ErrorBody {
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            path: String::new(),
            message: self.to_string(),
            details: strip_empty(details),
        }
    }
}

/// Empty `{}` details are not worth sending.
fn strip_empty(details: Value) -> Value {
    match details {
        Value::Object(ref map) if map.is_empty() => Value::Null,
        other => other,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, ?status, "Request failed");
        }

        let body = self.to_body();
        let mut response = (status, Json(body.clone())).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response.extensions_mut().insert(body);
        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": db.constraint() }),
            );
        }

        if matches!(e, sqlx::Error::RowNotFound) {
            return AppError::not_found("Record not found", json!({}));
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = first_validation_message(&errors)
            .unwrap_or_else(|| "Request validation failed".to_string());

        AppError::bad_request(message, json!({ "fields": errors }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "Malformed request body",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        let details = json!({ "reason": rejection.body_text() });

        if rejection.status().is_client_error() {
            AppError::bad_request("Invalid path parameter", details)
        } else {
            tracing::error!(reason = %rejection.body_text(), "Path extraction failed");
            AppError::internal("Path extraction failed", details)
        }
    }
}

/// Picks the first field message so the top-level `message` stays readable.
fn first_validation_message(errors: &validator::ValidationErrors) -> Option<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields.into_iter().find_map(|(field, errs)| {
        errs.first().map(|e| match &e.message {
            Some(msg) => msg.to_string(),
            None => format!("Invalid value for field '{}'", field),
        })
    })
}
