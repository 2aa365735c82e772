//! Handler for short URL redirect.

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;
use url::Url;

use crate::api::extract::ApiPath;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// Counts a visit exactly like `POST /api/v1/url/{code}` and answers with
/// `307 Temporary Redirect`, so every visit passes through the service.
///
/// # Errors
///
/// Returns 400 Bad Request if the code is malformed or the mapping has expired.
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn redirect_handler(
    ApiPath(code): ApiPath<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let mapping = state.url_service.resolve(&code).await?;

    // Stored URLs may hold non-ASCII characters; the parsed form is percent-encoded.
    let location = Url::parse(&mapping.long_url)
        .map(String::from)
        .unwrap_or(mapping.long_url);

    let location = HeaderValue::from_str(&location).map_err(|_| {
        AppError::internal(
            "Stored URL cannot be used as a redirect target",
            json!({ "shortUrlCode": code }),
        )
    })?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]))
}
