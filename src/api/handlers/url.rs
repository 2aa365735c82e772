//! Handlers for url mapping endpoints (shorten, resolve, update, delete).

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::url::{ResolveResponse, ShortenRequest, UpdateUrlRequest, UrlView};
use crate::api::extract::{ApiJson, ApiPath};
use crate::domain::entities::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL owned by the caller.
///
/// # Endpoint
///
/// `POST /api/v1/url`
///
/// # Request Body
///
/// ```json
/// {
///   "longUrl": "https://example.com/some/long/path",
///   "expiresAt": "2030-01-01T00:00:00Z"   // optional
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if the URL is invalid or `expiresAt` is not in the future.
/// Returns 503 Service Unavailable if no unique code could be generated.
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<ShortenRequest>,
) -> Result<(StatusCode, Json<UrlView>), AppError> {
    payload.validate()?;

    let mapping = state
        .url_service
        .shorten(&user, &payload.long_url, payload.expires_at)
        .await?;

    let short_url = state.url_service.short_url(&mapping.short_code);

    Ok((StatusCode::CREATED, Json(UrlView::new(mapping, short_url))))
}

/// Resolves a short code to its long URL and counts the visit.
///
/// # Endpoint
///
/// `POST /api/v1/url/{shortUrlCode}` (public)
///
/// # Errors
///
/// Returns 400 Bad Request if the code is malformed or the mapping has expired.
/// Returns 404 Not Found if the code is unknown.
pub async fn resolve_handler(
    State(state): State<AppState>,
    ApiPath(code): ApiPath<String>,
) -> Result<Json<ResolveResponse>, AppError> {
    let mapping = state.url_service.resolve(&code).await?;

    Ok(Json(ResolveResponse {
        long_url: mapping.long_url,
    }))
}

/// Issues a new short code for one of the caller's mappings.
///
/// # Endpoint
///
/// `PATCH /api/v1/url`
///
/// # Request Body
///
/// ```json
/// {
///   "shortUrlCode": "aB3dE5fG",
///   "expiresAt": "2030-01-01T00:00:00Z"   // optional, keeps current expiry if absent
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or belongs to another user.
/// Returns 400 Bad Request if `expiresAt` is not in the future.
pub async fn update_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<UpdateUrlRequest>,
) -> Result<Json<UrlView>, AppError> {
    payload.validate()?;

    let mapping = state
        .url_service
        .update(&user, &payload.short_url_code, payload.expires_at)
        .await?;

    let short_url = state.url_service.short_url(&mapping.short_code);

    Ok(Json(UrlView::new(mapping, short_url)))
}

/// Permanently deletes one of the caller's mappings.
///
/// # Endpoint
///
/// `DELETE /api/v1/url/{shortUrlCode}`
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or belongs to another user.
pub async fn delete_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(code): ApiPath<String>,
) -> Result<StatusCode, AppError> {
    state.url_service.delete(&user, &code).await?;

    Ok(StatusCode::NO_CONTENT)
}
