//! DTOs for url mapping endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::UrlMapping;

/// Request body for `POST /api/v1/url`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// The original URL to shorten (must be valid HTTP/HTTPS).
    #[validate(length(min = 1, max = 2000, message = "Long URL must be 1-2000 characters"))]
    pub long_url: String,

    /// Optional expiry timestamp; must be in the future. Absent or null means
    /// the mapping never expires.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request body for `PATCH /api/v1/url`.
///
/// The mapping always receives a fresh short code. `expiresAt` replaces the
/// current expiry only when present.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUrlRequest {
    #[validate(length(min = 1, max = 50, message = "Short URL code must be 1-50 characters"))]
    pub short_url_code: String,

    pub expires_at: Option<DateTime<Utc>>,
}

/// JSON representation of a mapping.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlView {
    pub id: i64,
    pub short_url_code: String,
    pub short_url: String,
    pub long_url: String,
    pub visits: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl UrlView {
    pub fn new(mapping: UrlMapping, short_url: String) -> Self {
        Self {
            id: mapping.id,
            short_url_code: mapping.short_code,
            short_url,
            long_url: mapping.long_url,
            visits: mapping.visits,
            created_at: mapping.created_at,
            expires_at: mapping.expires_at,
        }
    }
}

/// Response of `POST /api/v1/url/{shortUrlCode}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub long_url: String,
}
