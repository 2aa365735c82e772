//! Expiration rules for url mappings.
//!
//! A mapping without `expires_at` never expires. Otherwise it is active only
//! while `expires_at` is strictly after the reference time, so a mapping
//! whose expiry equals "now" is already expired.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::entities::UrlMapping;
use crate::error::AppError;

/// Rejects an expiry that is not strictly in the future.
///
/// `None` ("never expires") always passes.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if `expires_at` is at or before `now`.
pub fn validate_future_or_null(
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    match expires_at {
        Some(t) if t <= now => Err(AppError::bad_request(
            "Expiration date must be in the future",
            json!({ "expiresAt": t }),
        )),
        _ => Ok(()),
    }
}

/// Returns true if the mapping can still be resolved at `now`.
pub fn is_active(mapping: &UrlMapping, now: DateTime<Utc>) -> bool {
    mapping.expires_at.is_none_or(|t| t > now)
}

/// Error returned when resolving a mapping past its expiry.
///
/// Kept separate from "not found" so clients can tell the two apart.
pub fn expired_error(mapping: &UrlMapping) -> AppError {
    AppError::bad_request(
        "Short URL has expired",
        json!({
            "shortUrlCode": mapping.short_code,
            "expiredAt": mapping.expires_at,
        }),
    )
}
