//! Ownership check for url mappings.

use serde_json::json;

use crate::domain::entities::{AuthUser, UrlMapping};
use crate::error::AppError;

/// Message shared by "missing" and "owned by someone else".
pub const URL_NOT_FOUND_MESSAGE: &str = "Short URL not found";

/// Fails unless `user` owns `mapping`.
///
/// A mismatch is reported as [`AppError::NotFound`], the same error a missing
/// code produces, so callers cannot probe for other users' codes.
pub fn assert_owned_by(mapping: &UrlMapping, user: &AuthUser) -> Result<(), AppError> {
    if mapping.owner_id != user.id {
        tracing::debug!(
            short_code = %mapping.short_code,
            user_id = user.id,
            "Ownership check failed"
        );
        return Err(not_found(&mapping.short_code));
    }

    Ok(())
}

/// Not-found error for a short code.
pub fn not_found(short_code: &str) -> AppError {
    AppError::not_found(URL_NOT_FOUND_MESSAGE, json!({ "shortUrlCode": short_code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn mapping_owned_by(owner_id: i64) -> UrlMapping {
        UrlMapping::new(
            1,
            "abc12345".to_string(),
            "https://example.com".to_string(),
            0,
            Utc::now(),
            None,
            owner_id,
        )
    }

    #[test]
    fn test_owner_passes() {
        let user = AuthUser {
            id: 1,
            login: "alice".to_string(),
        };
        assert!(assert_owned_by(&mapping_owned_by(1), &user).is_ok());
    }

    #[test]
    fn test_other_user_gets_not_found() {
        let user = AuthUser {
            id: 2,
            login: "bob".to_string(),
        };
        let err = assert_owned_by(&mapping_owned_by(1), &user).unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.to_string(), URL_NOT_FOUND_MESSAGE);
    }
}
