//! DTOs for registration and login.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

/// Allowed login characters.
static LOGIN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap());

/// Request body for `POST /api/v1/auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Login must be 3-50 characters"))]
    #[validate(regex(
        path = "*LOGIN_REGEX",
        message = "Login can only contain letters, digits, '.', '_' and '-'"
    ))]
    pub login: String,

    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,

    #[validate(length(min = 8, max = 100, message = "Password must be 8-100 characters"))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
}

/// Requires at least one letter and one digit.
fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_letter && has_digit {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength").with_message(Cow::Borrowed(
            "Password must contain at least one letter and one digit",
        )))
    }
}

/// Response of a successful registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /api/v1/auth/login`.
///
/// `identifier` is either a login or an e-mail address.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255, message = "Identifier is required"))]
    pub identifier: String,

    #[validate(length(min = 1, max = 100, message = "Password is required"))]
    pub password: String,
}

/// Response of a successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
}
