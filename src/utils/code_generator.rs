//! Short code generation and validation utilities.
//!
//! Codes are drawn uniformly from the 62-character alphanumeric alphabet
//! `[A-Za-z0-9]`. Generation does no I/O and gives no uniqueness guarantee;
//! see [`crate::application::services::CodeResolver`] for that.

use rand::Rng;
use serde_json::json;

use crate::error::AppError;

/// Alphabet used for generated short codes.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Maximum length of any stored short code (column width).
pub const MAX_STORED_CODE_LENGTH: usize = 50;

/// Produces candidate short codes.
#[cfg_attr(test, mockall::automock)]
pub trait CodeGenerator: Send + Sync {
    /// Returns a code of exactly `length` characters.
    fn generate(&self, length: usize) -> String;
}

/// Default generator backed by the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCodeGenerator;

impl RandomCodeGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self, length: usize) -> String {
        let mut rng = rand::rng();

        (0..length)
            .map(|_| {
                let idx = rng.random_range(0..ALPHABET.len());
                ALPHABET[idx] as char
            })
            .collect()
    }
}

/// Length and retry settings for code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSettings {
    /// Length of the first candidates.
    pub length: usize,
    /// Longest length the resolver may widen to.
    pub max_length: usize,
    /// Collisions tolerated at one length before widening.
    pub attempts_per_length: usize,
}

impl Default for CodeSettings {
    fn default() -> Self {
        Self {
            length: 8,
            max_length: 12,
            attempts_per_length: 5,
        }
    }
}

/// Validates the shape of a short code received from a client.
///
/// # Rules
///
/// - Length: 1-50 characters
/// - Allowed characters: ASCII letters and digits
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_short_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() || code.len() > MAX_STORED_CODE_LENGTH {
        return Err(AppError::bad_request(
            format!("Short URL code must be 1-{MAX_STORED_CODE_LENGTH} characters"),
            json!({ "providedLength": code.len() }),
        ));
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::bad_request(
            "Short URL code can only contain letters and digits",
            json!({ "shortUrlCode": code }),
        ));
    }

    Ok(())
}
