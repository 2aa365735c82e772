//! Long URL validation.
//!
//! Long URLs are stored as submitted (after trimming surrounding whitespace);
//! this module only decides whether they are acceptable.

use url::Url;

/// Maximum stored length of a long URL.
pub const MAX_LONG_URL_LENGTH: usize = 2000;

/// Reasons a long URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LongUrlError {
    #[error("Long URL must not be empty")]
    Empty,

    #[error("Long URL must be at most {MAX_LONG_URL_LENGTH} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must contain a host")]
    MissingHost,
}

/// Validates a long URL and returns the value to store.
///
/// # Rules
///
/// 1. Not blank, at most [`MAX_LONG_URL_LENGTH`] characters
/// 2. Parses as an absolute URL
/// 3. Scheme is `http` or `https` (rejects `javascript:`, `data:`, `file:`, ...)
/// 4. Has a non-empty host
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_long_url(" https://example.com ").unwrap(), "https://example.com");
/// assert!(validate_long_url("ftp://example.com").is_err());
/// ```
pub fn validate_long_url(input: &str) -> Result<String, LongUrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(LongUrlError::Empty);
    }

    if trimmed.chars().count() > MAX_LONG_URL_LENGTH {
        return Err(LongUrlError::TooLong);
    }

    let url = Url::parse(trimmed).map_err(|e| LongUrlError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(LongUrlError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(LongUrlError::MissingHost);
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https() {
        assert_eq!(
            validate_long_url("https://example.com").unwrap(),
            "https://example.com"
        );
    }

    #[test]
    fn test_accepts_http_with_path_and_query() {
        let url = "http://example.com/path/to/page?q=rust&lang=en#top";
        assert_eq!(validate_long_url(url).unwrap(), url);
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            validate_long_url("  https://example.com/a  ").unwrap(),
            "https://example.com/a"
        );
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_long_url("   "), Err(LongUrlError::Empty));
    }

    #[test]
    fn test_rejects_too_long() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_LONG_URL_LENGTH));
        assert_eq!(validate_long_url(&url), Err(LongUrlError::TooLong));
    }

    #[test]
    fn test_accepts_exact_max_length() {
        let prefix = "https://example.com/";
        let url = format!("{}{}", prefix, "a".repeat(MAX_LONG_URL_LENGTH - prefix.len()));
        assert!(validate_long_url(&url).is_ok());
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!(
            validate_long_url("not-a-url"),
            Err(LongUrlError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_other_schemes() {
        for url in [
            "ftp://example.com/file",
            "javascript:alert(1)",
            "data:text/plain,hello",
            "file:///etc/passwd",
        ] {
            assert_eq!(
                validate_long_url(url),
                Err(LongUrlError::UnsupportedProtocol),
                "{url} should be rejected"
            );
        }
    }
}
