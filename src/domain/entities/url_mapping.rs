//! Url mapping entity: the persisted link between a short code and a long URL.

use chrono::{DateTime, Utc};

/// A stored short code → long URL mapping with its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub id: i64,
    pub short_code: String,
    pub long_url: String,
    pub visits: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub owner_id: i64,
}

impl UrlMapping {
    /// Creates a new UrlMapping instance.
    pub fn new(
        id: i64,
        short_code: String,
        long_url: String,
        visits: i64,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        owner_id: i64,
    ) -> Self {
        Self {
            id,
            short_code,
            long_url,
            visits,
            created_at,
            expires_at,
            owner_id,
        }
    }
}

/// Input data for creating a new mapping.
///
/// `visits` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUrlMapping {
    pub short_code: String,
    pub long_url: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub owner_id: i64,
}

/// Changes applied by the update operation.
///
/// The short code is always replaced. `expires_at: None` keeps the current
/// expiry, `Some(t)` replaces it.
#[derive(Debug, Clone)]
pub struct UrlMappingPatch {
    pub short_code: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_mapping_creation() {
        let now = Utc::now();
        let mapping = UrlMapping::new(
            1,
            "abc12345".to_string(),
            "https://example.com".to_string(),
            0,
            now,
            None,
            7,
        );

        assert_eq!(mapping.id, 1);
        assert_eq!(mapping.short_code, "abc12345");
        assert_eq!(mapping.long_url, "https://example.com");
        assert_eq!(mapping.visits, 0);
        assert_eq!(mapping.created_at, now);
        assert!(mapping.expires_at.is_none());
        assert_eq!(mapping.owner_id, 7);
    }
}
