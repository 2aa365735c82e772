//! Access token issued at login.

use chrono::{DateTime, Utc};

/// A stored bearer token. Only the HMAC of the raw value is kept.
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Returns true if the token can still authenticate requests at `now`.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}

/// Input data for storing a freshly issued token.
#[derive(Debug, Clone)]
pub struct NewAccessToken {
    pub user_id: i64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
