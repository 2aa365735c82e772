//! Repository trait for login access tokens.

use crate::domain::entities::{AccessToken, NewAccessToken};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for bearer tokens issued at login.
///
/// Tokens are stored as HMAC-SHA256 hashes; raw values never reach the store.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Stores a newly issued token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if a token with the same hash already exists.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create_token(&self, new_token: NewAccessToken) -> Result<AccessToken, AppError>;

    /// Finds a token by its hash, regardless of expiry or revocation.
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<AccessToken>, AppError>;

    /// Updates the last-used timestamp of a token.
    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError>;

    /// Revokes a single token. Returns `Ok(false)` if it was unknown or already revoked.
    async fn revoke(&self, token_hash: &str) -> Result<bool, AppError>;

    /// Revokes every active token of a user. Returns the number revoked.
    async fn revoke_all_for_user(&self, user_id: i64) -> Result<u64, AppError>;
}
