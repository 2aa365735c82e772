//! Repository trait for url mapping data access.

use crate::domain::entities::{NewUrlMapping, UrlMapping, UrlMappingPatch};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Repository interface for url mappings.
///
/// Short code uniqueness is enforced by the store itself: [`try_create`] and
/// [`try_update`] perform the existence check and the write as one atomic
/// step and report a taken code as `Ok(None)` so callers can pick another.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::InMemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
///
/// [`try_create`]: UrlRepository::try_create
/// [`try_update`]: UrlRepository::try_update
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new mapping.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UrlMapping))` with store-assigned `id`, `visits = 0` and `created_at`
    /// - `Ok(None)` if the short code is already taken
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn try_create(&self, new_mapping: NewUrlMapping) -> Result<Option<UrlMapping>, AppError>;

    /// Checks whether any stored mapping uses `short_code`.
    async fn exists_by_code(&self, short_code: &str) -> Result<bool, AppError>;

    /// Finds a mapping by its short code.
    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError>;

    /// Lists all mappings owned by a user, newest first.
    async fn find_all_by_owner(&self, owner_id: i64) -> Result<Vec<UrlMapping>, AppError>;

    /// Atomically increments the visit counter of a mapping.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UrlMapping))` with the incremented counter
    /// - `Ok(None)` if the mapping no longer exists
    async fn increment_visits(&self, id: i64) -> Result<Option<UrlMapping>, AppError>;

    /// Replaces the short code (and optionally the expiry) of a mapping.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UrlMapping))` after the update
    /// - `Ok(None)` if the new short code is already taken
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the mapping no longer exists.
    async fn try_update(
        &self,
        id: i64,
        patch: UrlMappingPatch,
    ) -> Result<Option<UrlMapping>, AppError>;

    /// Deletes a mapping. Returns `Ok(false)` if it was already gone.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Deletes every mapping whose expiry is at or before `now`.
    ///
    /// Returns the number of deleted mappings.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError>;

    /// Counts stored mappings.
    async fn count(&self) -> Result<i64, AppError>;
}
