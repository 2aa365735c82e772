//! Url mapping lifecycle: shorten, resolve, update, delete.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::application::services::CodeResolver;
use crate::domain::entities::{AuthUser, NewUrlMapping, UrlMapping, UrlMappingPatch};
use crate::domain::expiry::{expired_error, is_active, validate_future_or_null};
use crate::domain::ownership::{assert_owned_by, not_found};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::validate_short_code;
use crate::utils::url_validator::validate_long_url;

/// How many times a write is retried when another request claims the
/// resolved code between the existence check and the write.
const MAX_STORE_RACE_RETRIES: usize = 3;

/// Service for creating, resolving and managing url mappings.
///
/// Every operation that acts on behalf of a user takes the [`AuthUser`]
/// explicitly. Mappings owned by someone else are indistinguishable from
/// missing ones.
pub struct UrlService {
    repository: Arc<dyn UrlRepository>,
    resolver: CodeResolver,
    base_url: String,
}

impl UrlService {
    /// Creates a new url service.
    ///
    /// `base_url` is the public origin short URLs are built from, e.g.
    /// `https://s.example.com`.
    pub fn new(repository: Arc<dyn UrlRepository>, resolver: CodeResolver, base_url: String) -> Self {
        Self {
            repository,
            resolver,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Creates a mapping for `long_url` owned by `user`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is invalid or `expires_at`
    /// is not in the future.
    /// Returns [`AppError::Exhausted`] if no unique code could be found.
    #[instrument(skip(self, long_url), fields(user_id = user.id))]
    pub async fn shorten(
        &self,
        user: &AuthUser,
        long_url: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<UrlMapping, AppError> {
        let long_url = validate_long_url(long_url).map_err(|e| {
            AppError::bad_request(e.to_string(), json!({ "field": "longUrl" }))
        })?;

        validate_future_or_null(expires_at, Utc::now())?;

        for _ in 0..MAX_STORE_RACE_RETRIES {
            let short_code = self.resolver.resolve_unique_code().await?;

            let new_mapping = NewUrlMapping {
                short_code,
                long_url: long_url.clone(),
                expires_at,
                owner_id: user.id,
            };

            match self.repository.try_create(new_mapping).await? {
                Some(mapping) => {
                    info!(short_code = %mapping.short_code, "Short URL created");
                    metrics::counter!("urls_shortened_total").increment(1);
                    return Ok(mapping);
                }
                None => warn!("Short code claimed concurrently, retrying"),
            }
        }

        Err(store_race_error())
    }

    /// Resolves a short code to its mapping and counts the visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the code is malformed or the
    /// mapping has expired.
    /// Returns [`AppError::NotFound`] if no mapping uses the code.
    pub async fn resolve(&self, short_code: &str) -> Result<UrlMapping, AppError> {
        validate_short_code(short_code)?;

        let mapping = self
            .repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| not_found(short_code))?;

        if !is_active(&mapping, Utc::now()) {
            return Err(expired_error(&mapping));
        }

        let visited = self.record_visit(&mapping).await?;
        metrics::counter!("urls_resolved_total").increment(1);

        Ok(visited)
    }

    /// Increments the visit counter of `mapping` by one.
    ///
    /// The increment happens inside the store, so concurrent visits are never
    /// lost.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the mapping was deleted meanwhile.
    pub async fn record_visit(&self, mapping: &UrlMapping) -> Result<UrlMapping, AppError> {
        self.repository
            .increment_visits(mapping.id)
            .await?
            .ok_or_else(|| not_found(&mapping.short_code))
    }

    /// Issues a fresh short code for an owned mapping and optionally replaces
    /// its expiry.
    ///
    /// `expires_at: None` keeps the current expiry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or owned by
    /// another user.
    /// Returns [`AppError::Validation`] if `expires_at` is not in the future.
    #[instrument(skip(self), fields(user_id = user.id))]
    pub async fn update(
        &self,
        user: &AuthUser,
        short_code: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<UrlMapping, AppError> {
        let mapping = self.find_owned(user, short_code).await?;

        validate_future_or_null(expires_at, Utc::now())?;

        for _ in 0..MAX_STORE_RACE_RETRIES {
            let new_code = self.resolver.resolve_unique_code().await?;

            let patch = UrlMappingPatch {
                short_code: new_code,
                expires_at,
            };

            if let Some(updated) = self.repository.try_update(mapping.id, patch).await? {
                info!(
                    old_code = %mapping.short_code,
                    new_code = %updated.short_code,
                    "Short URL updated"
                );
                return Ok(updated);
            }

            warn!("Short code claimed concurrently, retrying");
        }

        Err(store_race_error())
    }

    /// Deletes an owned mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown, owned by another
    /// user, or was deleted concurrently.
    #[instrument(skip(self), fields(user_id = user.id))]
    pub async fn delete(&self, user: &AuthUser, short_code: &str) -> Result<(), AppError> {
        let mapping = self.find_owned(user, short_code).await?;

        if !self.repository.delete(mapping.id).await? {
            return Err(not_found(short_code));
        }

        info!("Short URL deleted");
        Ok(())
    }

    /// Looks up a mapping and checks that `user` owns it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown and foreign codes alike.
    pub async fn find_owned(
        &self,
        user: &AuthUser,
        short_code: &str,
    ) -> Result<UrlMapping, AppError> {
        let mapping = self
            .repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| not_found(short_code))?;

        assert_owned_by(&mapping, user)?;

        Ok(mapping)
    }

    /// Removes all mappings that have expired by now.
    pub async fn purge_expired(&self) -> Result<u64, AppError> {
        let purged = self.repository.delete_expired(Utc::now()).await?;
        info!(purged, "Expired short URLs purged");
        Ok(purged)
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, short_code: &str) -> String {
        format!("{}/{}", self.base_url, short_code)
    }
}

fn store_race_error() -> AppError {
    AppError::exhausted(
        "Failed to store short URL",
        json!({ "reason": "Short code repeatedly claimed by concurrent requests" }),
    )
}
