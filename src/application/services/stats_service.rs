//! Per-user url statistics.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::{AuthUser, UrlMapping};
use crate::domain::expiry::is_active;
use crate::domain::ownership::{assert_owned_by, not_found};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// A mapping together with its activity at the time of the read.
#[derive(Debug, Clone)]
pub struct UrlStats {
    pub mapping: UrlMapping,
    pub active: bool,
}

/// A list of mappings and the sum of their visits.
#[derive(Debug, Clone)]
pub struct StatsSummary {
    pub total_visits: i64,
    pub urls: Vec<UrlStats>,
}

impl StatsSummary {
    fn from_urls(urls: Vec<UrlStats>) -> Self {
        let total_visits = urls.iter().map(|u| u.mapping.visits).sum();
        Self { total_visits, urls }
    }
}

/// Service for reading statistics about the caller's own mappings.
///
/// Reads never count as visits.
pub struct StatsService {
    repository: Arc<dyn UrlRepository>,
}

impl StatsService {
    pub fn new(repository: Arc<dyn UrlRepository>) -> Self {
        Self { repository }
    }

    /// Every mapping owned by `user`, newest first, each flagged active or not.
    pub async fn all_urls(
        &self,
        user: &AuthUser,
        now: DateTime<Utc>,
    ) -> Result<StatsSummary, AppError> {
        let urls = self
            .owned_with_activity(user, now)
            .await?
            .collect::<Vec<_>>();

        Ok(StatsSummary::from_urls(urls))
    }

    /// Only the mappings of `user` that are still active at `now`.
    pub async fn active_urls(
        &self,
        user: &AuthUser,
        now: DateTime<Utc>,
    ) -> Result<StatsSummary, AppError> {
        let urls = self
            .owned_with_activity(user, now)
            .await?
            .filter(|u| u.active)
            .collect::<Vec<_>>();

        Ok(StatsSummary::from_urls(urls))
    }

    /// Visit count of one owned mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or owned by
    /// another user.
    pub async fn visits(&self, user: &AuthUser, short_code: &str) -> Result<i64, AppError> {
        let mapping = self
            .repository
            .find_by_code(short_code)
            .await?
            .ok_or_else(|| not_found(short_code))?;

        assert_owned_by(&mapping, user)?;

        Ok(mapping.visits)
    }

    /// Total number of stored mappings across all users.
    pub async fn total_urls(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    async fn owned_with_activity(
        &self,
        user: &AuthUser,
        now: DateTime<Utc>,
    ) -> Result<impl Iterator<Item = UrlStats>, AppError> {
        let mappings = self.repository.find_all_by_owner(user.id).await?;

        Ok(mappings.into_iter().map(move |mapping| UrlStats {
            active: is_active(&mapping, now),
            mapping,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlRepository;
    use chrono::Duration;

    fn user() -> AuthUser {
        AuthUser {
            id: 7,
            login: "carol".to_string(),
        }
    }

    fn mapping(id: i64, visits: i64, expires_at: Option<DateTime<Utc>>) -> UrlMapping {
        UrlMapping::new(
            id,
            format!("code{id:04}"),
            "https://example.com".to_string(),
            visits,
            Utc::now(),
            expires_at,
            7,
        )
    }

    fn repo_with_three(now: DateTime<Utc>) -> MockUrlRepository {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_all_by_owner()
            .withf(|owner| *owner == 7)
            .returning(move |_| {
                Ok(vec![
                    mapping(3, 5, None),
                    mapping(2, 7, Some(now - Duration::hours(1))),
                    mapping(1, 1, Some(now + Duration::hours(1))),
                ])
            });
        repo
    }

    #[tokio::test]
    async fn test_all_urls_flags_expired_and_sums_visits() {
        let now = Utc::now();
        let service = StatsService::new(Arc::new(repo_with_three(now)));

        let summary = service.all_urls(&user(), now).await.unwrap();

        assert_eq!(summary.urls.len(), 3);
        assert_eq!(summary.total_visits, 13);
        let flags: Vec<bool> = summary.urls.iter().map(|u| u.active).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[tokio::test]
    async fn test_active_urls_skips_expired() {
        let now = Utc::now();
        let service = StatsService::new(Arc::new(repo_with_three(now)));

        let summary = service.active_urls(&user(), now).await.unwrap();

        assert_eq!(summary.urls.len(), 2);
        assert_eq!(summary.total_visits, 6);
        assert!(summary.urls.iter().all(|u| u.active));
    }

    #[tokio::test]
    async fn test_empty_summary() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_all_by_owner().returning(|_| Ok(vec![]));
        let service = StatsService::new(Arc::new(repo));

        let summary = service.all_urls(&user(), Utc::now()).await.unwrap();

        assert!(summary.urls.is_empty());
        assert_eq!(summary.total_visits, 0);
    }

    #[tokio::test]
    async fn test_visits_of_owned_mapping() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "code0001")
            .returning(|_| Ok(Some(mapping(1, 42, None))));
        repo.expect_increment_visits().times(0);

        let service = StatsService::new(Arc::new(repo));

        assert_eq!(service.visits(&user(), "code0001").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_visits_of_foreign_mapping_is_not_found() {
        let mut repo = MockUrlRepository::new();
        repo.expect_find_by_code()
            .returning(|_| Ok(Some(mapping(1, 42, None))));

        let service = StatsService::new(Arc::new(repo));
        let stranger = AuthUser {
            id: 8,
            login: "dave".to_string(),
        };

        let err = service.visits(&stranger, "code0001").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
