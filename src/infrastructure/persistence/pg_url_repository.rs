//! PostgreSQL implementation of url repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewUrlMapping, UrlMapping, UrlMappingPatch};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_code;
use serde_json::json;

/// Column list shared by every query returning a mapping.
const URL_COLUMNS: &str =
    "id, short_code, long_url, visits, created_at, expires_at, user_id AS owner_id";

#[derive(Debug, FromRow)]
struct UrlRow {
    id: i64,
    short_code: String,
    long_url: String,
    visits: i64,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    owner_id: i64,
}

impl From<UrlRow> for UrlMapping {
    fn from(row: UrlRow) -> Self {
        UrlMapping::new(
            row.id,
            row.short_code,
            row.long_url,
            row.visits,
            row.created_at,
            row.expires_at,
            row.owner_id,
        )
    }
}

/// PostgreSQL repository for url mappings.
///
/// Uniqueness of `short_code` is enforced by the `urls_short_code_key`
/// constraint; visit counts are incremented in SQL.
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn try_create(&self, new_mapping: NewUrlMapping) -> Result<Option<UrlMapping>, AppError> {
        let query = format!(
            r#"
            INSERT INTO urls (short_code, long_url, expires_at, user_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT ON CONSTRAINT urls_short_code_key DO NOTHING
            RETURNING {URL_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UrlRow>(&query)
            .bind(&new_mapping.short_code)
            .bind(&new_mapping.long_url)
            .bind(new_mapping.expires_at)
            .bind(new_mapping.owner_id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(UrlMapping::from))
    }

    async fn exists_by_code(&self, short_code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM urls WHERE short_code = $1)")
                .bind(short_code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        let query = format!("SELECT {URL_COLUMNS} FROM urls WHERE short_code = $1");

        let row = sqlx::query_as::<_, UrlRow>(&query)
            .bind(short_code)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(UrlMapping::from))
    }

    async fn find_all_by_owner(&self, owner_id: i64) -> Result<Vec<UrlMapping>, AppError> {
        let query = format!(
            "SELECT {URL_COLUMNS} FROM urls WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
        );

        let rows = sqlx::query_as::<_, UrlRow>(&query)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(UrlMapping::from).collect())
    }

    async fn increment_visits(&self, id: i64) -> Result<Option<UrlMapping>, AppError> {
        let query = format!(
            "UPDATE urls SET visits = visits + 1 WHERE id = $1 RETURNING {URL_COLUMNS}"
        );

        let row = sqlx::query_as::<_, UrlRow>(&query)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(UrlMapping::from))
    }

    async fn try_update(
        &self,
        id: i64,
        patch: UrlMappingPatch,
    ) -> Result<Option<UrlMapping>, AppError> {
        let query = format!(
            r#"
            UPDATE urls
            SET short_code = $2,
                expires_at = COALESCE($3, expires_at)
            WHERE id = $1
            RETURNING {URL_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, UrlRow>(&query)
            .bind(id)
            .bind(&patch.short_code)
            .bind(patch.expires_at)
            .fetch_optional(self.pool.as_ref())
            .await;

        match result {
            Ok(Some(row)) => Ok(Some(row.into())),
            Ok(None) => Err(AppError::not_found(
                "Short URL not found",
                json!({ "id": id }),
            )),
            Err(e) if is_unique_violation_on_code(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM urls WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM urls WHERE expires_at IS NOT NULL AND expires_at <= $1")
            .bind(now)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }
}
