//! PostgreSQL implementation of user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use serde_json::json;

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    login: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            login: row.login,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL repository for user accounts.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, AppError> {
        let query = format!(
            "SELECT id, login, email, password_hash, created_at FROM users WHERE {column} = $1"
        );

        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(value)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(User::from))
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (login, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, login, email, password_hash, created_at
            "#,
        )
        .bind(&new_user.login)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            let constraint = e
                .as_database_error()
                .filter(|db| db.is_unique_violation())
                .and_then(|db| db.constraint().map(str::to_string));

            match constraint.as_deref() {
                Some("users_login_key") => {
                    AppError::conflict("Login is already taken", json!({ "field": "login" }))
                }
                Some("users_email_key") => {
                    AppError::conflict("Email is already registered", json!({ "field": "email" }))
                }
                _ => AppError::from(e),
            }
        })?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, login, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(User::from))
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError> {
        self.find_one("login", login).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.find_one("email", email).await
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, login, email, password_hash, created_at FROM users ORDER BY id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
