//! User account entities and the authenticated principal.

use chrono::{DateTime, Utc};

/// A registered user account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for registering a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub login: String,
    pub email: String,
    pub password_hash: String,
}

/// The authenticated caller of a request.
///
/// Produced by the auth middleware and passed explicitly to every service
/// call that needs to know who is acting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub login: String,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            login: user.login.clone(),
        }
    }
}
