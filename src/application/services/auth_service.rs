//! Registration, login and bearer token authentication.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use rand::{Rng, distr::Alphanumeric};
use sha2::Sha256;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::domain::entities::{AuthUser, NewAccessToken, NewUser, User};
use crate::domain::repositories::{TokenRepository, UserRepository};
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Length of the raw bearer tokens handed out at login.
pub const TOKEN_LENGTH: usize = 48;

/// A freshly issued bearer token. `token` is the only copy of the raw value.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

/// Service for user accounts and bearer token authentication.
///
/// Passwords are stored as Argon2 PHC strings. Tokens are hashed with
/// HMAC-SHA256 (keyed by `signing_secret`) before storage and comparison, so
/// read access to the database is not enough to use or forge a token.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenRepository>,
    signing_secret: String,
    token_ttl: Duration,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `users` - user account repository
    /// - `tokens` - token repository
    /// - `signing_secret` - HMAC key; must match the value used when tokens were created
    /// - `token_ttl` - lifetime of tokens issued by [`AuthService::login`]
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenRepository>,
        signing_secret: String,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            tokens,
            signing_secret,
            token_ttl,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Registers a new user.
    ///
    /// Field formats are checked at the HTTP boundary; this method enforces
    /// uniqueness and stores the e-mail lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the login or e-mail is already taken.
    /// Returns [`AppError::Internal`] on hashing or database errors.
    #[instrument(skip(self, email, password))]
    pub async fn register(&self, login: &str, email: &str, password: &str) -> Result<User, AppError> {
        let email = email.trim().to_lowercase();

        if self.users.find_by_login(login).await?.is_some() {
            return Err(AppError::conflict(
                "Login is already taken",
                json!({ "field": "login" }),
            ));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(
                "Email is already registered",
                json!({ "field": "email" }),
            ));
        }

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(NewUser {
                login: login.to_string(),
                email,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, "User registered");
        metrics::counter!("users_registered_total").increment(1);

        Ok(user)
    }

    /// Verifies credentials and issues a bearer token.
    ///
    /// `identifier` is looked up as an e-mail when it contains `@` and as a
    /// login otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for an unknown identifier and for a
    /// wrong password alike.
    #[instrument(skip(self, password))]
    pub async fn login(&self, identifier: &str, password: &str) -> Result<IssuedToken, AppError> {
        let identifier = identifier.trim();

        let user = if identifier.contains('@') {
            self.users.find_by_email(&identifier.to_lowercase()).await?
        } else {
            self.users.find_by_login(identifier).await?
        };

        let Some(user) = user else {
            warn!("Login failed: user not found");
            return Err(invalid_credentials());
        };

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = user.id, "Login failed: wrong password");
            return Err(invalid_credentials());
        }

        let expires_at = Utc::now().checked_add_signed(self.token_ttl).ok_or_else(|| {
            AppError::internal("Token lifetime is out of range", json!({}))
        })?;
        let token = generate_token();

        self.tokens
            .create_token(NewAccessToken {
                user_id: user.id,
                token_hash: self.hash_token(&token),
                expires_at,
            })
            .await?;

        info!(user_id = user.id, "User logged in");

        Ok(IssuedToken {
            token,
            expires_at,
            user: AuthUser::from(&user),
        })
    }

    /// Authenticates a raw bearer token and returns its owner.
    ///
    /// On success, updates the `last_used` timestamp for monitoring and
    /// audit purposes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if:
    /// - Token hash does not match any stored token
    /// - Token has been revoked or has expired
    /// - The owning user no longer exists
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AppError> {
        let token_hash = self.hash_token(token);

        let stored = self
            .tokens
            .find_by_hash(&token_hash)
            .await?
            .filter(|t| t.is_usable(Utc::now()))
            .ok_or_else(invalid_token)?;

        let user = self
            .users
            .find_by_id(stored.user_id)
            .await?
            .ok_or_else(invalid_token)?;

        if let Err(e) = self.tokens.update_last_used(&token_hash).await {
            warn!(error = %e, "Failed to update token last_used_at");
        }

        Ok(AuthUser::from(&user))
    }

    /// Revokes the presented token.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        if self.tokens.revoke(&self.hash_token(token)).await? {
            info!("Token revoked");
        }
        Ok(())
    }

    /// Revokes every active token of the user with `login`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no such user exists.
    pub async fn revoke_all_for_login(&self, login: &str) -> Result<u64, AppError> {
        let user = self
            .users
            .find_by_login(login)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({ "login": login })))?;

        self.tokens.revoke_all_for_user(user.id).await
    }

    /// All registered users ordered by id.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.users.list().await
    }
}

/// Generates a random alphanumeric bearer token.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Hashes a password into an Argon2 PHC string with a random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to hash password");
            AppError::internal("Failed to hash password", json!({}))
        })
}

fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| {
        tracing::error!(error = %e, "Stored password hash is malformed");
        AppError::internal("Failed to verify password", json!({}))
    })?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid login or password", json!({}))
}

fn invalid_token() -> AppError {
    AppError::unauthorized(
        "Unauthorized",
        json!({ "reason": "Invalid, expired or revoked token" }),
    )
}
