//! In-process store backed by `DashMap`.
//!
//! Implements all three repository traits so the service can run (and be
//! tested over HTTP) without PostgreSQL. Data lives as long as the process.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{DashMap, mapref::entry::Entry};
use serde_json::json;

use crate::domain::entities::{
    AccessToken, NewAccessToken, NewUrlMapping, NewUser, UrlMapping, UrlMappingPatch, User,
};
use crate::domain::repositories::{TokenRepository, UrlRepository, UserRepository};
use crate::error::AppError;

/// In-memory implementation of the url, user and token repositories.
///
/// Short codes, logins, e-mails and token hashes are claimed through
/// `DashMap::entry`, which holds the shard lock for the check and the insert,
/// so two concurrent writers can never both claim the same key.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    urls: DashMap<i64, UrlMapping>,
    codes: DashMap<String, i64>,
    users: DashMap<i64, User>,
    logins: DashMap<String, i64>,
    emails: DashMap<String, i64>,
    tokens: DashMap<String, AccessToken>,
    next_url_id: AtomicI64,
    next_user_id: AtomicI64,
    next_token_id: AtomicI64,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(counter: &AtomicI64) -> i64 {
        counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Frees `code` only if it still points at `id`.
    fn release_code(&self, code: &str, id: i64) {
        self.codes.remove_if(code, |_, owner| *owner == id);
    }
}

#[async_trait]
impl UrlRepository for InMemoryStore {
    async fn try_create(&self, new_mapping: NewUrlMapping) -> Result<Option<UrlMapping>, AppError> {
        let Entry::Vacant(slot) = self.codes.entry(new_mapping.short_code.clone()) else {
            return Ok(None);
        };

        let id = Self::next_id(&self.next_url_id);
        let mapping = UrlMapping::new(
            id,
            new_mapping.short_code,
            new_mapping.long_url,
            0,
            Utc::now(),
            new_mapping.expires_at,
            new_mapping.owner_id,
        );

        self.urls.insert(id, mapping.clone());
        slot.insert(id);

        Ok(Some(mapping))
    }

    async fn exists_by_code(&self, short_code: &str) -> Result<bool, AppError> {
        Ok(self.codes.contains_key(short_code))
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        let Some(id) = self.codes.get(short_code).map(|id| *id) else {
            return Ok(None);
        };

        Ok(self.urls.get(&id).map(|m| m.clone()))
    }

    async fn find_all_by_owner(&self, owner_id: i64) -> Result<Vec<UrlMapping>, AppError> {
        let mut mappings: Vec<UrlMapping> = self
            .urls
            .iter()
            .filter(|m| m.owner_id == owner_id)
            .map(|m| m.clone())
            .collect();

        mappings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(mappings)
    }

    async fn increment_visits(&self, id: i64) -> Result<Option<UrlMapping>, AppError> {
        Ok(self.urls.get_mut(&id).map(|mut m| {
            m.visits += 1;
            m.clone()
        }))
    }

    async fn try_update(
        &self,
        id: i64,
        patch: UrlMappingPatch,
    ) -> Result<Option<UrlMapping>, AppError> {
        match self.codes.entry(patch.short_code.clone()) {
            Entry::Occupied(_) => return Ok(None),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let updated = self.urls.get_mut(&id).map(|mut m| {
            let old_code = std::mem::replace(&mut m.short_code, patch.short_code.clone());
            if let Some(expires_at) = patch.expires_at {
                m.expires_at = Some(expires_at);
            }
            (old_code, m.clone())
        });

        match updated {
            Some((old_code, mapping)) => {
                self.release_code(&old_code, id);
                Ok(Some(mapping))
            }
            None => {
                self.release_code(&patch.short_code, id);
                Err(AppError::not_found("Short URL not found", json!({ "id": id })))
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        match self.urls.remove(&id) {
            Some((_, mapping)) => {
                self.release_code(&mapping.short_code, id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let expired: Vec<i64> = self
            .urls
            .iter()
            .filter(|m| m.expires_at.is_some_and(|t| t <= now))
            .map(|m| m.id)
            .collect();

        let mut deleted = 0;
        for id in expired {
            if UrlRepository::delete(self, id).await? {
                deleted += 1;
            }
        }

        Ok(deleted)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.urls.len() as i64)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let id = Self::next_id(&self.next_user_id);

        match self.logins.entry(new_user.login.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::conflict(
                    "Login is already taken",
                    json!({ "field": "login" }),
                ));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        match self.emails.entry(new_user.email.clone()) {
            Entry::Occupied(_) => {
                self.logins.remove(&new_user.login);
                return Err(AppError::conflict(
                    "Email is already registered",
                    json!({ "field": "email" }),
                ));
            }
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let user = User {
            id,
            login: new_user.login,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        };
        self.users.insert(id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError> {
        let Some(id) = self.logins.get(login).map(|id| *id) else {
            return Ok(None);
        };
        UserRepository::find_by_id(self, id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let Some(id) = self.emails.get(email).map(|id| *id) else {
            return Ok(None);
        };
        UserRepository::find_by_id(self, id).await
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.clone()).collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }
}

#[async_trait]
impl TokenRepository for InMemoryStore {
    async fn create_token(&self, new_token: NewAccessToken) -> Result<AccessToken, AppError> {
        let Entry::Vacant(slot) = self.tokens.entry(new_token.token_hash.clone()) else {
            return Err(AppError::conflict("Token already exists", json!({})));
        };

        let token = AccessToken {
            id: Self::next_id(&self.next_token_id),
            user_id: new_token.user_id,
            token_hash: new_token.token_hash,
            created_at: Utc::now(),
            expires_at: new_token.expires_at,
            revoked_at: None,
            last_used_at: None,
        };
        slot.insert(token.clone());

        Ok(token)
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<AccessToken>, AppError> {
        Ok(self.tokens.get(token_hash).map(|t| t.clone()))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        if let Some(mut token) = self.tokens.get_mut(token_hash)
            && token.revoked_at.is_none()
        {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, AppError> {
        Ok(match self.tokens.get_mut(token_hash) {
            Some(mut token) if token.revoked_at.is_none() => {
                token.revoked_at = Some(Utc::now());
                true
            }
            _ => false,
        })
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> Result<u64, AppError> {
        let now = Utc::now();
        let mut revoked = 0;

        for mut token in self.tokens.iter_mut() {
            if token.user_id == user_id && token.revoked_at.is_none() {
                token.revoked_at = Some(now);
                revoked += 1;
            }
        }

        Ok(revoked)
    }
}
