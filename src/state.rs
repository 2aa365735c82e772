//! Shared application state injected into every handler.

use std::sync::Arc;

use chrono::Duration;

use crate::application::services::{AuthService, CodeResolver, StatsService, UrlService};
use crate::config::Config;
use crate::domain::repositories::{TokenRepository, UrlRepository, UserRepository};
use crate::infrastructure::memory::InMemoryStore;
use crate::utils::code_generator::{CodeGenerator, CodeSettings, RandomCodeGenerator};

/// Settings the services need beyond their repositories.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub base_url: String,
    pub token_signing_secret: String,
    pub token_ttl: Duration,
    pub code: CodeSettings,
}

impl AppSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            token_signing_secret: config.token_signing_secret.clone(),
            token_ttl: Duration::try_seconds(config.token_ttl_seconds).unwrap_or(Duration::MAX),
            code: config.code_settings(),
        }
    }
}

/// Services shared by all handlers. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub url_service: Arc<UrlService>,
    pub stats_service: Arc<StatsService>,
    pub auth_service: Arc<AuthService>,
}

impl AppState {
    /// Wires the services on top of the given repositories.
    pub fn new(
        urls: Arc<dyn UrlRepository>,
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenRepository>,
        generator: Arc<dyn CodeGenerator>,
        settings: AppSettings,
    ) -> Self {
        let resolver = CodeResolver::new(urls.clone(), generator, settings.code);

        Self {
            url_service: Arc::new(UrlService::new(urls.clone(), resolver, settings.base_url)),
            stats_service: Arc::new(StatsService::new(urls)),
            auth_service: Arc::new(AuthService::new(
                users,
                tokens,
                settings.token_signing_secret,
                settings.token_ttl,
            )),
        }
    }

    /// State backed by a single [`InMemoryStore`] and random codes.
    pub fn in_memory(store: Arc<InMemoryStore>, settings: AppSettings) -> Self {
        Self::new(
            store.clone(),
            store.clone(),
            store,
            Arc::new(RandomCodeGenerator::new()),
            settings,
        )
    }
}
