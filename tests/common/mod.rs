#![allow(dead_code)]

use axum_test::TestServer;
use chrono::Duration;
use serde_json::{Value, json};
use std::sync::Arc;
use url_shortener::api::middleware::rate_limit::RateLimitSettings;
use url_shortener::domain::entities::{NewUrlMapping, UrlMapping};
use url_shortener::domain::repositories::UrlRepository;
use url_shortener::infrastructure::memory::InMemoryStore;
use url_shortener::routes::api_router;
use url_shortener::state::{AppSettings, AppState};
use url_shortener::utils::code_generator::CodeSettings;

pub const BASE_URL: &str = "http://sho.rt";
pub const PASSWORD: &str = "Secret123";

pub fn test_settings() -> AppSettings {
    AppSettings {
        base_url: BASE_URL.to_string(),
        token_signing_secret: "test-signing-secret".to_string(),
        token_ttl: Duration::seconds(3600),
        code: CodeSettings::default(),
    }
}

pub fn create_test_state(store: Arc<InMemoryStore>) -> AppState {
    AppState::in_memory(store, test_settings())
}

/// Server over a fresh in-memory store, without rate limiting.
pub fn create_test_server() -> (TestServer, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let server = server_for_state(create_test_state(store.clone()));
    (server, store)
}

pub fn server_for_state(state: AppState) -> TestServer {
    let app = api_router(state, RateLimitSettings::disabled());
    TestServer::new(app).unwrap()
}

/// Registers `login` with the shared test password and returns the user id.
pub async fn register(server: &TestServer, login: &str) -> i64 {
    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "login": login,
            "email": format!("{login}@example.com"),
            "password": PASSWORD,
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

pub async fn login(server: &TestServer, login: &str) -> String {
    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({
            "identifier": login,
            "password": PASSWORD,
        }))
        .await;

    response.assert_status_ok();
    response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Registers `login` and returns a fresh bearer token for it.
pub async fn register_and_login(server: &TestServer, login: &str) -> String {
    register(server, login).await;
    self::login(server, login).await
}

pub async fn shorten(server: &TestServer, token: &str, long_url: &str) -> Value {
    let response = server
        .post("/api/v1/url")
        .authorization_bearer(token)
        .json(&json!({ "longUrl": long_url }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}

/// Inserts a mapping that expired an hour ago, bypassing the service checks.
pub async fn insert_expired(store: &InMemoryStore, owner_id: i64, code: &str) -> UrlMapping {
    store
        .try_create(NewUrlMapping {
            short_code: code.to_string(),
            long_url: "https://example.com/expired".to_string(),
            owner_id,
            expires_at: Some(chrono::Utc::now() - Duration::hours(1)),
        })
        .await
        .unwrap()
        .unwrap()
}
