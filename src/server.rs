//! HTTP server initialization and runtime setup.
//!
//! Handles storage setup, migrations, and the Axum server lifecycle.

use crate::api::middleware::rate_limit::RateLimitSettings;
use crate::config::{Config, StorageBackend};
use crate::infrastructure::memory::InMemoryStore;
use crate::infrastructure::persistence::{PgTokenRepository, PgUrlRepository, PgUserRepository};
use crate::routes::app_router;
use crate::state::{AppSettings, AppState};
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens a PostgreSQL pool using the pool settings from `config`.
///
/// # Errors
///
/// Returns an error if no connection can be established.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Builds the application state for the configured storage backend.
///
/// With PostgreSQL, pending migrations are applied first.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn build_state(config: &Config) -> Result<AppState> {
    match config.storage {
        StorageBackend::Postgres => {
            let pool = connect_pool(config).await?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to apply database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(postgres_state(Arc::new(pool), config))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Ok(AppState::in_memory(
                Arc::new(InMemoryStore::new()),
                AppSettings::from_config(config),
            ))
        }
    }
}

/// Wires the services on top of the PostgreSQL repositories.
pub fn postgres_state(pool: Arc<PgPool>, config: &Config) -> AppState {
    AppState::new(
        Arc::new(PgUrlRepository::new(pool.clone())),
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgTokenRepository::new(pool)),
        Arc::new(RandomCodeGenerator::new()),
        AppSettings::from_config(config),
    )
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage (PostgreSQL pool + migrations, or the in-memory store)
/// - Services
/// - Axum HTTP server with graceful shutdown on Ctrl-C / SIGTERM
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config).await?;

    let app = app_router(
        state,
        RateLimitSettings {
            enabled: config.rate_limit_enabled,
            behind_proxy: config.behind_proxy,
        },
    );

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
