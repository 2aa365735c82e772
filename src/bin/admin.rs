//! CLI administration tool for url-shortener.
//!
//! Talks to the PostgreSQL store directly, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # List registered users
//! cargo run --bin admin -- user list
//!
//! # Revoke every access token of a user
//! cargo run --bin admin -- user revoke-tokens alice
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Delete expired short URLs
//! cargo run --bin admin -- urls purge-expired
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same configuration as the server (see `url_shortener::config`).
//! `STORAGE` must be `postgres`.

use url_shortener::config::{self, StorageBackend};
use url_shortener::server::{connect_pool, postgres_state};
use url_shortener::state::AppState;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing url-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage short URLs
    Urls {
        #[command(subcommand)]
        action: UrlsAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List all users
    List,

    /// Revoke every active access token of a user
    RevokeTokens {
        /// User login
        login: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum UrlsAction {
    /// Delete short URLs whose expiry has passed
    PurgeExpired {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    if config.storage != StorageBackend::Postgres {
        bail!("The admin tool requires STORAGE=postgres");
    }

    let pool = connect_pool(&config).await?;
    let state = postgres_state(Arc::new(pool.clone()), &config);

    match cli.command {
        Commands::User { action } => handle_user_action(action, &state).await?,
        Commands::Urls { action } => handle_urls_action(action, &state).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, state: &AppState) -> Result<()> {
    match action {
        UserAction::List => list_users(state).await?,
        UserAction::RevokeTokens { login, yes } => revoke_tokens(state, &login, yes).await?,
    }

    Ok(())
}

/// Prints all registered users.
///
/// ```text
/// 👥 Users
///
///   ID  Login                Email                          Registered
///   ───────────────────────────────────────────────────────────────────────────
///   1   alice                alice@example.com              2026-01-15 10:30
/// ```
async fn list_users(state: &AppState) -> Result<()> {
    println!("{}", "👥 Users".bright_blue().bold());
    println!();

    let users = state
        .auth_service
        .list_users()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users registered".yellow());
        return Ok(());
    }

    println!(
        "  {:<3} {:<20} {:<30} {:<20}",
        "ID".bright_white().bold(),
        "Login".bright_white().bold(),
        "Email".bright_white().bold(),
        "Registered".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for user in &users {
        println!(
            "  {:<3} {:<20} {:<30} {}",
            user.id.to_string().bright_black(),
            user.login.cyan(),
            user.email,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Revokes all active tokens of `login` after confirmation (default: No).
async fn revoke_tokens(state: &AppState, login: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔒 Revoke Access Tokens".bright_blue().bold());
    println!();
    println!("  User: {}", login.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Revoke all tokens of this user?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let revoked = state
        .auth_service
        .revoke_all_for_login(login)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke tokens: {}", e))?;

    println!();
    println!(
        "{} {}",
        "✅ Tokens revoked:".green().bold(),
        revoked.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn handle_urls_action(action: UrlsAction, state: &AppState) -> Result<()> {
    match action {
        UrlsAction::PurgeExpired { yes } => {
            println!("{}", "🧹 Purge Expired Short URLs".bright_blue().bold());
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Permanently delete all expired short URLs?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let deleted = state
                .url_service
                .purge_expired()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to purge expired URLs: {}", e))?;

            println!(
                "{} {}",
                "✅ Deleted:".green().bold(),
                deleted.to_string().bright_white().bold()
            );
            println!();
        }
    }

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of short URLs and of expired ones
/// - Total number of recorded visits
/// - Number of users and of usable tokens
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let urls_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await?;

    let expired_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM urls WHERE expires_at <= NOW()")
            .fetch_one(pool)
            .await?;

    let visits_total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(visits), 0)::BIGINT FROM urls")
        .fetch_one(pool)
        .await?;

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let tokens_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM user_tokens WHERE revoked_at IS NULL AND expires_at > NOW()",
    )
    .fetch_one(pool)
    .await?;

    println!("  Short URLs:    {}", urls_count.to_string().bright_green().bold());
    println!("  Expired:       {}", expired_count.to_string().yellow().bold());
    println!("  Visits:        {}", visits_total.to_string().bright_green().bold());
    println!("  Users:         {}", users_count.to_string().bright_green().bold());
    println!("  Active tokens: {}", tokens_count.to_string().bright_green().bold());
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
