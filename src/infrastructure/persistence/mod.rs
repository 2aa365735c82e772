//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow`.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - Url mappings, code uniqueness and visit counting
//! - [`PgUserRepository`] - User accounts
//! - [`PgTokenRepository`] - Login token storage and revocation

pub mod pg_token_repository;
pub mod pg_url_repository;
pub mod pg_user_repository;

pub use pg_token_repository::PgTokenRepository;
pub use pg_url_repository::PgUrlRepository;
pub use pg_user_repository::PgUserRepository;
