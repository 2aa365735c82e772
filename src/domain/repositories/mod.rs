//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - PostgreSQL implementations live in `crate::infrastructure::persistence`
//! - An in-process implementation lives in `crate::infrastructure::memory`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UrlRepository`] - Url mapping storage, uniqueness and visit counting
//! - [`UserRepository`] - User accounts
//! - [`TokenRepository`] - Login access tokens

pub mod token_repository;
pub mod url_repository;
pub mod user_repository;

pub use token_repository::TokenRepository;
pub use url_repository::UrlRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use url_repository::MockUrlRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
