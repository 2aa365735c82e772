//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures. The rules that act on them live in
//! [`crate::domain::expiry`], [`crate::domain::ownership`] and the
//! application services.
//!
//! # Entity Types
//!
//! - [`UrlMapping`] - A short code → long URL mapping owned by a user
//! - [`User`] - A registered account
//! - [`AccessToken`] - A bearer token issued at login
//! - [`AuthUser`] - The authenticated principal of a request
//!
//! Creation uses separate `New*` structs; the store assigns ids and timestamps.

pub mod token;
pub mod url_mapping;
pub mod user;

pub use token::{AccessToken, NewAccessToken};
pub use url_mapping::{NewUrlMapping, UrlMapping, UrlMappingPatch};
pub use user::{AuthUser, NewUser, User};
