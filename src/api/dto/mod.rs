//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization (camelCase on
//! the wire) and validator for input validation.

pub mod auth;
pub mod health;
pub mod stats;
pub mod url;
