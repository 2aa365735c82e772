//! Domain layer containing business entities and rules.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`expiry`] - Expiration validation and evaluation
//! - [`ownership`] - Owner check that hides foreign mappings
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Repository traits define contracts implemented by infrastructure layer
//! - Rules take "now" and the acting user as parameters; nothing is read from
//!   ambient state
//! - Business workflows live in services (see [`crate::application::services`])

pub mod entities;
pub mod expiry;
pub mod ownership;
pub mod repositories;
