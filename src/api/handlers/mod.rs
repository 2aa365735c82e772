//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod fallback;
pub mod health;
pub mod redirect;
pub mod stats;
pub mod url;
pub mod v2;

pub use auth::{login_handler, logout_handler, register_handler};
pub use fallback::{fallback_handler, method_not_allowed_handler};
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use stats::{active_urls_handler, all_urls_handler, visits_handler};
pub use url::{delete_handler, resolve_handler, shorten_handler, update_handler};
pub use v2::v2_handler;
