//! Business logic services for the application layer.

pub mod auth_service;
pub mod code_resolver;
pub mod stats_service;
pub mod url_service;

pub use auth_service::{AuthService, IssuedToken};
pub use code_resolver::CodeResolver;
pub use stats_service::{StatsService, StatsSummary, UrlStats};
pub use url_service::UrlService;
