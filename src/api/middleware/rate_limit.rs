//! Rate limiting middleware using token bucket algorithm.

use axum::{Router, body::Body};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// How rate limiting is applied to the router.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitSettings {
    pub enabled: bool,
    /// When true, the client IP is read from `X-Forwarded-For` / `X-Real-IP` /
    /// `Forwarded` headers instead of the socket peer address. Enable only
    /// behind a trusted reverse proxy.
    pub behind_proxy: bool,
}

impl RateLimitSettings {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            behind_proxy: false,
        }
    }
}

/// Limits public endpoints.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Example
///
/// ```rust,ignore
/// let public = rate_limit::public(
///     Router::new().route("/{code}", get(redirect_handler)),
///     settings,
/// );
/// ```
pub fn public<S>(router: Router<S>, settings: RateLimitSettings) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    limited(router, settings, 2, 100)
}

/// Limits credential and write endpoints more strictly.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
///
/// Used for registration and login to slow down password guessing.
pub fn secure<S>(router: Router<S>, settings: RateLimitSettings) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    limited(router, settings, 1, 10)
}

fn limited<S>(
    router: Router<S>,
    settings: RateLimitSettings,
    per_second: u64,
    burst_size: u32,
) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if !settings.enabled {
        return router;
    }

    if settings.behind_proxy {
        router.layer(governor_layer(SmartIpKeyExtractor, per_second, burst_size))
    } else {
        router.layer(governor_layer(PeerIpKeyExtractor, per_second, burst_size))
    }
}

fn governor_layer<K: KeyExtractor>(
    key_extractor: K,
    per_second: u64,
    burst_size: u32,
) -> GovernorLayer<K, NoOpMiddleware<QuantaInstant>, Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(key_extractor)
            .per_second(per_second)
            .burst_size(burst_size)
            .finish()
            .expect("rate limit period and burst size are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
