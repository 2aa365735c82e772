//! DTOs for per-user statistics.

use serde::Serialize;

use super::url::UrlView;

/// A mapping in a statistics listing.
#[derive(Debug, Serialize)]
pub struct StatsUrlView {
    #[serde(flatten)]
    pub url: UrlView,
    pub active: bool,
}

/// Response of `GET /api/v1/url/all` and `GET /api/v1/url/active`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_visits: i64,
    pub urls: Vec<StatsUrlView>,
}

/// Response of `GET /api/v1/url/visits/{shortUrlCode}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitsResponse {
    pub short_url_code: String,
    pub visits: i64,
}
