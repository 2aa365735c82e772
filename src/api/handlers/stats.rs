//! Handlers for per-user statistics.

use axum::{Extension, Json, extract::State};
use chrono::Utc;

use crate::api::dto::stats::{StatsResponse, StatsUrlView, VisitsResponse};
use crate::api::dto::url::UrlView;
use crate::api::extract::ApiPath;
use crate::application::services::StatsSummary;
use crate::domain::entities::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every mapping of the caller, expired ones included.
///
/// # Endpoint
///
/// `GET /api/v1/url/all`
///
/// # Response
///
/// ```json
/// {
///   "totalVisits": 12,
///   "urls": [
///     {
///       "id": 1,
///       "shortUrlCode": "aB3dE5fG",
///       "shortUrl": "http://localhost:3000/aB3dE5fG",
///       "longUrl": "https://example.com",
///       "visits": 12,
///       "createdAt": "2026-01-01T00:00:00Z",
///       "expiresAt": null,
///       "active": true
///     }
///   ]
/// }
/// ```
pub async fn all_urls_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StatsResponse>, AppError> {
    let summary = state.stats_service.all_urls(&user, Utc::now()).await?;

    Ok(Json(to_response(&state, summary)))
}

/// Lists the caller's mappings that have not expired.
///
/// # Endpoint
///
/// `GET /api/v1/url/active`
pub async fn active_urls_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StatsResponse>, AppError> {
    let summary = state.stats_service.active_urls(&user, Utc::now()).await?;

    Ok(Json(to_response(&state, summary)))
}

/// Returns the visit count of one of the caller's mappings.
///
/// # Endpoint
///
/// `GET /api/v1/url/visits/{shortUrlCode}`
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or belongs to another user.
pub async fn visits_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiPath(code): ApiPath<String>,
) -> Result<Json<VisitsResponse>, AppError> {
    let visits = state.stats_service.visits(&user, &code).await?;

    Ok(Json(VisitsResponse {
        short_url_code: code,
        visits,
    }))
}

fn to_response(state: &AppState, summary: StatsSummary) -> StatsResponse {
    let urls = summary
        .urls
        .into_iter()
        .map(|u| {
            let short_url = state.url_service.short_url(&u.mapping.short_code);
            StatsUrlView {
                url: UrlView::new(u.mapping, short_url),
                active: u.active,
            }
        })
        .collect();

    StatsResponse {
        total_visits: summary.total_visits,
        urls,
    }
}
