//! Handlers for registration, login and logout.

use axum::{Json, extract::State, http::StatusCode};
use axum_auth::AuthBearer;
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::api::extract::ApiJson;
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new user.
///
/// # Endpoint
///
/// `POST /api/v1/auth/register`
///
/// # Request Body
///
/// ```json
/// {
///   "login": "alice",
///   "email": "alice@example.com",
///   "password": "secret123"
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request if a field is invalid.
/// Returns 409 Conflict if the login or e-mail is already registered.
pub async fn register_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    payload.validate()?;

    let user = state
        .auth_service
        .register(&payload.login, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            login: user.login,
            email: user.email,
            created_at: user.created_at,
        }),
    ))
}

/// Exchanges credentials for a bearer token.
///
/// # Endpoint
///
/// `POST /api/v1/auth/login`
///
/// # Errors
///
/// Returns 401 Unauthorized if the identifier or password is wrong.
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let issued = state
        .auth_service
        .login(&payload.identifier, &payload.password)
        .await?;

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer",
        expires_at: issued.expires_at,
    }))
}

/// Revokes the bearer token used for this request.
///
/// # Endpoint
///
/// `POST /api/v1/auth/logout`
pub async fn logout_handler(
    State(state): State<AppState>,
    AuthBearer(token): AuthBearer,
) -> Result<StatusCode, AppError> {
    state.auth_service.logout(&token).await?;

    Ok(StatusCode::NO_CONTENT)
}
