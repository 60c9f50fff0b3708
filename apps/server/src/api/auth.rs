use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use retailpos_core::users::UserServiceTrait;

use crate::{
    auth::{verify_password, AuthError, CurrentUser},
    error::ApiResult,
    main_lib::AppState,
    models::{LoginRequest, LoginResponse, UserDto},
};

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses((status = 200, body = LoginResponse), (status = 401, description = "Invalid credentials"))
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let credentials = state
        .user_service
        .find_credentials_by_email(&payload.email)
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or(AuthError::InvalidCredentials)?;

    verify_password(&credentials.password_hash, &payload.password)?;
    if !credentials.user.is_active {
        tracing::info!("Rejected login for inactive user {}", credentials.user.email);
        return Err(AuthError::InvalidCredentials);
    }

    let token = state.auth.issue_token(&credentials.user)?;
    tracing::info!("User {} logged in", credentials.user.email);
    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.auth.expires_in().as_secs(),
        user: credentials.user.into(),
    }))
}

#[utoipa::path(get, path = "/api/v1/auth/me", responses((status = 200, body = UserDto)))]
pub async fn me(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<UserDto>> {
    let user = state.user_service.get_user(&current.id)?;
    Ok(Json(user.into()))
}

/// Routes reachable without a token.
pub fn public_router() -> Router<Arc<AppState>> {
    Router::new().route("/auth/login", post(login))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/auth/me", get(me))
}
