use super::models::{AccessTokenResponse, LoginRequest, RefreshRequest, TokenResponse};
use super::services::login;
use super::tokens::refresh_access;
use crate::common::errors::ApiResult;
use crate::common::extract::ApiJson;
use crate::common::state::AppState;
use crate::validation_error;
use axum::extract::State;
use axum::response::Json;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Login and refresh stay public
pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(obtain_token))
        .routes(routes!(refresh_token))
        .with_state(state.clone())
}

#[utoipa::path(
    post,
    path = "/api/token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenResponse),
        (status = 400, description = "Email or password missing"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account disabled or not an administrator")
    ),
    tag = "auth"
)]
pub async fn obtain_token(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    Ok(Json(login(&state.db, &state.config, &payload).await?))
}

#[utoipa::path(
    post,
    path = "/api/token/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 400, description = "Refresh token missing"),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> ApiResult<Json<AccessTokenResponse>> {
    let token = payload
        .refresh
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| validation_error!("refresh", "refresh token is required"))?;
    let access = refresh_access(token.trim(), &state.config)?;
    Ok(Json(AccessTokenResponse { access }))
}
