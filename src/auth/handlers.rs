// HTTP handlers for session endpoints

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};

use crate::{
    auth::{
        middleware::authorization_header,
        models::{LoginRequest, LoginResponse, TokenResponse},
        service::blocking,
        store::RefreshTokenStore,
    },
    error::ApiError,
    extract::ApiJson,
    AppState,
};

/// Log a user in
/// POST /api/login
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Body is not a login request"),
        (status = 401, description = "Unknown email or wrong password")
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let LoginRequest { email, password } = request;
    let auth = state.auth.clone();

    let Some(user) = state.users.find_by_email(&email).await? else {
        tracing::debug!("Login attempt for unknown account");
        let rejection = blocking(move || Ok(auth.reject_unknown_account(&password))).await?;
        return Err(rejection.into());
    };

    let secret = state.config.jwt_secret.clone();
    let stored_hash = user.hashed_password.clone();
    let user_id = user.id;
    let pair = blocking(move || auth.login(&password, &stored_hash, user_id, secret.as_bytes()))
        .await?;

    // Must be stored before the client can present it
    state
        .refresh_tokens
        .insert(&pair.refresh_token, user.id, pair.refresh_expires_at)
        .await?;

    tracing::info!("User {} logged in", user.id);
    Ok(Json(LoginResponse {
        user: user.into(),
        token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// Exchange a refresh token for a new access token
/// POST /api/refresh
#[utoipa::path(
    post,
    path = "/api/refresh",
    responses(
        (status = 200, description = "New access token", body = TokenResponse),
        (status = 401, description = "Refresh token missing, unknown, expired or revoked")
    ),
    tag = "auth"
)]
pub async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .auth
        .refresh(
            authorization_header(&headers),
            &state.refresh_tokens,
            state.config.jwt_secret.as_bytes(),
        )
        .await?;

    Ok(Json(TokenResponse { token }))
}

/// Revoke a refresh token
/// POST /api/revoke
#[utoipa::path(
    post,
    path = "/api/revoke",
    responses(
        (status = 204, description = "Token revoked (or was never live)"),
        (status = 401, description = "Authorization header missing or malformed")
    ),
    tag = "auth"
)]
pub async fn revoke_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state
        .auth
        .revoke(authorization_header(&headers), &state.refresh_tokens)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
