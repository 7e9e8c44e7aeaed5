// HTTP handlers for user endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::{blocking, AuthenticatedUser};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::users::models::{UserCredentials, UserResponse};
use crate::AppState;

/// Register a new user
/// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserCredentials,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid email or empty password"),
        (status = 409, description = "Email already registered")
    ),
    tag = "users"
)]
pub async fn create_user_handler(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<UserCredentials>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    request.validate()?;

    let hashed_password = hash_in_background(&state, request.password.clone()).await?;
    let user = state.users.create(&request.email, &hashed_password).await?;

    tracing::info!("Created user {}", user.id);
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Change the caller's email and password
/// PUT /api/users
#[utoipa::path(
    put,
    path = "/api/users",
    request_body = UserCredentials,
    responses(
        (status = 200, description = "Credentials updated", body = UserResponse),
        (status = 400, description = "Invalid email or empty password"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 409, description = "Email already registered")
    ),
    tag = "users"
)]
pub async fn update_user_handler(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    ApiJson(request): ApiJson<UserCredentials>,
) -> Result<Json<UserResponse>, ApiError> {
    request.validate()?;

    let hashed_password = hash_in_background(&state, request.password.clone()).await?;
    let user = state
        .users
        .update_credentials(caller.user_id, &request.email, &hashed_password)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "User".to_string(),
            id: caller.user_id.to_string(),
        })?;

    tracing::info!("Updated credentials for user {}", user.id);
    Ok(Json(user.into()))
}

async fn hash_in_background(state: &AppState, password: String) -> Result<String, ApiError> {
    let auth = state.auth.clone();
    Ok(blocking(move || auth.hash_password(&password)).await?)
}
