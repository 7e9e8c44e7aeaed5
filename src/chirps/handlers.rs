// HTTP handlers for chirp endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::chirps::{
    filter::clean_body,
    models::{Chirp, CreateChirpRequest},
};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::AppState;

fn parse_chirp_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid chirp id: {}", raw)))
}

fn chirp_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound {
        resource: "Chirp".to_string(),
        id: id.to_string(),
    }
}

/// Post a chirp as the authenticated user
/// POST /api/chirps
#[utoipa::path(
    post,
    path = "/api/chirps",
    request_body = CreateChirpRequest,
    responses(
        (status = 201, description = "Chirp created", body = Chirp),
        (status = 400, description = "Chirp is too long or body is not a chirp"),
        (status = 401, description = "Missing or invalid access token")
    ),
    tag = "chirps"
)]
pub async fn create_chirp_handler(
    State(state): State<AppState>,
    author: AuthenticatedUser,
    ApiJson(request): ApiJson<CreateChirpRequest>,
) -> Result<(StatusCode, Json<Chirp>), ApiError> {
    request.validate()?;

    let chirp = state
        .chirps
        .create(author.user_id, &clean_body(&request.body))
        .await?;

    tracing::info!("User {} posted chirp {}", author.user_id, chirp.id);
    Ok((StatusCode::CREATED, Json(chirp)))
}

/// List every chirp, oldest first
/// GET /api/chirps
#[utoipa::path(
    get,
    path = "/api/chirps",
    responses(
        (status = 200, description = "All chirps", body = Vec<Chirp>)
    ),
    tag = "chirps"
)]
pub async fn list_chirps_handler(State(state): State<AppState>) -> Result<Json<Vec<Chirp>>, ApiError> {
    let chirps = state.chirps.list_all().await?;

    tracing::debug!("Retrieved {} chirps", chirps.len());
    Ok(Json(chirps))
}

/// GET /api/chirps/{chirp_id}
#[utoipa::path(
    get,
    path = "/api/chirps/{chirp_id}",
    params(
        ("chirp_id" = Uuid, Path, description = "Chirp ID")
    ),
    responses(
        (status = 200, description = "Chirp found", body = Chirp),
        (status = 400, description = "Malformed chirp id"),
        (status = 404, description = "Chirp not found")
    ),
    tag = "chirps"
)]
pub async fn get_chirp_handler(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> Result<Json<Chirp>, ApiError> {
    let id = parse_chirp_id(&chirp_id)?;

    let chirp = state
        .chirps
        .find_by_id(id)
        .await?
        .ok_or_else(|| chirp_not_found(id))?;

    Ok(Json(chirp))
}

/// Delete one of the caller's chirps
/// DELETE /api/chirps/{chirp_id}
#[utoipa::path(
    delete,
    path = "/api/chirps/{chirp_id}",
    params(
        ("chirp_id" = Uuid, Path, description = "Chirp ID")
    ),
    responses(
        (status = 204, description = "Chirp deleted"),
        (status = 400, description = "Malformed chirp id"),
        (status = 401, description = "Missing or invalid access token"),
        (status = 403, description = "Chirp belongs to another user"),
        (status = 404, description = "Chirp not found")
    ),
    tag = "chirps"
)]
pub async fn delete_chirp_handler(
    State(state): State<AppState>,
    caller: AuthenticatedUser,
    Path(chirp_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_chirp_id(&chirp_id)?;

    let chirp = state
        .chirps
        .find_by_id(id)
        .await?
        .ok_or_else(|| chirp_not_found(id))?;

    if chirp.user_id != caller.user_id {
        return Err(ApiError::Forbidden(format!(
            "User {} may not delete chirp {}",
            caller.user_id, id
        )));
    }

    if !state.chirps.delete(id).await? {
        return Err(chirp_not_found(id));
    }

    tracing::info!("User {} deleted chirp {}", caller.user_id, id);
    Ok(StatusCode::NO_CONTENT)
}
