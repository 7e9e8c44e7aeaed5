// Payment provider (Polka) webhooks

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    auth::{authorization_header, bearer::BearerExtractor},
    error::ApiError,
    extract::ApiJson,
    AppState,
};

/// The only event that changes anything
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

#[derive(Debug, Deserialize, ToSchema)]
pub struct PolkaEvent {
    #[schema(example = "user.upgraded")]
    pub event: String,
    #[serde(default)]
    pub data: PolkaEventData,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PolkaEventData {
    pub user_id: Option<Uuid>,
}

/// Proof that the request carries `Authorization: ApiKey <POLKA_KEY>`.
///
/// Runs before the body is read, so an unauthenticated caller gets 401 even
/// with a garbage payload.
pub struct PolkaCaller;

// Compare fixed-length digests so timing does not depend on the matching prefix
fn key_matches(header: &str, expected: Option<&str>) -> bool {
    match (BearerExtractor::extract(header), expected) {
        (Ok(presented), Some(expected)) => {
            Sha256::digest(presented.as_bytes()) == Sha256::digest(expected.as_bytes())
        }
        _ => false,
    }
}

#[async_trait]
impl FromRequestParts<AppState> for PolkaCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if key_matches(
            authorization_header(&parts.headers),
            state.config.polka_key.as_deref(),
        ) {
            Ok(PolkaCaller)
        } else {
            Err(ApiError::Unauthorized("Unauthorized".to_string()))
        }
    }
}

/// POST /api/polka/webhooks
#[utoipa::path(
    post,
    path = "/api/polka/webhooks",
    request_body = PolkaEvent,
    responses(
        (status = 204, description = "Event handled or ignored"),
        (status = 400, description = "Upgrade event without a user id, or unreadable body"),
        (status = 401, description = "Missing or wrong API key"),
        (status = 404, description = "User not found")
    ),
    tag = "webhooks"
)]
pub async fn polka_webhook_handler(
    State(state): State<AppState>,
    _caller: PolkaCaller,
    ApiJson(event): ApiJson<PolkaEvent>,
) -> Result<StatusCode, ApiError> {
    if event.event != USER_UPGRADED_EVENT {
        tracing::debug!("Ignoring Polka event {}", event.event);
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = event
        .data
        .user_id
        .ok_or_else(|| ApiError::BadRequest("user.upgraded event without data.user_id".to_string()))?;

    if !state.users.upgrade_to_chirpy_red(user_id).await? {
        return Err(ApiError::NotFound {
            resource: "User".to_string(),
            id: user_id.to_string(),
        });
    }

    tracing::info!("User {} upgraded to Chirpy Red", user_id);
    Ok(StatusCode::NO_CONTENT)
}
