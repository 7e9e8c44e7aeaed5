// Authentication request and response DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::users::UserResponse;

/// Login request DTO.
///
/// Not validated: a malformed email is just an unknown account and gets the
/// same 401 as a wrong password.
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "walt@breakingbad.com")]
    pub email: String,
    #[schema(example = "04234")]
    pub password: String,
}

/// Successful login: the user plus both tokens
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    /// Access token, valid for 60 minutes
    pub token: String,
    /// Refresh token, valid for 60 days or until revoked
    pub refresh_token: String,
}

/// Fresh access token minted from a refresh token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}
