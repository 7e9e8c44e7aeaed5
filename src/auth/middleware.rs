// Request extractors for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::auth::{error::AuthError, service::AuthService, token::TokenSecret};

/// Raw `Authorization` header value, or "" when absent or not valid UTF-8
pub fn authorization_header(headers: &HeaderMap) -> &str {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Authenticated user extractor for protected routes
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    Arc<AuthService>: FromRef<S>,
    TokenSecret: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = Arc::<AuthService>::from_ref(state);
        let secret = TokenSecret::from_ref(state);

        let user_id = auth.authenticate(authorization_header(&parts.headers), secret.as_bytes())?;

        Ok(AuthenticatedUser { user_id })
    }
}
