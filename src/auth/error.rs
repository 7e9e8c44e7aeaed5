// Authentication error types

use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Every way the authentication core can fail.
///
/// The variants are fine-grained so they can be logged, but only two outcomes
/// ever reach a client: `Unauthorized` for anything a caller could have
/// caused, and a generic server fault for the rest (see [`AuthError::is_internal`]).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    // Bearer extraction
    #[error("authorization header is missing")]
    HeaderMissing,

    #[error("authorization header is malformed")]
    HeaderMalformed,

    // Access token validation
    #[error("token is malformed: {0}")]
    TokenMalformed(String),

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    TokenExpired,

    #[error("unexpected token issuer: {0}")]
    IssuerMismatch(String),

    #[error("token subject is not a valid user id: {0}")]
    SubjectInvalid(String),

    /// Collapsed outcome returned by the facade
    #[error("Unauthorized")]
    Unauthorized,

    // Internal faults
    #[error("password hashing failed: {0}")]
    HashingFailure(String),

    #[error("password verification failed: {0}")]
    VerificationFailure(String),

    #[error("secure random source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("token signing failed: {0}")]
    SigningFailure(String),

    #[error("refresh token store error: {0}")]
    Store(String),

    #[error("password task did not complete: {0}")]
    TaskFailed(String),
}

impl AuthError {
    /// True for failures the caller did not cause. These are reported as a
    /// generic server error, never as `401`.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AuthError::HashingFailure(_)
                | AuthError::VerificationFailure(_)
                | AuthError::EntropyUnavailable(_)
                | AuthError::SigningFailure(_)
                | AuthError::Store(_)
                | AuthError::TaskFailed(_)
        )
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_internal() {
            ApiError::InternalError(err.to_string())
        } else {
            ApiError::Unauthorized("Unauthorized".to_string())
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
