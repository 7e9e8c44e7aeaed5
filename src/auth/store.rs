// Refresh token persistence contract

use axum::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::error::AuthError;

/// Stored state of one refresh token
#[derive(Debug, Clone, FromRow)]
pub struct RefreshTokenRecord {
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Usable to mint access tokens: unrevoked and not yet expired
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && now < self.expires_at
    }
}

/// Where refresh tokens live between requests.
///
/// The auth core only relies on these four operations; the storage engine
/// is the implementor's business.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Record a newly issued token
    async fn insert(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError>;

    /// Fetch the record for `token`, whatever its state
    async fn lookup(&self, token: &str) -> Result<Option<RefreshTokenRecord>, AuthError>;

    /// Mark `token` revoked. Returns false if there was nothing to revoke.
    async fn revoke(&self, token: &str) -> Result<bool, AuthError>;

    /// Delete every stored token
    async fn purge(&self) -> Result<u64, AuthError>;
}
