// Authentication service - composes the auth primitives

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::auth::{
    bearer::BearerExtractor,
    error::AuthError,
    password::{HashingCost, PasswordService},
    refresh::RefreshTokenIssuer,
    store::RefreshTokenStore,
    token::AccessTokenCodec,
};

/// Access tokens live for 60 minutes
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 60;

/// Refresh tokens live for 60 days
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

/// Run password work (hashing, verification, login) on the blocking pool so
/// an Argon2 derivation does not hold up an async worker thread
pub async fn blocking<T, F>(work: F) -> Result<T, AuthError>
where
    F: FnOnce() -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AuthError::TaskFailed(e.to_string()))?
}

/// Tokens handed out by a successful login
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Expiry the refresh token must be stored with
    pub refresh_expires_at: DateTime<Utc>,
}

/// Authentication service coordinating all auth operations.
///
/// Holds no secrets and no mutable state; the signing secret and the refresh
/// token store are passed into each call.
pub struct AuthService {
    passwords: PasswordService,
    access_token_ttl: Duration,
    refresh_token_ttl: Duration,
    // Verified against when a login names an unknown account
    dummy_hash: String,
}

impl AuthService {
    /// Create an AuthService with the deployment's hashing cost
    pub fn new() -> Result<Self, AuthError> {
        Self::with_passwords(PasswordService::new(HashingCost::DEFAULT)?)
    }

    pub fn with_passwords(passwords: PasswordService) -> Result<Self, AuthError> {
        let dummy_hash = passwords.hash("chirpy-unknown-account")?;

        Ok(Self {
            passwords,
            access_token_ttl: Duration::minutes(ACCESS_TOKEN_TTL_MINUTES),
            refresh_token_ttl: Duration::days(REFRESH_TOKEN_TTL_DAYS),
            dummy_hash,
        })
    }

    /// Hash a password for storage
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        self.passwords.hash(password)
    }

    /// Resolve the user behind an `Authorization` header.
    ///
    /// Any failure comes back as `Unauthorized`; the reason is only logged.
    pub fn authenticate(&self, header_value: &str, secret: &[u8]) -> Result<Uuid, AuthError> {
        BearerExtractor::extract(header_value)
            .and_then(|token| AccessTokenCodec::validate(token, secret))
            .map_err(|e| {
                tracing::debug!("Access token rejected: {}", e);
                AuthError::Unauthorized
            })
    }

    /// Check a password and issue a fresh token pair.
    ///
    /// The caller must persist `refresh_token` with `refresh_expires_at`
    /// before handing it to the client.
    pub fn login(
        &self,
        password: &str,
        stored_hash: &str,
        identity: Uuid,
        secret: &[u8],
    ) -> Result<TokenPair, AuthError> {
        if !self.passwords.verify(password, stored_hash)? {
            tracing::debug!("Login rejected for user {}: password mismatch", identity);
            return Err(AuthError::Unauthorized);
        }

        let now = Utc::now();
        let access_token = AccessTokenCodec::issue_at(identity, secret, self.access_token_ttl, now)?;
        let refresh_token = RefreshTokenIssuer::generate()?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            refresh_expires_at: now + self.refresh_token_ttl,
        })
    }

    /// Reject a login for an account that does not exist.
    ///
    /// Runs one verification against a dummy hash so this path costs the
    /// same as a wrong password.
    pub fn reject_unknown_account(&self, password: &str) -> AuthError {
        if let Err(e) = self.passwords.verify(password, &self.dummy_hash) {
            return e;
        }
        AuthError::Unauthorized
    }

    /// Mint a new access token from a live refresh token.
    ///
    /// The refresh token itself is not rotated.
    pub async fn refresh<S>(
        &self,
        bearer_header: &str,
        store: &S,
        secret: &[u8],
    ) -> Result<String, AuthError>
    where
        S: RefreshTokenStore + ?Sized,
    {
        let token = BearerExtractor::extract(bearer_header).map_err(|e| {
            tracing::debug!("Refresh rejected: {}", e);
            AuthError::Unauthorized
        })?;

        let now = Utc::now();
        let record = match store.lookup(token).await? {
            Some(record) if record.is_live(now) => record,
            Some(record) => {
                tracing::debug!(
                    "Refresh rejected for user {}: token revoked or expired",
                    record.user_id
                );
                return Err(AuthError::Unauthorized);
            }
            None => {
                tracing::debug!("Refresh rejected: unknown token");
                return Err(AuthError::Unauthorized);
            }
        };

        AccessTokenCodec::issue_at(record.user_id, secret, self.access_token_ttl, now)
    }

    /// Revoke a refresh token. Unknown and already revoked tokens succeed.
    pub async fn revoke<S>(&self, bearer_header: &str, store: &S) -> Result<(), AuthError>
    where
        S: RefreshTokenStore + ?Sized,
    {
        let token = BearerExtractor::extract(bearer_header).map_err(|e| {
            tracing::debug!("Revoke rejected: {}", e);
            AuthError::Unauthorized
        })?;

        if !store.revoke(token).await? {
            tracing::debug!("Revoke of unknown or already revoked token");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::memory::MemoryRefreshTokenStore;

    const SECRET: &[u8] = b"test_secret_key_for_testing_purposes";

    fn test_service() -> AuthService {
        AuthService::with_passwords(PasswordService::new(HashingCost::FAST).unwrap()).unwrap()
    }

    fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }

    #[test]
    fn test_authenticate_valid_header() {
        let service = test_service();
        let user_id = Uuid::new_v4();
        let token = AccessTokenCodec::issue(user_id, SECRET, Duration::minutes(60)).unwrap();

        assert_eq!(service.authenticate(&bearer(&token), SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_authenticate_collapses_every_failure() {
        let service = test_service();
        let user_id = Uuid::new_v4();
        let expired = AccessTokenCodec::issue_at(
            user_id,
            SECRET,
            Duration::minutes(60),
            Utc::now() - Duration::hours(2),
        )
        .unwrap();
        let foreign = AccessTokenCodec::issue(user_id, b"other", Duration::minutes(60)).unwrap();

        let headers = vec![
            String::new(),
            "Bearer".to_string(),
            bearer("garbage"),
            bearer(&expired),
            bearer(&foreign),
        ];

        for header in headers {
            assert!(matches!(
                service.authenticate(&header, SECRET),
                Err(AuthError::Unauthorized)
            ));
        }
    }

    #[test]
    fn test_login_issues_usable_pair() {
        let service = test_service();
        let user_id = Uuid::new_v4();
        let hash = service.hash_password("hunter22").unwrap();

        let before = Utc::now();
        let pair = service.login("hunter22", &hash, user_id, SECRET).unwrap();

        assert_eq!(
            service.authenticate(&bearer(&pair.access_token), SECRET).unwrap(),
            user_id
        );
        assert_eq!(pair.refresh_token.len(), 64);
        assert!(pair.refresh_expires_at >= before + Duration::days(REFRESH_TOKEN_TTL_DAYS));
        assert!(pair.refresh_expires_at <= Utc::now() + Duration::days(REFRESH_TOKEN_TTL_DAYS));
    }

    #[test]
    fn test_login_wrong_password_is_unauthorized() {
        let service = test_service();
        let hash = service.hash_password("hunter22").unwrap();

        assert!(matches!(
            service.login("hunter23", &hash, Uuid::new_v4(), SECRET),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn test_login_with_corrupt_hash_is_internal() {
        let service = test_service();
        let result = service.login("hunter22", "not-a-phc-string", Uuid::new_v4(), SECRET);

        assert!(matches!(result, Err(AuthError::VerificationFailure(_))));
        assert!(result.unwrap_err().is_internal());
    }

    #[test]
    fn test_unknown_account_is_unauthorized() {
        let service = test_service();

        assert!(matches!(
            service.reject_unknown_account("whatever"),
            AuthError::Unauthorized
        ));
    }

    #[tokio::test]
    async fn test_login_refresh_revoke_flow() {
        let service = test_service();
        let store = MemoryRefreshTokenStore::new();
        let user_id = Uuid::new_v4();
        let hash = service.hash_password("correct horse").unwrap();

        let pair = service.login("correct horse", &hash, user_id, SECRET).unwrap();
        store
            .insert(&pair.refresh_token, user_id, pair.refresh_expires_at)
            .await
            .unwrap();

        let refreshed = service
            .refresh(&bearer(&pair.refresh_token), &store, SECRET)
            .await
            .unwrap();
        assert_eq!(service.authenticate(&bearer(&refreshed), SECRET).unwrap(), user_id);

        // Not rotated: the same refresh token keeps working
        assert!(service
            .refresh(&bearer(&pair.refresh_token), &store, SECRET)
            .await
            .is_ok());

        service
            .revoke(&bearer(&pair.refresh_token), &store)
            .await
            .unwrap();

        assert!(matches!(
            service
                .refresh(&bearer(&pair.refresh_token), &store, SECRET)
                .await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_refresh_rejects_unknown_token() {
        let service = test_service();
        let store = MemoryRefreshTokenStore::new();
        let token = RefreshTokenIssuer::generate().unwrap();

        assert!(matches!(
            service.refresh(&bearer(&token), &store, SECRET).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_refresh_rejects_expired_token() {
        let service = test_service();
        let store = MemoryRefreshTokenStore::new();
        let token = RefreshTokenIssuer::generate().unwrap();
        store
            .insert(&token, Uuid::new_v4(), Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        assert!(matches!(
            service.refresh(&bearer(&token), &store, SECRET).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let service = test_service();
        let store = MemoryRefreshTokenStore::new();
        let access = AccessTokenCodec::issue(Uuid::new_v4(), SECRET, Duration::minutes(60)).unwrap();

        assert!(matches!(
            service.refresh(&bearer(&access), &store, SECRET).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_refresh_missing_header_is_unauthorized() {
        let service = test_service();
        let store = MemoryRefreshTokenStore::new();

        assert!(matches!(
            service.refresh("", &store, SECRET).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let service = test_service();
        let store = MemoryRefreshTokenStore::new();
        let token = RefreshTokenIssuer::generate().unwrap();
        store
            .insert(&token, Uuid::new_v4(), Utc::now() + Duration::days(1))
            .await
            .unwrap();

        service.revoke(&bearer(&token), &store).await.unwrap();
        service.revoke(&bearer(&token), &store).await.unwrap();

        let never_issued = RefreshTokenIssuer::generate().unwrap();
        service.revoke(&bearer(&never_issued), &store).await.unwrap();

        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_revoke_malformed_header_is_unauthorized() {
        let service = test_service();
        let store = MemoryRefreshTokenStore::new();

        assert!(matches!(
            service.revoke("Bearer", &store).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_blocking_returns_work_result() {
        let service = std::sync::Arc::new(test_service());

        let hash = blocking({
            let service = service.clone();
            move || service.hash_password("hunter22")
        })
        .await
        .unwrap();

        assert!(service.login("hunter22", &hash, Uuid::new_v4(), SECRET).is_ok());
        assert!(matches!(
            blocking(|| Err::<(), _>(AuthError::Unauthorized)).await,
            Err(AuthError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_blocking_panic_is_internal_failure() {
        let result = blocking(|| -> Result<(), AuthError> { panic!("derivation blew up") }).await;

        assert!(matches!(result, Err(AuthError::TaskFailed(_))));
        assert!(result.unwrap_err().is_internal());
    }

    #[tokio::test]
    async fn test_purge_clears_every_token() {
        let store = MemoryRefreshTokenStore::new();
        for _ in 0..3 {
            let token = RefreshTokenIssuer::generate().unwrap();
            store
                .insert(&token, Uuid::new_v4(), Utc::now() + Duration::days(1))
                .await
                .unwrap();
        }

        assert_eq!(store.purge().await.unwrap(), 3);
        assert_eq!(store.len().await, 0);
    }
}
