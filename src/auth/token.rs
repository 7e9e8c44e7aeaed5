// Access token (JWT) issuance and validation

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::error::AuthError;

/// Issuer claim carried by every access token
pub const ACCESS_TOKEN_ISSUER: &str = "chirpy-access";

/// HMAC key shared by issuance and validation.
///
/// Loaded once at startup and handed to every call; `Debug` never prints it.
#[derive(Clone)]
pub struct TokenSecret(Arc<[u8]>);

impl TokenSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(Arc::from(secret.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(<redacted>)")
    }
}

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies short-lived HS256 access tokens
pub struct AccessTokenCodec;

impl AccessTokenCodec {
    /// Issue a token for `identity` that expires `ttl` from now
    pub fn issue(identity: Uuid, secret: &[u8], ttl: Duration) -> Result<String, AuthError> {
        Self::issue_at(identity, secret, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(
        identity: Uuid,
        secret: &[u8],
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: identity.to_string(),
            iss: ACCESS_TOKEN_ISSUER.to_string(),
            iat,
            exp: iat + ttl.num_seconds(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| AuthError::SigningFailure(e.to_string()))
    }

    /// Validate a token and return the user it was issued for
    pub fn validate(token: &str, secret: &[u8]) -> Result<Uuid, AuthError> {
        Self::validate_at(token, secret, Utc::now())
    }

    /// Validate a token as if the current time were `now`.
    ///
    /// The signature is checked before any claim is read. Claims are then
    /// checked in order: expiry, issuer, subject.
    pub fn validate_at(token: &str, secret: &[u8], now: DateTime<Utc>) -> Result<Uuid, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against `now`, without leeway
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::SignatureInvalid
                }
                _ => AuthError::TokenMalformed(e.to_string()),
            })?;

        if now.timestamp() >= claims.exp {
            return Err(AuthError::TokenExpired);
        }

        if claims.iss != ACCESS_TOKEN_ISSUER {
            return Err(AuthError::IssuerMismatch(claims.iss));
        }

        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::SubjectInvalid(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &[u8] = b"test_secret_key_for_testing_purposes";

    fn sixty_minutes() -> Duration {
        Duration::minutes(60)
    }

    fn sign(claims: &Claims, secret: &[u8]) -> String {
        encode(&Header::default(), claims, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn decode_claims(token: &str) -> Claims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        decode::<Claims>(token, &DecodingKey::from_secret(SECRET), &validation)
            .unwrap()
            .claims
    }

    #[test]
    fn test_issued_token_validates_to_same_identity() {
        let user_id = Uuid::new_v4();
        let token = AccessTokenCodec::issue(user_id, SECRET, sixty_minutes()).unwrap();

        assert_eq!(AccessTokenCodec::validate(&token, SECRET).unwrap(), user_id);
    }

    #[test]
    fn test_claims_carry_issuer_and_lifetime() {
        let user_id = Uuid::new_v4();
        let token = AccessTokenCodec::issue(user_id, SECRET, sixty_minutes()).unwrap();
        let claims = decode_claims(&token);

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.iss, ACCESS_TOKEN_ISSUER);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_issue_is_deterministic_for_same_instant() {
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let first = AccessTokenCodec::issue_at(user_id, SECRET, sixty_minutes(), now).unwrap();
        let second = AccessTokenCodec::issue_at(user_id, SECRET, sixty_minutes(), now).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_token_expires_after_ttl() {
        let user_id = Uuid::new_v4();
        let issued = Utc::now();
        let token = AccessTokenCodec::issue_at(user_id, SECRET, sixty_minutes(), issued).unwrap();

        let just_before = issued + sixty_minutes() - Duration::seconds(1);
        assert_eq!(
            AccessTokenCodec::validate_at(&token, SECRET, just_before).unwrap(),
            user_id
        );

        let at_expiry = issued + sixty_minutes();
        assert!(matches!(
            AccessTokenCodec::validate_at(&token, SECRET, at_expiry),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_token_issued_in_the_past_is_expired() {
        let issued = Utc::now() - Duration::hours(2);
        let token =
            AccessTokenCodec::issue_at(Uuid::new_v4(), SECRET, sixty_minutes(), issued).unwrap();

        assert!(matches!(
            AccessTokenCodec::validate(&token, SECRET),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_secret_is_signature_invalid() {
        let token = AccessTokenCodec::issue(Uuid::new_v4(), b"secret1", sixty_minutes()).unwrap();

        assert!(matches!(
            AccessTokenCodec::validate(&token, b"secret2"),
            Err(AuthError::SignatureInvalid)
        ));
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let token = AccessTokenCodec::issue(Uuid::new_v4(), SECRET, sixty_minutes()).unwrap();
        let (signed, signature) = token.rsplit_once('.').unwrap();

        let mut chars: Vec<char> = signature.chars().collect();
        chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
        let tampered = format!("{}.{}", signed, chars.into_iter().collect::<String>());

        assert!(matches!(
            AccessTokenCodec::validate(&tampered, SECRET),
            Err(AuthError::SignatureInvalid)
        ));
    }

    #[test]
    fn test_tampered_claims_are_rejected() {
        let victim = Uuid::new_v4();
        let token = AccessTokenCodec::issue(Uuid::new_v4(), SECRET, sixty_minutes()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let forged = sign(
            &Claims {
                sub: victim.to_string(),
                iss: ACCESS_TOKEN_ISSUER.to_string(),
                iat: 0,
                exp: i64::MAX,
            },
            b"attacker",
        );
        let forged_claims = forged.split('.').nth(1).unwrap();
        let spliced = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

        assert!(matches!(
            AccessTokenCodec::validate(&spliced, SECRET),
            Err(AuthError::SignatureInvalid)
        ));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        for token in ["", "invalid_token_format", "not.a.token", "a.b"] {
            assert!(
                matches!(
                    AccessTokenCodec::validate(token, SECRET),
                    Err(AuthError::TokenMalformed(_))
                ),
                "{token}"
            );
        }
    }

    #[test]
    fn test_foreign_issuer_is_rejected() {
        let now = Utc::now().timestamp();
        let token = sign(
            &Claims {
                sub: Uuid::new_v4().to_string(),
                iss: "chirpy-refresh".to_string(),
                iat: now,
                exp: now + 3600,
            },
            SECRET,
        );

        assert!(matches!(
            AccessTokenCodec::validate(&token, SECRET),
            Err(AuthError::IssuerMismatch(iss)) if iss == "chirpy-refresh"
        ));
    }

    #[test]
    fn test_non_uuid_subject_is_rejected() {
        let now = Utc::now().timestamp();
        let token = sign(
            &Claims {
                sub: "42".to_string(),
                iss: ACCESS_TOKEN_ISSUER.to_string(),
                iat: now,
                exp: now + 3600,
            },
            SECRET,
        );

        assert!(matches!(
            AccessTokenCodec::validate(&token, SECRET),
            Err(AuthError::SubjectInvalid(_))
        ));
    }

    #[test]
    fn test_signature_checked_before_claims() {
        let now = Utc::now().timestamp();
        let token = sign(
            &Claims {
                sub: "not-a-uuid".to_string(),
                iss: "someone-else".to_string(),
                iat: now - 7200,
                exp: now - 3600,
            },
            b"other-secret",
        );

        assert!(matches!(
            AccessTokenCodec::validate(&token, SECRET),
            Err(AuthError::SignatureInvalid)
        ));
    }

    #[test]
    fn test_secret_is_redacted_in_debug_output() {
        let secret = TokenSecret::new("super-secret-value");

        assert_eq!(secret.as_bytes(), b"super-secret-value");
        assert!(!format!("{:?}", secret).contains("super-secret-value"));
    }

    proptest! {
        #[test]
        fn prop_issue_then_validate_returns_identity(
            raw_id in any::<u128>(),
            ttl_seconds in 60i64..86_400,
            secret in proptest::collection::vec(any::<u8>(), 1..64)
        ) {
            let user_id = Uuid::from_u128(raw_id);
            let token = AccessTokenCodec::issue(user_id, &secret, Duration::seconds(ttl_seconds))?;
            prop_assert_eq!(AccessTokenCodec::validate(&token, &secret)?, user_id);
        }

        #[test]
        fn prop_random_strings_are_rejected(malformed in "[a-zA-Z0-9]{10,50}") {
            prop_assert!(AccessTokenCodec::validate(&malformed, SECRET).is_err());
        }
    }
}
