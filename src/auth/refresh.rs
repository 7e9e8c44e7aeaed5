// Opaque refresh token generation

use rand::rngs::OsRng;
use rand::RngCore;

use crate::auth::error::AuthError;

/// Random bytes per refresh token (256 bits)
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Generates opaque refresh tokens.
///
/// A refresh token has no structure to check; whether it is usable depends
/// entirely on the record a [`RefreshTokenStore`](crate::auth::store::RefreshTokenStore) holds for it.
pub struct RefreshTokenIssuer;

impl RefreshTokenIssuer {
    /// Draw 256 bits from the OS CSPRNG and hex-encode them
    pub fn generate() -> Result<String, AuthError> {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| AuthError::EntropyUnavailable(e.to_string()))?;

        Ok(hex::encode(bytes))
    }
}
