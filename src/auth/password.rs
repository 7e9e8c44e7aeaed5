// Password hashing and verification

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::auth::error::AuthError;

/// Argon2id cost parameters. One value is used for the whole deployment and
/// is written into every hash, so verification never needs to read it back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl HashingCost {
    /// 64 MiB, one pass, four lanes
    pub const DEFAULT: Self = Self {
        memory_kib: 64 * 1024,
        iterations: 1,
        parallelism: 4,
    };

    #[cfg(test)]
    pub(crate) const FAST: Self = Self {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };
}

impl Default for HashingCost {
    fn default() -> Self {
        Self::DEFAULT
    }
}

const SALT_LEN: usize = 16;
const OUTPUT_LEN: usize = 32;

/// Password service for hashing and verification
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    /// Build a service with the deployment's cost parameters
    pub fn new(cost: HashingCost) -> Result<Self, AuthError> {
        let params = Params::new(
            cost.memory_kib,
            cost.iterations,
            cost.parallelism,
            Some(OUTPUT_LEN),
        )
        .map_err(|e| AuthError::HashingFailure(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password using Argon2id with a fresh random salt.
    ///
    /// Returns the PHC string (algorithm, version, parameters, salt, digest).
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| AuthError::HashingFailure(e.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| AuthError::HashingFailure(e.to_string()))?;

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::HashingFailure(e.to_string()))
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// The derivation always runs to completion with the parameters embedded
    /// in `hash`, and digests are compared in constant time. A mismatch is
    /// `Ok(false)`; only an unparseable or unsupported hash is an error.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AuthError::VerificationFailure(format!("invalid password hash: {}", e)))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::VerificationFailure(e.to_string())),
        }
    }
}
