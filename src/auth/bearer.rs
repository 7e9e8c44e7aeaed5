// Authorization header parsing

use crate::auth::error::AuthError;

/// Pulls the credential out of an `Authorization: <scheme> <credential>` value.
///
/// The scheme is read but not checked: `Basic abc` yields `abc` just like
/// `Bearer abc`. The webhook's `ApiKey <key>` header goes through here too.
pub struct BearerExtractor;

impl BearerExtractor {
    /// Return the second whitespace-separated field of `header_value`
    pub fn extract(header_value: &str) -> Result<&str, AuthError> {
        let trimmed = header_value.trim();
        if trimmed.is_empty() {
            return Err(AuthError::HeaderMissing);
        }

        trimmed
            .split_whitespace()
            .nth(1)
            .ok_or(AuthError::HeaderMalformed)
    }
}
