//! Single-use password reset tokens.
//!
//! Only the SHA-256 digest of a token is stored; the raw value is handed to
//! the caller once.

use sha2::{Digest, Sha256};
use steward_core::{AppError, AppResult};

/// Lifetime of an issued reset token.
pub(crate) const RESET_TOKEN_TTL_SECONDS: i64 = 3600;

/// Generates a random token. Returns `(raw_token_hex, sha256_hex)`.
pub(crate) fn generate_reset_token() -> AppResult<(String, String)> {
    let mut bytes = [0_u8; 32];
    getrandom::fill(&mut bytes).map_err(|error| {
        AppError::Internal(format!("failed to generate password reset token: {error}"))
    })?;

    let raw_token = hex::encode(bytes);
    let digest = hash_reset_token(&raw_token);
    Ok((raw_token, digest))
}

/// Computes the stored digest of a raw token.
pub(crate) fn hash_reset_token(raw_token: &str) -> String {
    hex::encode(Sha256::digest(raw_token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::{generate_reset_token, hash_reset_token};

    #[test]
    fn generated_digest_matches_raw_token() {
        let generated = generate_reset_token();
        let Ok((raw_token, digest)) = generated else {
            unreachable!("random source unavailable");
        };

        assert_eq!(raw_token.len(), 64);
        assert_eq!(hash_reset_token(&raw_token), digest);
        assert_ne!(raw_token, digest);
    }
}
