//! Opaque API tokens. Only the SHA-256 of a token is ever stored.

use rand::RngCore;
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 32;

/// New random token, hex encoded (64 chars).
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Pull the token out of an `Authorization` header value.
///
/// Accepts `Bearer <token>` and `Token <token>`.
pub fn extract_token(header_value: &str) -> Option<&str> {
    let token = header_value
        .strip_prefix("Bearer ")
        .or_else(|| header_value.strip_prefix("Token "))?
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
