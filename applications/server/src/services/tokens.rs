//! One-time tokens for email verification and password reset
//!
//! The raw token goes out by mail; only its SHA-256 digest is stored.

use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tunehub_core::types::{timestamp, TokenDigest};

const TOKEN_BYTES: usize = 32;

/// A freshly issued token and the form it is stored in
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub raw: String,
    pub stored: TokenDigest,
}

/// Issue a random token valid for `ttl_minutes`
pub fn issue(ttl_minutes: u64) -> IssuedToken {
    let mut bytes = [0_u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);

    let expires_at = timestamp::format(Utc::now() + Duration::minutes(ttl_minutes as i64));

    IssuedToken {
        stored: TokenDigest {
            digest: digest(&raw),
            expires_at,
        },
        raw,
    }
}

/// Hex SHA-256 of a raw token
pub fn digest(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}
