//! Login signature for the seller API.
//!
//! The login endpoint authenticates with a one-way hash over the API secret
//! and the current unix time: `sign = sha256(api_key + timestamp)`, hex
//! encoded, with the timestamp submitted alongside as a decimal string.

use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};

/// Signature plus the timestamp it covers. Both go into the login payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSignature {
    pub timestamp: String,
    pub sign: String,
}

/// Sign a login attempt against the current clock.
#[must_use]
pub fn login_signature(api_key: &str) -> LoginSignature {
    login_signature_with_timestamp(api_key, current_timestamp())
}

/// Deterministic variant for tests.
#[must_use]
pub fn login_signature_with_timestamp(api_key: &str, timestamp: u64) -> LoginSignature {
    let timestamp = timestamp.to_string();

    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hasher.update(timestamp.as_bytes());
    let sign = hex::encode(hasher.finalize());

    LoginSignature { timestamp, sign }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
