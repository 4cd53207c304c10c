//! Password proof for the authenticate step
//!
//! The server computes the same digest from its own copy of the password
//! and drops the client's requests when they differ, so the concatenation
//! order and the `:` separator must match exactly.

use crate::target::Credentials;
use sha2::{Digest, Sha256};

/// Compute the lowercase SHA-256 hex digest of bytes
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    result.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Derive the `Password` field of the authenticate request
///
/// - without username: `sha256(challenge + password + nonce)`
/// - with username: `sha256(challenge + username + ":" + password + nonce)`
pub fn password_digest(challenge: &str, credentials: Credentials<'_>, nonce: &str) -> String {
    let material = match credentials.username {
        Some(username) => format!(
            "{}{}:{}{}",
            challenge, username, credentials.password, nonce
        ),
        None => format!("{}{}{}", challenge, credentials.password, nonce),
    };
    sha256_hex(material.as_bytes())
}
