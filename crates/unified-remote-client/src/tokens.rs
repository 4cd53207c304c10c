//! Per-call random tokens (nonce and client guid)

use uuid::Uuid;

/// Source of one-time tokens for a handshake
///
/// Every call to [`TokenSource::next_token`] must return a value that was
/// never handed out before.
pub trait TokenSource: Send + Sync {
    fn next_token(&self) -> String;
}

/// Random v4 UUIDs in hyphenated form
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTokens;

impl TokenSource for UuidTokens {
    fn next_token(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
