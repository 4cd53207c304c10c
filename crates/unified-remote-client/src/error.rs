//! Error types for the remote handshake

use crate::transport::TransportError;
use std::fmt;
use thiserror::Error;

/// Result type for dispatcher operations
pub type DispatchResult<T> = Result<T, DispatchError>;

/// The handshake step a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Connect,
    Negotiate,
    Authenticate,
    Trigger,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Connect => "connect",
            Step::Negotiate => "negotiate",
            Step::Authenticate => "authenticate",
            Step::Trigger => "trigger",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort a handshake
///
/// There is no authentication error: the server silently ignores a bad
/// password proof, so a wrong password is only visible on the remote device.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The HTTP call itself failed
    #[error("transport error during {step}: {source}")]
    Transport {
        step: Step,
        #[source]
        source: TransportError,
    },

    /// The server answered with something other than the expected JSON
    #[error("protocol error during {step}: {reason}")]
    Protocol { step: Step, reason: String },
}

impl DispatchError {
    pub(crate) fn protocol(step: Step, reason: impl Into<String>) -> Self {
        DispatchError::Protocol {
            step,
            reason: reason.into(),
        }
    }

    /// The step that failed
    pub fn step(&self) -> Step {
        match self {
            DispatchError::Transport { step, .. } | DispatchError::Protocol { step, .. } => *step,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, DispatchError::Transport { .. })
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, DispatchError::Protocol { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_step() {
        let err = DispatchError::protocol(Step::Connect, "missing field `id`");
        assert_eq!(
            err.to_string(),
            "protocol error during connect: missing field `id`"
        );
        assert_eq!(err.step(), Step::Connect);
        assert!(err.is_protocol());

        let err = DispatchError::Transport {
            step: Step::Negotiate,
            source: TransportError::new("connection refused"),
        };
        assert_eq!(
            err.to_string(),
            "transport error during negotiate: connection refused"
        );
        assert!(err.is_transport());
    }
}
