//! Handshake state machine.

use std::fmt;

/// Where a handshake attempt stands.
///
/// ```text
/// Idle -> RequestCreated -> Polling -> { Approved | Denied | Expired | TimedOut }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandshakeState {
    #[default]
    Idle,
    RequestCreated,
    Polling,
    Approved,
    Denied,
    Expired,
    TimedOut,
}

impl HandshakeState {
    /// No further transitions happen from a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            HandshakeState::Approved
                | HandshakeState::Denied
                | HandshakeState::Expired
                | HandshakeState::TimedOut
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HandshakeState::Idle => "idle",
            HandshakeState::RequestCreated => "request_created",
            HandshakeState::Polling => "polling",
            HandshakeState::Approved => "approved",
            HandshakeState::Denied => "denied",
            HandshakeState::Expired => "expired",
            HandshakeState::TimedOut => "timed_out",
        }
    }
}

impl fmt::Display for HandshakeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!HandshakeState::Idle.is_terminal());
        assert!(!HandshakeState::RequestCreated.is_terminal());
        assert!(!HandshakeState::Polling.is_terminal());
        assert!(HandshakeState::Approved.is_terminal());
        assert!(HandshakeState::Denied.is_terminal());
        assert!(HandshakeState::Expired.is_terminal());
        assert!(HandshakeState::TimedOut.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(HandshakeState::TimedOut.to_string(), "timed_out");
        assert_eq!(HandshakeState::default(), HandshakeState::Idle);
    }
}
