//! Error types for the auth module.

use thiserror::Error;

/// Errors that end a handshake attempt.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The relay could not mint a request.
    #[error("relay unavailable: {0}")]
    RelayUnavailable(String),

    /// The user declined.
    #[error("authorization denied")]
    Denied,

    /// The relay gave up on the request.
    #[error("authorization request expired")]
    Expired,

    /// No decision before the deadline.
    #[error("authorization timed out")]
    Timeout,
}

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;
