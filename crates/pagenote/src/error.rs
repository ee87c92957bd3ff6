//! Error types for the client.

use pagenote_auth::AuthError;
use pagenote_core::CoreError;
use pagenote_net::NetError;
use pagenote_store::StoreError;
use thiserror::Error;

/// Errors surfaced by [`Client`](crate::Client) operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The input could not be parsed as a URL.
    #[error(transparent)]
    InvalidUrl(CoreError),

    /// A stored identity or content address is malformed.
    #[error(transparent)]
    Core(CoreError),

    /// The relay could not start a handshake.
    #[error("relay unavailable: {0}")]
    RelayUnavailable(String),

    /// The user declined, or the relay expired the request.
    #[error("authorization denied: {0}")]
    AuthDenied(String),

    /// No decision within the handshake deadline.
    #[error("authorization timed out")]
    AuthTimeout,

    /// The operation needs a signed-in identity.
    #[error("no identity: sign in first")]
    IdentityRequired,

    /// The personal store refused the write.
    #[error("write rejected with status {status}")]
    WriteRejected { status: u16 },

    /// A write never reached the personal store.
    #[error("transport error: {0}")]
    Transport(#[from] NetError),

    /// Local persistence failed.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<CoreError> for ClientError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidUrl { .. } => ClientError::InvalidUrl(e),
            other => ClientError::Core(other),
        }
    }
}

impl From<AuthError> for ClientError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::RelayUnavailable(reason) => ClientError::RelayUnavailable(reason),
            AuthError::Denied => ClientError::AuthDenied("denied by user".into()),
            AuthError::Expired => ClientError::AuthDenied("request expired".into()),
            AuthError::Timeout => ClientError::AuthTimeout,
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
