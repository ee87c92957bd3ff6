//! Error types for the net module.

use thiserror::Error;

/// Errors that can occur while talking to relays, indexes and stores.
#[derive(Debug, Error)]
pub enum NetError {
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote answered with a non-success status.
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A request body could not be encoded.
    #[error("encode error: {0}")]
    Encode(String),

    /// A URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Core error (addressing, identity roots).
    #[error("core error: {0}")]
    Core(#[from] pagenote_core::CoreError),
}

/// Result type for net operations.
pub type Result<T> = std::result::Result<T, NetError>;
