//! Error types for pagenote core.

use thiserror::Error;

/// Core errors that can occur while addressing URLs and records.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid URL {input:?}: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("invalid content address: {0}")]
    InvalidAddress(String),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),
}

impl CoreError {
    pub(crate) fn invalid_url(input: &str, reason: impl ToString) -> Self {
        CoreError::InvalidUrl {
            input: input.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
