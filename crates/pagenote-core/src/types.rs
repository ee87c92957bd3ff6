//! Identity and session types.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::address::ContentAddress;
use crate::error::{CoreError, Result};

/// An identity whose personal store can be written to or read from.
///
/// `id` is opaque to this crate (a DID, a WebID, a handle). `root` is the
/// base URL of the identity's store; records live under it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub root: Url,
}

impl Identity {
    /// Create an identity from an id and a store root.
    pub fn new(id: impl Into<String>, root: Url) -> Self {
        Self {
            id: id.into(),
            root,
        }
    }

    /// Parse the store root from a string.
    pub fn parse(id: impl Into<String>, root: &str) -> Result<Self> {
        let root = Url::parse(root).map_err(|e| CoreError::InvalidIdentity(e.to_string()))?;
        if root.cannot_be_a_base() {
            return Err(CoreError::InvalidIdentity(format!(
                "store root cannot hold paths: {root}"
            )));
        }
        Ok(Self::new(id, root))
    }

    /// URL of the record for `address` under `namespace`:
    /// `<root>/<namespace>/<address>.json`.
    pub fn record_url(&self, namespace: &str, address: &ContentAddress) -> Result<Url> {
        let root = self.root.as_str().trim_end_matches('/');
        let namespace = namespace.trim_matches('/');

        let joined = if namespace.is_empty() {
            format!("{root}/{}", address.file_name())
        } else {
            format!("{root}/{namespace}/{}", address.file_name())
        };

        Url::parse(&joined).map_err(|e| CoreError::InvalidIdentity(e.to_string()))
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// An opaque bearer token bound to one identity.
///
/// `Debug` never prints the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session(String);

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    pub fn token(&self) -> &str {
        &self.0
    }

    /// Value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Session(<redacted>)")
    }
}

/// Get current time in milliseconds.
pub fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_url() {
        let alice = Identity::parse("did:example:alice", "https://alice.example/").unwrap();
        let address = ContentAddress::from_bytes([0x01; 32]);

        let url = alice.record_url("pagenote", &address).unwrap();
        assert_eq!(
            url.as_str(),
            format!("https://alice.example/pagenote/{}.json", "01".repeat(32))
        );
    }

    #[test]
    fn test_record_url_nested_root() {
        let bob = Identity::parse("bob", "https://pods.example/bob").unwrap();
        let address = ContentAddress::from_bytes([0xff; 32]);

        let url = bob.record_url("/links/", &address).unwrap();
        assert_eq!(
            url.as_str(),
            format!("https://pods.example/bob/links/{}.json", "ff".repeat(32))
        );
    }

    #[test]
    fn test_identity_rejects_opaque_root() {
        assert!(Identity::parse("x", "mailto:x@example.com").is_err());
        assert!(Identity::parse("x", "not a url").is_err());
    }

    #[test]
    fn test_session_debug_redacted() {
        let session = Session::new("secret-token");
        assert_eq!(format!("{:?}", session), "Session(<redacted>)");
        assert_eq!(session.bearer(), "Bearer secret-token");
    }
}
