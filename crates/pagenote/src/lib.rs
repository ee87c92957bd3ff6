//! # pagenote
//!
//! Post about a URL to your own data store, and find what others said about
//! it, without telling a central index which URL you are looking at.
//!
//! ## Overview
//!
//! A [`Client`] owns everything a session needs:
//!
//! - the result cache (30 second TTL per canonical URL)
//! - the current session and identity, obtained through a relay handshake
//! - the peer set used for direct reads when the index comes up empty
//! - the transport and key-value store it was built with
//!
//! ## Usage
//!
//! ```rust,no_run
//! use pagenote::{Client, ClientConfig, PostRequest, TracingPresenter};
//!
//! # async fn example() -> pagenote::Result<()> {
//! let client = Client::open("pagenote.db", ClientConfig::from_env())?;
//! client.restore().await?;
//!
//! if !client.is_signed_in().await {
//!     client.start_authorization(&TracingPresenter).await?;
//! }
//!
//! client
//!     .publish(PostRequest::new("https://example.com/article").tags(["rust"]))
//!     .await?;
//!
//! for record in client.search("https://example.com/article#comments").await? {
//!     println!("{:?}: {}", record.author, record.note);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod writer;

pub use cache::ResultCache;
pub use client::{Client, PostRequest, SessionState};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use writer::StoreWriter;

pub use pagenote_auth::{ApprovalPresenter, HandshakeState, TracingPresenter};
pub use pagenote_core::{
    canonicalize, CanonicalUrl, ContentAddress, Identity, PrivacyTag, Record, RecordKind, Session,
};
pub use pagenote_net::{Degradation, SearchOutcome, Source};
pub use pagenote_store::Bookmark;

/// Content address of a raw URL's canonical form.
pub fn content_address(url: &str) -> Result<ContentAddress> {
    Ok(ContentAddress::of(&canonicalize(url)?))
}

/// Privacy tag for a raw URL.
///
/// Tags the canonical form when `url` parses, the raw string otherwise.
pub fn privacy_tag(url: &str) -> PrivacyTag {
    match canonicalize(url) {
        Ok(canonical) => PrivacyTag::for_url(&canonical),
        Err(_) => PrivacyTag::derive(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_address_uses_canonical_form() {
        assert_eq!(
            content_address("https://EXAMPLE.com:443#top").unwrap().to_hex(),
            "100680ad546ce6a577f42f52df33b4cfdca756859e664b8d7de329b150d09ce9"
        );
        assert!(content_address("nope").is_err());
    }

    #[test]
    fn test_privacy_tag_total() {
        assert_eq!(privacy_tag("https://example.com/?b=1&a=2"), privacy_tag("https://example.com/?a=2&b=1"));
        assert_eq!(privacy_tag("").as_str().chars().count(), PrivacyTag::LEN);
        assert_eq!(privacy_tag("not a url"), PrivacyTag::derive("not a url"));
    }
}
