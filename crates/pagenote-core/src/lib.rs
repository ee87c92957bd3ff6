//! # pagenote Core
//!
//! Pure primitives for pagenote: URL canonicalization, content addressing,
//! privacy tags and the record model.
//!
//! This crate contains no I/O, no storage, no networking. Everything here is
//! deterministic computation over strings and digests.
//!
//! ## Key Types
//!
//! - [`CanonicalUrl`] - Normalized URL used for hashing and comparison
//! - [`ContentAddress`] - SHA-256 of a canonical URL, used as a storage filename
//! - [`PrivacyTag`] - 10-character one-way tag used to query the central index
//! - [`Record`] - A user-authored note about a URL
//! - [`Identity`] / [`Session`] - Who is writing, and with what credential
//!
//! ## Addressing
//!
//! ```rust
//! use pagenote_core::{canonicalize, ContentAddress, PrivacyTag};
//!
//! let url = canonicalize("https://Example.com:443/a?b=2&a=1#top").unwrap();
//! assert_eq!(url.as_str(), "https://example.com/a?a=1&b=2");
//!
//! let address = ContentAddress::of(&url);
//! assert_eq!(address.to_hex().len(), 64);
//!
//! let tag = PrivacyTag::for_url(&url);
//! assert_eq!(tag.as_str().chars().count(), 10);
//! ```

pub mod address;
pub mod canonical;
pub mod error;
pub mod record;
pub mod types;

pub use address::{ContentAddress, PrivacyTag};
pub use canonical::{canonicalize, CanonicalUrl};
pub use error::{CoreError, Result};
pub use record::{sort_newest_first, Record, RecordKind};
pub use types::{now_millis, Identity, Session};
