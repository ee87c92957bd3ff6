//! # pagenote Testkit
//!
//! Testing utilities for pagenote.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a scripted relay, index and personal stores on one
//!   in-memory network, plus clients wired to it
//! - **Generators**: proptest strategies for URLs and their trivial variants
//! - **Golden vectors**: canonical forms and content addresses of known URLs
//!
//! ## Test Fixtures
//!
//! ```rust
//! use pagenote_testkit::fixtures::TestNetwork;
//!
//! # async fn example() {
//! let net = TestNetwork::new();
//! net.with_empty_index().await;
//! let client = net.client();
//! let records = client.search("https://example.com").await.unwrap();
//! assert!(records.is_empty());
//! # }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use pagenote_testkit::generators::url_variants;
//!
//! proptest! {
//!     #[test]
//!     fn variants_share_an_address((a, b) in url_variants()) {
//!         prop_assert_eq!(pagenote::content_address(&a)?, pagenote::content_address(&b)?);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{RecordingPresenter, RelayScript, TestNetwork};
