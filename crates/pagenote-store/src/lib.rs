//! # pagenote Store
//!
//! Local persistence for pagenote. Everything the client keeps on the device
//! (the session, the resolved identity, private bookmarks) goes through the
//! [`KvStore`] trait, so the client is storage-agnostic.
//!
//! ## Key Types
//!
//! - [`KvStore`] - The async key-value trait
//! - [`SqliteStore`] - SQLite-backed persistent store
//! - [`MemoryStore`] - In-memory store for tests
//! - [`BookmarkStore`] - Private bookmarks keyed by content address
//! - [`SessionStore`] - The persisted session and identity
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pagenote_core::canonicalize;
//! use pagenote_store::{BookmarkStore, SqliteStore};
//!
//! async fn example() {
//!     let store = Arc::new(SqliteStore::open("pagenote.db").unwrap());
//!     let bookmarks = BookmarkStore::new(store);
//!
//!     let url = canonicalize("https://example.com/article").unwrap();
//!     bookmarks.set(&url, vec!["later".into()], "read this").await.unwrap();
//!     assert!(bookmarks.get(&url).await.unwrap().is_some());
//! }
//! ```

pub mod bookmarks;
pub mod error;
pub mod memory;
pub mod migration;
pub mod session;
pub mod sqlite;
pub mod traits;

pub use bookmarks::{Bookmark, BookmarkStore};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use session::{SessionStore, StoredSession};
pub use sqlite::SqliteStore;
pub use traits::{KvStore, KvStoreExt};
