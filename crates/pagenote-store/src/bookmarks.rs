//! Local bookmarks.
//!
//! A bookmark is a private, device-local note that the user saved a URL.
//! It never leaves the device and is independent of published records.
//! Bookmarks are keyed by the content address of the canonical URL, so the
//! store never holds the URL itself as a key.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use pagenote_core::{now_millis, CanonicalUrl, ContentAddress};

use crate::error::Result;
use crate::traits::{KvStore, KvStoreExt};

/// Key prefix for bookmark entries.
pub const BOOKMARK_PREFIX: &str = "bookmark:";

/// A saved bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub saved: bool,
    /// When it was saved (Unix ms).
    pub at: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub note: String,
}

/// Bookmark operations over any [`KvStore`].
pub struct BookmarkStore<S: KvStore + ?Sized> {
    store: Arc<S>,
}

impl<S: KvStore + ?Sized> BookmarkStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn key(address: &ContentAddress) -> String {
        format!("{BOOKMARK_PREFIX}{}", address.to_hex())
    }

    /// Get the bookmark for a URL, if saved.
    pub async fn get(&self, url: &CanonicalUrl) -> Result<Option<Bookmark>> {
        self.store.get_json(&Self::key(&ContentAddress::of(url))).await
    }

    /// Save (or overwrite) the bookmark for a URL.
    pub async fn set(&self, url: &CanonicalUrl, tags: Vec<String>, note: &str) -> Result<Bookmark> {
        let bookmark = Bookmark {
            saved: true,
            at: now_millis(),
            tags,
            note: note.to_string(),
        };
        let address = ContentAddress::of(url);
        self.store.set_json(&Self::key(&address), &bookmark).await?;
        tracing::debug!(%address, "bookmark saved");
        Ok(bookmark)
    }

    /// Remove the bookmark for a URL. Returns `true` if one existed.
    pub async fn remove(&self, url: &CanonicalUrl) -> Result<bool> {
        let address = ContentAddress::of(url);
        let removed = self.store.remove(&Self::key(&address)).await?;
        tracing::debug!(%address, removed, "bookmark removed");
        Ok(removed)
    }

    /// All saved bookmarks with their addresses.
    ///
    /// Entries that fail to parse are skipped.
    pub async fn list(&self) -> Result<Vec<(ContentAddress, Bookmark)>> {
        let mut out = Vec::new();
        for key in self.store.keys(BOOKMARK_PREFIX).await? {
            let Ok(address) = ContentAddress::from_hex(&key[BOOKMARK_PREFIX.len()..]) else {
                tracing::warn!(%key, "skipping bookmark with malformed key");
                continue;
            };
            match self.store.get_json::<Bookmark>(&key).await {
                Ok(Some(bookmark)) => out.push((address, bookmark)),
                Ok(None) => {}
                Err(e) => tracing::warn!(%key, error = %e, "skipping unreadable bookmark"),
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use crate::sqlite::SqliteStore;
    use pagenote_core::canonicalize;

    #[tokio::test]
    async fn test_bookmark_lifecycle() {
        let bookmarks = BookmarkStore::new(Arc::new(MemoryStore::new()));
        let url = canonicalize("https://example.com/a").unwrap();

        assert_eq!(bookmarks.get(&url).await.unwrap(), None);

        let saved = bookmarks
            .set(&url, vec!["rust".into()], "later")
            .await
            .unwrap();
        assert!(saved.saved);

        let loaded = bookmarks.get(&url).await.unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.note, "later");

        assert!(bookmarks.remove(&url).await.unwrap());
        assert_eq!(bookmarks.get(&url).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_bookmark_keyed_by_canonical_form() {
        let bookmarks = BookmarkStore::new(Arc::new(MemoryStore::new()));
        let a = canonicalize("https://EXAMPLE.com/x?b=2&a=1#frag").unwrap();
        let b = canonicalize("https://example.com:443/x?a=1&b=2").unwrap();

        bookmarks.set(&a, vec![], "").await.unwrap();
        assert!(bookmarks.get(&b).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_bookmark_key_does_not_contain_url() {
        let store = Arc::new(MemoryStore::new());
        let bookmarks = BookmarkStore::new(Arc::clone(&store));
        let url = canonicalize("https://secret.example/page").unwrap();

        bookmarks.set(&url, vec![], "").await.unwrap();
        let keys = store.keys("").await.unwrap();
        assert_eq!(keys.len(), 1);
        assert!(!keys[0].contains("secret"));
    }

    #[tokio::test]
    async fn test_bookmark_list_sqlite() {
        let bookmarks = BookmarkStore::new(Arc::new(SqliteStore::open_memory().unwrap()));
        for raw in ["https://a.example/", "https://b.example/"] {
            let url = canonicalize(raw).unwrap();
            bookmarks.set(&url, vec![], raw).await.unwrap();
        }

        let listed = bookmarks.list().await.unwrap();
        assert_eq!(listed.len(), 2);

        let a = ContentAddress::of(&canonicalize("https://a.example/").unwrap());
        assert!(listed.iter().any(|(addr, bm)| *addr == a && bm.note == "https://a.example/"));
    }
}
