//! Short-lived memoization of read results.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;
use tokio::time::Instant;

use pagenote_core::{CanonicalUrl, Record};

/// Default lifetime of a cache entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// TTLs beyond this are treated as "never expires".
const MAX_TTL: Duration = Duration::from_secs(86_400 * 365 * 30);

#[derive(Debug)]
struct CacheEntry {
    items: Vec<Record>,
    expires_at: Instant,
}

/// Results keyed by canonical URL, each valid for one TTL after insertion.
///
/// An absent entry (`None`) is different from a cached empty result
/// (`Some(vec![])`).
#[derive(Debug)]
pub struct ResultCache {
    ttl: Duration,
    entries: RwLock<HashMap<CanonicalUrl, CacheEntry>>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResultCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// A copy of the cached items, unless absent or expired.
    pub fn get(&self, url: &CanonicalUrl) -> Option<Vec<Record>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries
            .get(url)
            .filter(|entry| Instant::now() < entry.expires_at)
            .map(|entry| entry.items.clone())
    }

    /// Insert or overwrite with a fresh window.
    pub fn put(&self, url: CanonicalUrl, items: Vec<Record>) {
        let now = Instant::now();
        let entry = CacheEntry {
            items,
            expires_at: now.checked_add(self.ttl.min(MAX_TTL)).unwrap_or(now),
        };
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(url, entry);
    }

    /// Drop the entry for `url`. Returns whether one was present.
    pub fn invalidate(&self, url: &CanonicalUrl) -> bool {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(url)
            .is_some()
    }

    /// Drop every expired entry. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let before = entries.len();
        entries.retain(|_, entry| now < entry.expires_at);
        before - entries.len()
    }

    /// Entries held, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
