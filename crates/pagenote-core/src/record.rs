//! Record: a user-authored note about a URL.
//!
//! Persisted shape (JSON):
//!
//! ```json
//! {"kind": "link", "content": "https://example.com", "tags": ["rust"], "note": "", "created_at": 1736870400000}
//! ```
//!
//! `author` is filled in by readers and is never part of the stored object.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::address::ContentAddress;
use crate::canonical::CanonicalUrl;

/// Discriminator for record payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// A post about a web page.
    Link,
    /// Any kind this client does not understand.
    #[serde(other)]
    Unknown,
}

/// A record about a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub kind: RecordKind,
    pub content: CanonicalUrl,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub note: String,
    /// Unix milliseconds. Zero or negative means unknown.
    #[serde(default)]
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl Record {
    /// Build a link record with normalized tags.
    pub fn link<I, S>(content: CanonicalUrl, tags: I, note: impl Into<String>, created_at: i64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            kind: RecordKind::Link,
            content,
            tags: normalize_tags(tags),
            note: note.into(),
            created_at,
            author: None,
        }
    }

    /// Tag this record with the identity that published it.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Content address of the record's URL.
    pub fn address(&self) -> ContentAddress {
        ContentAddress::of(&self.content)
    }

    /// Creation time, if known.
    pub fn timestamp(&self) -> Option<i64> {
        (self.created_at > 0).then_some(self.created_at)
    }
}

/// Trim, drop empties, and dedupe while keeping first-seen order.
fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

/// Sort newest first. Records without a timestamp go last.
///
/// The sort is stable, so ties keep their incoming order.
pub fn sort_newest_first(records: &mut [Record]) {
    records.sort_by(|a, b| match (a.timestamp(), b.timestamp()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
