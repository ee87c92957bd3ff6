//! Central index client.
//!
//! The index is queried by [`PrivacyTag`] only, so it never learns the URL.
//!
//! ```text
//! GET <index>/records?tag=<tag>&authors=<id>,<id>
//! ```
//!
//! The body is either a bare array of records or an object with an `items`
//! array. Anything else counts as zero results.

use std::sync::Arc;
use url::Url;

use pagenote_core::{Identity, PrivacyTag, Record};

use crate::error::{NetError, Result};
use crate::transport::{HttpRequest, Transport};

/// Queries the central index.
pub struct IndexClient<T: Transport + ?Sized> {
    transport: Arc<T>,
    base: Url,
}

impl<T: Transport + ?Sized> IndexClient<T> {
    pub fn new(transport: Arc<T>, base: Url) -> Self {
        Self { transport, base }
    }

    /// Build the query URL for a tag, optionally restricted to authors.
    pub fn query_url(&self, tag: &PrivacyTag, authors: &[Identity]) -> Result<Url> {
        let endpoint = format!("{}/records", self.base.as_str().trim_end_matches('/'));
        let mut url = Url::parse(&endpoint).map_err(|e| NetError::InvalidUrl(e.to_string()))?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("tag", tag.as_str());
            if !authors.is_empty() {
                let ids: Vec<&str> = authors.iter().map(|a| a.id.as_str()).collect();
                query.append_pair("authors", &ids.join(","));
            }
        }

        Ok(url)
    }

    /// Fetch the records the index holds for `tag`.
    pub async fn query(&self, tag: &PrivacyTag, authors: &[Identity]) -> Result<Vec<Record>> {
        let url = self.query_url(tag, authors)?;
        let response = self.transport.send(HttpRequest::get(url.clone())).await?;

        if !response.is_success() {
            return Err(NetError::Status {
                status: response.status,
                url: url.into(),
            });
        }

        parse_index_body(&response.body)
    }
}

/// Parse an index response body.
///
/// Items that are not valid records are skipped.
pub fn parse_index_body(body: &[u8]) -> Result<Vec<Record>> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| NetError::Decode(e.to_string()))?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("items") {
            Some(serde_json::Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    let total = items.len();
    let records: Vec<Record> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if records.len() < total {
        tracing::debug!(skipped = total - records.len(), "ignored malformed index items");
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::MemoryNetwork;
    use crate::transport::HttpResponse;
    use pagenote_core::canonicalize;

    #[test]
    fn test_parse_bare_array() {
        let records = parse_index_body(
            br#"[{"kind":"link","content":"https://example.com","created_at":5,"author":"a"}]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].author.as_deref(), Some("a"));
    }

    #[test]
    fn test_parse_items_object() {
        let records = parse_index_body(
            br#"{"items":[{"kind":"link","content":"https://example.com"},{"bogus":true}]}"#,
        )
        .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_missing_items_is_empty() {
        assert!(parse_index_body(br#"{"total":0}"#).unwrap().is_empty());
        assert!(parse_index_body(br#"{"items":null}"#).unwrap().is_empty());
        assert!(parse_index_body(b"42").unwrap().is_empty());
    }

    #[test]
    fn test_parse_not_json_fails() {
        assert!(matches!(
            parse_index_body(b"<html>"),
            Err(NetError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_query_url_shape() {
        let network = MemoryNetwork::new();
        let index = IndexClient::new(
            Arc::new(network.transport()),
            Url::parse("https://index.example/api/").unwrap(),
        );
        let tag = PrivacyTag::derive("x");
        let alice = Identity::parse("alice", "https://alice.example/").unwrap();
        let bob = Identity::parse("bob", "https://bob.example/").unwrap();

        let url = index.query_url(&tag, &[alice, bob]).unwrap();
        assert_eq!(url.path(), "/api/records");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("tag".to_string(), tag.as_str().to_string()));
        assert_eq!(pairs[1], ("authors".to_string(), "alice,bob".to_string()));

        let url = index.query_url(&tag, &[]).unwrap();
        assert_eq!(url.query_pairs().count(), 1);
    }

    #[tokio::test]
    async fn test_query_status_error() {
        let network = MemoryNetwork::new();
        network
            .route("https://index.example/", |_| HttpResponse::empty(503))
            .await;
        let index = IndexClient::new(
            Arc::new(network.transport()),
            Url::parse("https://index.example").unwrap(),
        );

        let content = canonicalize("https://example.com").unwrap();
        let result = index.query(&PrivacyTag::for_url(&content), &[]).await;
        assert!(matches!(result, Err(NetError::Status { status: 503, .. })));
    }
}
