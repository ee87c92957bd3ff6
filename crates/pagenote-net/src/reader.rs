//! Distributed reader: central index first, direct peer reads as fallback.

use std::sync::Arc;
use url::Url;

use pagenote_core::{sort_newest_first, CanonicalUrl, ContentAddress, Identity, PrivacyTag, Record};

use crate::index::IndexClient;
use crate::peers::PeerReader;
use crate::transport::Transport;

/// Where the reader looks.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Directory under each identity root that holds records.
    pub namespace: String,
    /// Central index base URL. `None` skips straight to peers.
    pub index_url: Option<Url>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            namespace: "pagenote".into(),
            index_url: None,
        }
    }
}

/// What went wrong while resolving, short of an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Degradation {
    /// The index was queried and failed (transport, status or parse).
    pub index_failed: bool,
    /// Ids of peers that failed, as opposed to having no record.
    pub failed_peers: Vec<String>,
}

impl Degradation {
    pub fn is_degraded(&self) -> bool {
        self.index_failed || !self.failed_peers.is_empty()
    }
}

/// Which source produced the records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Source {
    #[default]
    Nothing,
    Index,
    Peers,
    /// Served from a result cache without touching the network.
    Cache,
}

/// Result of one resolution.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    /// Newest first.
    pub records: Vec<Record>,
    pub source: Source,
    pub degraded: Degradation,
}

/// Resolves records about a URL.
pub struct Reader<T: Transport + ?Sized> {
    index: Option<IndexClient<T>>,
    peers: PeerReader<T>,
}

impl<T: Transport + ?Sized> Reader<T> {
    pub fn new(transport: Arc<T>, config: ReaderConfig) -> Self {
        let index = config
            .index_url
            .map(|base| IndexClient::new(Arc::clone(&transport), base));
        Self {
            index,
            peers: PeerReader::new(transport, config.namespace),
        }
    }

    /// Resolve `url` against the index, then against `peers` if the index
    /// had nothing. Never fails.
    pub async fn resolve(&self, url: &CanonicalUrl, peers: &[Identity]) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();

        if let Some(index) = &self.index {
            let tag = PrivacyTag::for_url(url);
            match index.query(&tag, peers).await {
                Ok(records) => {
                    outcome.records = records
                        .into_iter()
                        .filter(|r| &r.content == url)
                        .collect();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "index query failed");
                    outcome.degraded.index_failed = true;
                }
            }
        }

        if !outcome.records.is_empty() {
            outcome.source = Source::Index;
        } else if !peers.is_empty() {
            let address = ContentAddress::of(url);
            tracing::debug!(peers = peers.len(), %address, "falling back to peer reads");

            for (peer, result) in self.peers.fetch_all(peers, &address).await {
                match result {
                    Ok(Some(record)) if &record.content == url => outcome.records.push(record),
                    Ok(Some(_)) => {
                        tracing::debug!(peer = %peer, "peer record is for a different URL");
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::debug!(peer = %peer, error = %e, "peer read failed");
                        outcome.degraded.failed_peers.push(peer.id.clone());
                    }
                }
            }

            if !outcome.records.is_empty() {
                outcome.source = Source::Peers;
            }
        }

        sort_newest_first(&mut outcome.records);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::memory::MemoryNetwork;
    use crate::transport::HttpResponse;
    use pagenote_core::canonicalize;

    const INDEX: &str = "https://index.example/";

    fn peer(name: &str) -> Identity {
        Identity::parse(name, &format!("https://{name}.example/")).unwrap()
    }

    fn reader(network: &Arc<MemoryNetwork>, with_index: bool) -> Reader<crate::MemoryTransport> {
        Reader::new(
            Arc::new(network.transport()),
            ReaderConfig {
                namespace: "pagenote".into(),
                index_url: with_index.then(|| Url::parse(INDEX).unwrap()),
            },
        )
    }

    async fn store(network: &MemoryNetwork, who: &Identity, record: &Record) {
        network
            .put_object(
                &who.record_url("pagenote", &record.address()).unwrap(),
                serde_json::to_vec(record).unwrap(),
            )
            .await;
    }

    #[tokio::test]
    async fn test_index_hit_skips_peers() {
        let network = MemoryNetwork::new();
        network
            .route(INDEX, |_| {
                HttpResponse::json_body(
                    200,
                    &serde_json::json!([
                        {"kind": "link", "content": "https://example.com", "created_at": 1, "author": "a"},
                        {"kind": "link", "content": "https://example.com", "created_at": 2, "author": "b"},
                        {"kind": "link", "content": "https://other.example", "created_at": 3}
                    ]),
                )
            })
            .await;

        let url = canonicalize("https://example.com").unwrap();
        let outcome = reader(&network, true).resolve(&url, &[peer("a")]).await;

        assert_eq!(outcome.source, Source::Index);
        let authors: Vec<_> = outcome.records.iter().map(|r| r.author.as_deref()).collect();
        assert_eq!(authors, vec![Some("b"), Some("a")]);
        assert_eq!(network.request_count("https://a.example/").await, 0);
    }

    #[tokio::test]
    async fn test_fallback_queries_every_peer() {
        let network = MemoryNetwork::new();
        network
            .route(INDEX, |_| HttpResponse::json_body(200, &serde_json::json!({"items": []})))
            .await;

        let url = canonicalize("https://example.com").unwrap();
        let (a, b, c) = (peer("a"), peer("b"), peer("c"));
        store(&network, &b, &Record::link(url.clone(), ["x"], "only b", 10)).await;

        let outcome = reader(&network, true)
            .resolve(&url, &[a.clone(), b.clone(), c.clone()])
            .await;

        assert_eq!(outcome.source, Source::Peers);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].author.as_deref(), Some("b"));
        assert!(!outcome.degraded.is_degraded());
        for name in ["a", "b", "c"] {
            let prefix = format!("https://{name}.example/");
            assert_eq!(network.request_count(&prefix).await, 1);
        }
    }

    #[tokio::test]
    async fn test_unreachable_index_and_peers_degrade() {
        let network = MemoryNetwork::new();
        network.set_unreachable(INDEX, true).await;
        network.set_unreachable("https://a.example/", true).await;

        let url = canonicalize("https://example.com/page").unwrap();
        let b = peer("b");
        store(&network, &b, &Record::link(url.clone(), ["x"], "", 0)).await;

        let outcome = reader(&network, true).resolve(&url, &[peer("a"), b]).await;

        assert_eq!(outcome.records.len(), 1);
        assert!(outcome.degraded.index_failed);
        assert_eq!(outcome.degraded.failed_peers, vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_no_index_no_peers_is_empty() {
        let network = MemoryNetwork::new();
        let url = canonicalize("https://example.com").unwrap();
        let outcome = reader(&network, false).resolve(&url, &[]).await;

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.source, Source::Nothing);
        assert!(network.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_peer_record_for_other_url_ignored() {
        let network = MemoryNetwork::new();
        let url = canonicalize("https://example.com").unwrap();
        let a = peer("a");

        let other = Record::link(canonicalize("https://other.example").unwrap(), ["x"], "", 1);
        network
            .put_object(
                &a.record_url("pagenote", &ContentAddress::of(&url)).unwrap(),
                serde_json::to_vec(&other).unwrap(),
            )
            .await;

        let outcome = reader(&network, false).resolve(&url, &[a]).await;
        assert!(outcome.records.is_empty());
    }

    #[tokio::test]
    async fn test_peers_sorted_newest_first() {
        let network = MemoryNetwork::new();
        let url = canonicalize("https://example.com").unwrap();
        let peers = vec![peer("a"), peer("b"), peer("c")];
        store(&network, &peers[0], &Record::link(url.clone(), ["x"], "", 0)).await;
        store(&network, &peers[1], &Record::link(url.clone(), ["x"], "", 5)).await;
        store(&network, &peers[2], &Record::link(url.clone(), ["x"], "", 9)).await;

        let outcome = reader(&network, false).resolve(&url, &peers).await;
        let authors: Vec<_> = outcome.records.iter().map(|r| r.author.as_deref()).collect();
        assert_eq!(authors, vec![Some("c"), Some("b"), Some("a")]);
    }
}
