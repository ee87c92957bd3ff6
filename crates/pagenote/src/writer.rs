//! Publishes records to the signed-in identity's personal store.

use std::sync::Arc;
use url::Url;

use pagenote_core::{Identity, Record, Session};
use pagenote_net::{HttpRequest, Transport};

use crate::error::{ClientError, Result};

/// Writes records to `<root>/<namespace>/<address>.json`.
pub struct StoreWriter<T: Transport + ?Sized> {
    transport: Arc<T>,
    namespace: String,
}

impl<T: Transport + ?Sized> StoreWriter<T> {
    pub fn new(transport: Arc<T>, namespace: impl Into<String>) -> Self {
        Self {
            transport,
            namespace: namespace.into(),
        }
    }

    /// Full-object PUT of `record`. Returns the URL written.
    ///
    /// Rewriting the same record is harmless; the last write wins.
    pub async fn put(
        &self,
        identity: &Identity,
        session: Option<&Session>,
        record: &Record,
    ) -> Result<Url> {
        let url = identity.record_url(&self.namespace, &record.address())?;

        let mut stored = record.clone();
        stored.author = None;

        let mut request = HttpRequest::put_json(url.clone(), &stored)?;
        if let Some(session) = session {
            request = request.with_header("authorization", session.bearer());
        }

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            tracing::warn!(%url, status = response.status, "write rejected");
            return Err(ClientError::WriteRejected {
                status: response.status,
            });
        }

        tracing::debug!(%url, "record written");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagenote_core::canonicalize;
    use pagenote_net::{HttpResponse, MemoryNetwork, NetError};
    use std::sync::Mutex;

    fn alice() -> Identity {
        Identity::parse("alice", "https://alice.example/").unwrap()
    }

    #[tokio::test]
    async fn test_put_stores_persisted_shape() {
        let network = MemoryNetwork::new();
        let writer = StoreWriter::new(Arc::new(network.transport()), "pagenote");
        let record = Record::link(canonicalize("https://example.com").unwrap(), ["a"], "n", 42)
            .with_author("alice");

        let url = writer
            .put(&alice(), Some(&Session::new("tok")), &record)
            .await
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://alice.example/pagenote/100680ad546ce6a577f42f52df33b4cfdca756859e664b8d7de329b150d09ce9.json"
        );

        let body = network.object(&url).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "kind": "link",
                "content": "https://example.com",
                "tags": ["a"],
                "note": "n",
                "created_at": 42
            })
        );
    }

    #[tokio::test]
    async fn test_put_attaches_bearer() {
        let network = MemoryNetwork::new();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        network
            .route("https://alice.example/", move |request| {
                *sink.lock().unwrap() = request.header("authorization").map(str::to_string);
                HttpResponse::empty(201)
            })
            .await;

        let writer = StoreWriter::new(Arc::new(network.transport()), "pagenote");
        let record = Record::link(canonicalize("https://example.com").unwrap(), ["a"], "", 1);
        writer
            .put(&alice(), Some(&Session::new("tok")), &record)
            .await
            .unwrap();

        assert_eq!(seen.lock().unwrap().as_deref(), Some("Bearer tok"));
    }

    #[tokio::test]
    async fn test_put_rejected_and_unreachable() {
        let network = MemoryNetwork::new();
        network
            .route("https://alice.example/", |_| HttpResponse::empty(403))
            .await;
        let writer = StoreWriter::new(Arc::new(network.transport()), "pagenote");
        let record = Record::link(canonicalize("https://example.com").unwrap(), ["a"], "", 1);

        assert!(matches!(
            writer.put(&alice(), None, &record).await,
            Err(ClientError::WriteRejected { status: 403 })
        ));

        network.set_unreachable("https://alice.example/", true).await;
        assert!(matches!(
            writer.put(&alice(), None, &record).await,
            Err(ClientError::Transport(NetError::Transport(_)))
        ));
    }
}
