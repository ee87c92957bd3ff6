//! Direct reads from peers' personal stores.

use futures::future::join_all;
use std::sync::Arc;

use pagenote_core::{ContentAddress, Identity, Record};

use crate::error::Result;
use crate::transport::{HttpRequest, Transport};

/// Reads records from `<root>/<namespace>/<address>.json`.
pub struct PeerReader<T: Transport + ?Sized> {
    transport: Arc<T>,
    namespace: String,
}

impl<T: Transport + ?Sized> PeerReader<T> {
    pub fn new(transport: Arc<T>, namespace: impl Into<String>) -> Self {
        Self {
            transport,
            namespace: namespace.into(),
        }
    }

    /// Fetch one peer's record for `address`.
    ///
    /// `Ok(None)` when the peer has no such record (any non-2xx status).
    /// `Err` when the peer could not be reached or returned garbage. The
    /// returned record carries the peer's id as its author.
    pub async fn fetch(&self, peer: &Identity, address: &ContentAddress) -> Result<Option<Record>> {
        let url = peer.record_url(&self.namespace, address)?;
        let response = self.transport.send(HttpRequest::get(url)).await?;

        if !response.is_success() {
            tracing::trace!(peer = %peer, status = response.status, "no record");
            return Ok(None);
        }

        let record: Record = response.json()?;
        Ok(Some(record.with_author(peer.id.clone())))
    }

    /// Fetch from every peer concurrently and wait for all of them to settle.
    ///
    /// Results come back in peer order.
    pub async fn fetch_all<'a>(
        &self,
        peers: &'a [Identity],
        address: &ContentAddress,
    ) -> Vec<(&'a Identity, Result<Option<Record>>)> {
        join_all(
            peers
                .iter()
                .map(|peer| async move { (peer, self.fetch(peer, address).await) }),
        )
        .await
    }
}
