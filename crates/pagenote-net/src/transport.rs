//! Transport abstraction for HTTP exchanges.
//!
//! Every remote the client talks to (relay, index, personal stores) is
//! reached through one [`Transport::send`]. Implementations may use a real
//! HTTP client or an in-process fake.

use async_trait::async_trait;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::error::{NetError, Result};

/// HTTP methods the client needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
}

/// An outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl HttpRequest {
    fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Vec::new(),
            body: None,
        }
    }

    /// A bodiless GET.
    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url).with_header("accept", "application/json")
    }

    /// A PUT with a JSON body.
    pub fn put_json<T: Serialize>(url: Url, body: &T) -> Result<Self> {
        Self::new(Method::Put, url).with_json(body)
    }

    /// A POST with a JSON body.
    pub fn post_json<T: Serialize>(url: Url, body: &T) -> Result<Self> {
        Self::new(Method::Post, url).with_json(body)
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn with_json<T: Serialize>(self, body: &T) -> Result<Self> {
        let encoded = serde_json::to_vec(body).map_err(|e| NetError::Encode(e.to_string()))?;
        let mut request = self.with_header("content-type", "application/json");
        request.body = Some(Bytes::from(encoded));
        Ok(request)
    }

    /// First value of a header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response: status and raw body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A response carrying a JSON value.
    pub fn json_body(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// An empty response with the given status.
    pub fn empty(status: u16) -> Self {
        Self::new(status, Bytes::new())
    }

    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| NetError::Decode(e.to_string()))
    }
}

/// Transport trait for sending requests.
///
/// Implementations must be thread-safe (Send + Sync). A returned `Err`
/// means no response arrived; any status, including 4xx and 5xx, is `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// An in-memory network for testing.
///
/// Acts as every server at once: a plain object store keyed by URL (PUT
/// stores, GET reads), plus scripted handlers mounted on URL prefixes.
/// Prefixes can be marked unreachable to simulate offline hosts.
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// A scripted handler for requests under a prefix.
    pub type Handler = Arc<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

    /// Shared state for the memory network.
    #[derive(Default)]
    pub struct MemoryNetwork {
        objects: RwLock<HashMap<String, Bytes>>,
        routes: RwLock<Vec<(String, Handler)>>,
        unreachable: RwLock<Vec<String>>,
        log: RwLock<Vec<(Method, Url)>>,
    }

    impl MemoryNetwork {
        /// Create a new memory network.
        pub fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        /// Create a transport connected to this network.
        pub fn transport(self: &Arc<Self>) -> MemoryTransport {
            MemoryTransport {
                network: Arc::clone(self),
            }
        }

        /// Mount a handler. The longest matching prefix wins.
        pub async fn route<F>(&self, prefix: impl Into<String>, handler: F)
        where
            F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
        {
            let prefix = prefix.into();
            let mut routes = self.routes.write().await;
            routes.retain(|(p, _)| p != &prefix);
            routes.push((prefix, Arc::new(handler)));
        }

        /// Place an object directly, bypassing any handler.
        pub async fn put_object(&self, url: &Url, body: impl Into<Bytes>) {
            self.objects.write().await.insert(object_key(url), body.into());
        }

        /// Read an object directly.
        pub async fn object(&self, url: &Url) -> Option<Bytes> {
            self.objects.read().await.get(&object_key(url)).cloned()
        }

        /// Make every URL under `prefix` fail at the transport level.
        pub async fn set_unreachable(&self, prefix: impl Into<String>, unreachable: bool) {
            let prefix = prefix.into();
            let mut offline = self.unreachable.write().await;
            offline.retain(|p| p != &prefix);
            if unreachable {
                offline.push(prefix);
            }
        }

        /// Every request sent so far, in order.
        pub async fn requests(&self) -> Vec<(Method, Url)> {
            self.log.read().await.clone()
        }

        /// Number of requests sent to URLs under `prefix`.
        pub async fn request_count(&self, prefix: &str) -> usize {
            self.log
                .read()
                .await
                .iter()
                .filter(|(_, url)| url.as_str().starts_with(prefix))
                .count()
        }

        async fn handle(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.log
                .write()
                .await
                .push((request.method, request.url.clone()));

            let url = request.url.as_str();
            if self
                .unreachable
                .read()
                .await
                .iter()
                .any(|p| url.starts_with(p.as_str()))
            {
                return Err(NetError::Transport(format!("host unreachable: {url}")));
            }

            let handler = self
                .routes
                .read()
                .await
                .iter()
                .filter(|(p, _)| url.starts_with(p.as_str()))
                .max_by_key(|(p, _)| p.len())
                .map(|(_, h)| Arc::clone(h));

            if let Some(handler) = handler {
                return Ok(handler(&request));
            }

            let key = object_key(&request.url);
            match request.method {
                Method::Get => Ok(match self.objects.read().await.get(&key) {
                    Some(body) => HttpResponse::new(200, body.clone()),
                    None => HttpResponse::empty(404),
                }),
                Method::Put => {
                    let body = request.body.unwrap_or_default();
                    let existed = self.objects.write().await.insert(key, body).is_some();
                    Ok(HttpResponse::empty(if existed { 200 } else { 201 }))
                }
                Method::Post => Ok(HttpResponse::empty(405)),
            }
        }
    }

    /// Objects are keyed without query or fragment.
    fn object_key(url: &Url) -> String {
        let mut url = url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.into()
    }

    /// In-memory transport implementation.
    #[derive(Clone)]
    pub struct MemoryTransport {
        network: Arc<MemoryNetwork>,
    }

    impl MemoryTransport {
        pub fn network(&self) -> &Arc<MemoryNetwork> {
            &self.network
        }
    }

    #[async_trait]
    impl Transport for MemoryTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
            self.network.handle(request).await
        }
    }
}
