//! [`Transport`] over reqwest.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::{NetError, Result};
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};

/// HTTP transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a client with a per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pagenote/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NetError::Transport(e.to_string()))?;
        Ok(Self::with_client(client))
    }

    /// Wrap an existing client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::debug!(url = %request.url, error = %e, "request failed");
            NetError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| NetError::Transport(e.to_string()))?;

        tracing::trace!(url = %request.url, status, len = body.len(), "response");
        Ok(HttpResponse { status, body })
    }
}
