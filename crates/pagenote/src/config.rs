//! Client configuration.

use std::str::FromStr;
use std::time::Duration;
use url::Url;

use pagenote_auth::HandshakeConfig;
use pagenote_net::ReaderConfig;

/// Configuration for the [`Client`](crate::Client).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Relay used for the authorization handshake.
    ///
    /// Env: `PAGENOTE_RELAY_URL`
    pub relay_url: String,

    /// Central index. `None` reads from peers only.
    ///
    /// Env: `PAGENOTE_INDEX_URL`
    pub index_url: Option<Url>,

    /// Directory under each identity root that holds records.
    ///
    /// Env: `PAGENOTE_NAMESPACE`
    pub namespace: String,

    /// Name the relay shows when asking for approval.
    ///
    /// Env: `PAGENOTE_APP_NAME`
    pub app_name: String,

    pub capabilities: Vec<String>,

    /// Env: `PAGENOTE_CACHE_TTL_SECS`
    pub cache_ttl: Duration,

    /// Env: `PAGENOTE_AUTH_DEADLINE_SECS`
    pub auth_deadline: Duration,

    /// Env: `PAGENOTE_POLL_INTERVAL_MS`
    pub poll_interval: Duration,

    /// Per-request timeout for the HTTP transport.
    ///
    /// Env: `PAGENOTE_HTTP_TIMEOUT_SECS`
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let handshake = HandshakeConfig::default();
        let reader = ReaderConfig::default();
        Self {
            relay_url: handshake.relay_url,
            index_url: reader.index_url,
            namespace: reader.namespace,
            app_name: handshake.app,
            capabilities: handshake.capabilities,
            cache_ttl: crate::cache::DEFAULT_TTL,
            auth_deadline: handshake.deadline,
            poll_interval: handshake.poll_interval,
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source.
    ///
    /// Values that fail to parse log a warning and keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(relay) = lookup("PAGENOTE_RELAY_URL") {
            config.relay_url = relay;
        }

        if let Some(index) = lookup("PAGENOTE_INDEX_URL") {
            if index.trim().is_empty() {
                config.index_url = None;
            } else if let Some(url) = parsed::<Url>("PAGENOTE_INDEX_URL", &index) {
                config.index_url = Some(url);
            }
        }

        if let Some(namespace) = lookup("PAGENOTE_NAMESPACE") {
            config.namespace = namespace;
        }

        if let Some(app) = lookup("PAGENOTE_APP_NAME") {
            config.app_name = app;
        }

        if let Some(secs) = lookup("PAGENOTE_CACHE_TTL_SECS")
            .and_then(|v| parsed::<u64>("PAGENOTE_CACHE_TTL_SECS", &v))
        {
            config.cache_ttl = Duration::from_secs(secs);
        }

        if let Some(secs) = lookup("PAGENOTE_AUTH_DEADLINE_SECS")
            .and_then(|v| parsed::<u64>("PAGENOTE_AUTH_DEADLINE_SECS", &v))
        {
            config.auth_deadline = Duration::from_secs(secs);
        }

        if let Some(ms) = lookup("PAGENOTE_POLL_INTERVAL_MS")
            .and_then(|v| parsed::<u64>("PAGENOTE_POLL_INTERVAL_MS", &v))
        {
            config.poll_interval = Duration::from_millis(ms);
        }

        if let Some(secs) = lookup("PAGENOTE_HTTP_TIMEOUT_SECS")
            .and_then(|v| parsed::<u64>("PAGENOTE_HTTP_TIMEOUT_SECS", &v))
        {
            config.http_timeout = Duration::from_secs(secs);
        }

        config
    }

    /// Handshake settings derived from this config.
    pub fn handshake(&self) -> HandshakeConfig {
        HandshakeConfig {
            relay_url: self.relay_url.clone(),
            app: self.app_name.clone(),
            capabilities: self.capabilities.clone(),
            poll_interval: self.poll_interval,
            deadline: self.auth_deadline,
        }
    }

    /// Reader settings derived from this config.
    pub fn reader(&self) -> ReaderConfig {
        ReaderConfig {
            namespace: self.namespace.clone(),
            index_url: self.index_url.clone(),
        }
    }
}

fn parsed<T>(name: &str, value: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(variable = name, value = %value, error = %e, "invalid value, using default");
            None
        }
    }
}
