//! Test fixtures and helpers.
//!
//! One [`MemoryNetwork`] plays every remote party: the relay, the central
//! index and each identity's personal store.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

use pagenote::{ApprovalPresenter, Client, ClientConfig};
use pagenote_core::{Identity, Record};
use pagenote_net::{HttpResponse, MemoryNetwork, MemoryTransport};
use pagenote_store::{KvStore, MemoryStore};

/// Relay base URL used by fixtures.
pub const RELAY: &str = "https://relay.test";

/// Central index base URL used by fixtures.
pub const INDEX: &str = "https://index.test/";

/// Namespace records are written under.
pub const NAMESPACE: &str = "pagenote";

/// How the scripted relay answers status polls.
#[derive(Debug, Clone)]
pub enum RelayScript {
    /// `pending` for `after_polls` polls, then approved.
    Approve {
        after_polls: usize,
        session: String,
        identity: Identity,
    },
    Deny,
    Expire,
    /// `pending` forever.
    Pending,
    /// Refuse to create requests.
    Unavailable,
}

/// The in-memory world a test runs against.
pub struct TestNetwork {
    pub network: Arc<MemoryNetwork>,
}

impl Default for TestNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl TestNetwork {
    pub fn new() -> Self {
        Self {
            network: MemoryNetwork::new(),
        }
    }

    /// An identity whose store lives at `https://<name>.pods.test/`.
    pub fn identity(name: &str) -> Identity {
        let root = format!("https://{name}.pods.test/");
        Identity::parse(format!("did:test:{name}"), &root).expect("fixture identity root is valid")
    }

    /// Store root prefix of an identity, for request counting.
    pub fn store_prefix(identity: &Identity) -> String {
        identity.root.to_string()
    }

    /// Client config pointing at this network's relay and index.
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            relay_url: RELAY.into(),
            index_url: Some(Url::parse(INDEX).expect("fixture index URL is valid")),
            namespace: NAMESPACE.into(),
            poll_interval: Duration::from_secs(1),
            auth_deadline: Duration::from_secs(180),
            ..ClientConfig::default()
        }
    }

    /// A client with a fresh in-memory key-value store.
    pub fn client(&self) -> Client<MemoryTransport, MemoryStore> {
        self.client_with_store(Arc::new(MemoryStore::new()))
    }

    /// A client over a caller-provided store.
    pub fn client_with_store<S: KvStore + ?Sized>(&self, store: Arc<S>) -> Client<MemoryTransport, S> {
        Client::new(Arc::new(self.network.transport()), store, self.config())
    }

    /// Serve `records` from the index for every query.
    pub async fn with_index(&self, records: Vec<Record>) {
        let body = serde_json::to_value(&records).expect("records serialize");
        self.network
            .route(INDEX, move |_| HttpResponse::json_body(200, &body))
            .await;
    }

    /// An index that knows nothing.
    pub async fn with_empty_index(&self) {
        self.with_index(Vec::new()).await;
    }

    /// An index that cannot be reached.
    pub async fn with_index_down(&self) {
        self.network.set_unreachable(INDEX, true).await;
    }

    /// Place `record` in `identity`'s store, as if they had published it.
    pub async fn store_record(&self, identity: &Identity, record: &Record) {
        let url = identity
            .record_url(NAMESPACE, &record.address())
            .expect("fixture record URL is valid");
        let body = serde_json::to_vec(record).expect("record serializes");
        self.network.put_object(&url, body).await;
    }

    /// Take an identity's store offline.
    pub async fn take_offline(&self, identity: &Identity) {
        self.network
            .set_unreachable(Self::store_prefix(identity), true)
            .await;
    }

    /// Install the scripted relay.
    pub async fn with_relay(&self, script: RelayScript) {
        let status_url = format!("{RELAY}/status/req-1");

        if matches!(script, RelayScript::Unavailable) {
            self.network
                .route(format!("{RELAY}/requests"), |_| HttpResponse::empty(503))
                .await;
            return;
        }

        let created = serde_json::json!({
            "id": "req-1",
            "approvalUrl": format!("{RELAY}/approve/req-1"),
            "statusUrl": status_url.clone(),
        });
        self.network
            .route(format!("{RELAY}/requests"), move |_| {
                HttpResponse::json_body(201, &created)
            })
            .await;

        let polls = AtomicUsize::new(0);
        self.network
            .route(status_url, move |_| {
                let n = polls.fetch_add(1, Ordering::SeqCst);
                let body = match &script {
                    RelayScript::Approve {
                        after_polls,
                        session,
                        identity,
                    } if n >= *after_polls => serde_json::json!({
                        "status": "approved",
                        "session": session,
                        "identity": identity,
                    }),
                    RelayScript::Deny => serde_json::json!({"status": "denied"}),
                    RelayScript::Expire => serde_json::json!({"status": "expired"}),
                    _ => serde_json::json!({"status": "pending"}),
                };
                HttpResponse::json_body(200, &body)
            })
            .await;
    }

    /// Requests sent to URLs under `prefix`.
    pub async fn request_count(&self, prefix: &str) -> usize {
        self.network.request_count(prefix).await
    }
}

/// Presenter that remembers every approval URL it was shown.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    urls: Mutex<Vec<Url>>,
}

impl RecordingPresenter {
    pub fn urls(&self) -> Vec<Url> {
        self.urls.lock().map(|urls| urls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ApprovalPresenter for RecordingPresenter {
    async fn present(&self, approval_url: &Url) {
        if let Ok(mut urls) = self.urls.lock() {
            urls.push(approval_url.clone());
        }
    }
}
