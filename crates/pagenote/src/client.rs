//! The Client: owned state and the public operations.

use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use pagenote_auth::{ApprovalPresenter, Handshake, HandshakeState};
use pagenote_core::{
    canonicalize, now_millis, CanonicalUrl, ContentAddress, Identity, PrivacyTag, Record, Session,
};
use pagenote_net::{Reader, ReqwestTransport, SearchOutcome, Source, Transport};
use pagenote_store::{Bookmark, BookmarkStore, KvStore, SessionStore, SqliteStore};

use crate::cache::ResultCache;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::writer::StoreWriter;

/// What the user wants to post about a URL.
#[derive(Debug, Clone, Default)]
pub struct PostRequest {
    pub url: String,
    pub tags: Vec<String>,
    pub note: String,
}

impl PostRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// The signed-in identity and its bearer token.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub session: Session,
    pub identity: Identity,
}

/// The pagenote client.
///
/// Owns the result cache, the session, the peer set and its collaborators.
/// Every public operation is a single async flow; dropping its future
/// abandons any requests still in flight.
pub struct Client<T: Transport + ?Sized, S: KvStore + ?Sized> {
    config: ClientConfig,
    cache: ResultCache,
    reader: Reader<T>,
    writer: StoreWriter<T>,
    handshake: Handshake<T>,
    sessions: SessionStore<S>,
    bookmarks: BookmarkStore<S>,
    session: RwLock<Option<SessionState>>,
    /// Held for the whole of a sign-in so concurrent attempts run one at a time.
    sign_in: Mutex<()>,
    peers: RwLock<Vec<Identity>>,
}

impl Client<ReqwestTransport, SqliteStore> {
    /// A client over HTTPS with its state in a SQLite file.
    pub fn open(db_path: impl AsRef<Path>, config: ClientConfig) -> Result<Self> {
        let transport = ReqwestTransport::new(config.http_timeout)?;
        let store = SqliteStore::open(db_path)?;
        Ok(Self::new(Arc::new(transport), Arc::new(store), config))
    }
}

impl<T: Transport + ?Sized, S: KvStore + ?Sized> Client<T, S> {
    /// Create a client. No session is loaded; see [`Client::restore`].
    pub fn new(transport: Arc<T>, store: Arc<S>, config: ClientConfig) -> Self {
        Self {
            cache: ResultCache::new(config.cache_ttl),
            reader: Reader::new(Arc::clone(&transport), config.reader()),
            writer: StoreWriter::new(Arc::clone(&transport), config.namespace.clone()),
            handshake: Handshake::new(transport, config.handshake()),
            sessions: SessionStore::new(Arc::clone(&store)),
            bookmarks: BookmarkStore::new(store),
            session: RwLock::new(None),
            sign_in: Mutex::new(()),
            peers: RwLock::new(Vec::new()),
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Addressing
    // ─────────────────────────────────────────────────────────────────────────

    pub fn canonicalize(&self, url: &str) -> Result<CanonicalUrl> {
        Ok(canonicalize(url)?)
    }

    pub fn content_address(&self, url: &str) -> Result<ContentAddress> {
        crate::content_address(url)
    }

    pub fn privacy_tag(&self, url: &str) -> PrivacyTag {
        crate::privacy_tag(url)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────

    /// Load a persisted session, if any. Returns whether one was found.
    pub async fn restore(&self) -> Result<bool> {
        let Some(stored) = self.sessions.load().await? else {
            return Ok(false);
        };

        tracing::info!(identity = %stored.identity, "session restored");
        *self.session.write().await = Some(SessionState {
            session: stored.session,
            identity: stored.identity,
        });
        Ok(true)
    }

    /// Sign in through the relay.
    ///
    /// Returns `Ok(false)` without contacting the relay when already signed
    /// in, `Ok(true)` once a new session is persisted. Concurrent calls wait
    /// for the attempt in progress and then see its session.
    pub async fn start_authorization(&self, presenter: &dyn ApprovalPresenter) -> Result<bool> {
        let _guard = self.sign_in.lock().await;
        if self.session.read().await.is_some() {
            return Ok(false);
        }

        let approval = self.handshake.run(presenter).await?;
        self.sessions
            .save(&approval.session, &approval.identity)
            .await?;

        *self.session.write().await = Some(SessionState {
            session: approval.session,
            identity: approval.identity,
        });
        Ok(true)
    }

    /// State of the most recent handshake attempt.
    pub fn handshake_state(&self) -> HandshakeState {
        self.handshake.state()
    }

    /// Forget the session, in memory and in the store.
    pub async fn sign_out(&self) -> Result<()> {
        self.session.write().await.take();
        self.sessions.clear().await?;
        Ok(())
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|state| state.identity.clone())
    }

    pub async fn is_signed_in(&self) -> bool {
        self.session.read().await.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Write
    // ─────────────────────────────────────────────────────────────────────────

    /// Publish a record to the signed-in identity's store.
    ///
    /// The cache entry for the URL is dropped on success. A 401 or 403 from
    /// the store means the session is no longer valid, so it is cleared.
    pub async fn publish(&self, post: PostRequest) -> Result<Record> {
        let content = canonicalize(&post.url)?;
        let state = self
            .session
            .read()
            .await
            .clone()
            .ok_or(ClientError::IdentityRequired)?;

        let record = Record::link(content, post.tags, post.note, now_millis());

        match self
            .writer
            .put(&state.identity, Some(&state.session), &record)
            .await
        {
            Ok(_) => {}
            Err(ClientError::WriteRejected { status }) if status == 401 || status == 403 => {
                tracing::warn!(identity = %state.identity, status, "session rejected, signing out");
                if let Err(e) = self.sign_out().await {
                    tracing::warn!(error = %e, "failed to clear session");
                }
                return Err(ClientError::WriteRejected { status });
            }
            Err(e) => return Err(e),
        }

        self.cache.invalidate(&record.content);
        Ok(record.with_author(state.identity.id))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read
    // ─────────────────────────────────────────────────────────────────────────

    /// Records about `url`, newest first.
    pub async fn search(&self, url: &str) -> Result<Vec<Record>> {
        Ok(self.search_detailed(url).await?.records)
    }

    /// Like [`Client::search`], but also reports degraded sources.
    pub async fn search_detailed(&self, url: &str) -> Result<SearchOutcome> {
        let content = canonicalize(url)?;

        if let Some(records) = self.cache.get(&content) {
            tracing::debug!(url = %content, count = records.len(), "cache hit");
            return Ok(SearchOutcome {
                records,
                source: Source::Cache,
                ..SearchOutcome::default()
            });
        }

        let peers = self.peers.read().await.clone();
        let outcome = self.reader.resolve(&content, &peers).await;

        tracing::debug!(
            url = %content,
            count = outcome.records.len(),
            source = ?outcome.source,
            degraded = outcome.degraded.is_degraded(),
            "search resolved"
        );
        self.cache.put(content, outcome.records.clone());
        Ok(outcome)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Peers
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the peer set.
    pub async fn set_peers(&self, peers: Vec<Identity>) {
        *self.peers.write().await = peers;
    }

    pub async fn peers(&self) -> Vec<Identity> {
        self.peers.read().await.clone()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Bookmarks
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn get_bookmark(&self, url: &str) -> Result<Option<Bookmark>> {
        Ok(self.bookmarks.get(&canonicalize(url)?).await?)
    }

    pub async fn set_bookmark(&self, url: &str, tags: Vec<String>, note: &str) -> Result<Bookmark> {
        Ok(self.bookmarks.set(&canonicalize(url)?, tags, note).await?)
    }

    pub async fn remove_bookmark(&self, url: &str) -> Result<bool> {
        Ok(self.bookmarks.remove(&canonicalize(url)?).await?)
    }

    pub async fn list_bookmarks(&self) -> Result<Vec<(ContentAddress, Bookmark)>> {
        Ok(self.bookmarks.list().await?)
    }
}
