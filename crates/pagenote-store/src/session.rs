//! Persisted session.
//!
//! The session token and the identity it is bound to are stored together as
//! one JSON document, so a reader never sees one without the other.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use pagenote_core::{now_millis, Identity, Session};

use crate::error::Result;
use crate::traits::{KvStore, KvStoreExt};

/// Key under which the session document is stored.
pub const SESSION_KEY: &str = "session";

/// The stored session document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub session: Session,
    pub identity: Identity,
    /// When the session was obtained (Unix ms).
    pub saved_at: i64,
}

/// Session persistence over any [`KvStore`].
pub struct SessionStore<S: KvStore + ?Sized> {
    store: Arc<S>,
}

impl<S: KvStore + ?Sized> SessionStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Persist a session, replacing any previous one.
    pub async fn save(&self, session: &Session, identity: &Identity) -> Result<StoredSession> {
        let stored = StoredSession {
            session: session.clone(),
            identity: identity.clone(),
            saved_at: now_millis(),
        };
        self.store.set_json(SESSION_KEY, &stored).await?;
        tracing::info!(identity = %identity.id, "session saved");
        Ok(stored)
    }

    /// Load the persisted session, if any.
    pub async fn load(&self) -> Result<Option<StoredSession>> {
        self.store.get_json(SESSION_KEY).await
    }

    /// Forget the persisted session.
    pub async fn clear(&self) -> Result<()> {
        if self.store.remove(SESSION_KEY).await? {
            tracing::info!("session cleared");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn test_session_roundtrip() {
        let sessions = SessionStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(sessions.load().await.unwrap(), None);

        let identity = Identity::parse("did:example:alice", "https://alice.example/").unwrap();
        let saved = sessions.save(&Session::new("tok"), &identity).await.unwrap();

        let loaded = sessions.load().await.unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.session.token(), "tok");

        sessions.clear().await.unwrap();
        assert_eq!(sessions.load().await.unwrap(), None);
    }
}
