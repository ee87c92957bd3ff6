//! Relay wire types and the transient [`AuthRequest`].

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use url::Url;

use pagenote_core::{now_millis, Identity, Session};

use crate::error::{AuthError, Result};

/// Body of `POST <relay>/requests`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateRequest<'a> {
    pub app: &'a str,
    pub capabilities: &'a [String],
}

/// Relay answer to a create.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    pub id: String,
    pub approval_url: String,
    pub status_url: String,
}

/// A pending authorization request. Discarded once the attempt ends.
#[derive(Debug, Clone)]
pub struct AuthRequest {
    pub id: String,
    pub approval_url: Url,
    pub status_url: Url,
    /// Unix milliseconds.
    pub created_at: i64,
    pub deadline: Instant,
}

impl AuthRequest {
    /// Resolve the relay's answer against the relay URL.
    ///
    /// Relative `approvalUrl`/`statusUrl` values are joined onto `relay`.
    pub fn from_response(response: CreateResponse, relay: &Url, deadline: Instant) -> Result<Self> {
        let resolve = |field: &str, value: &str| {
            relay
                .join(value)
                .map_err(|e| AuthError::RelayUnavailable(format!("bad {field}: {e}")))
        };

        if response.id.is_empty() {
            return Err(AuthError::RelayUnavailable("empty request id".into()));
        }

        Ok(Self {
            approval_url: resolve("approvalUrl", &response.approval_url)?,
            status_url: resolve("statusUrl", &response.status_url)?,
            id: response.id,
            created_at: now_millis(),
            deadline,
        })
    }
}

/// Body of a status poll.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub session: Option<Session>,
    #[serde(default)]
    pub identity: Option<Identity>,
}

/// What a poll said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    Pending,
    Approved { session: Session, identity: Identity },
    Denied,
    Expired,
}

impl From<StatusResponse> for AuthStatus {
    fn from(response: StatusResponse) -> Self {
        match (response.status.as_str(), response.session, response.identity) {
            ("approved", Some(session), Some(identity)) => AuthStatus::Approved { session, identity },
            ("denied", _, _) => AuthStatus::Denied,
            ("expired", _, _) => AuthStatus::Expired,
            _ => AuthStatus::Pending,
        }
    }
}
