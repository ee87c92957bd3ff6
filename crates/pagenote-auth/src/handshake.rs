//! The create/poll handshake.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use url::Url;

use pagenote_core::{Identity, Session};
use pagenote_net::{HttpRequest, Transport};

use crate::error::{AuthError, Result};
use crate::request::{AuthRequest, AuthStatus, CreateRequest, CreateResponse, StatusResponse};
use crate::state::HandshakeState;

/// Handshake configuration.
#[derive(Debug, Clone)]
pub struct HandshakeConfig {
    /// Relay base URL. Parsed when an attempt starts.
    pub relay_url: String,

    /// Application name shown to the user by the relay.
    pub app: String,

    /// Capabilities requested for the session.
    pub capabilities: Vec<String>,

    /// Delay between status polls.
    pub poll_interval: Duration,

    /// Wall-clock budget for the whole attempt.
    pub deadline: Duration,
}

impl Default for HandshakeConfig {
    fn default() -> Self {
        Self {
            relay_url: "https://relay.pagenote.dev".into(),
            app: "pagenote".into(),
            capabilities: vec!["read".into(), "write".into()],
            poll_interval: Duration::from_secs(1),
            deadline: Duration::from_secs(180),
        }
    }
}

/// Shows the approval URL to the user.
#[async_trait]
pub trait ApprovalPresenter: Send + Sync {
    async fn present(&self, approval_url: &Url);
}

/// Presenter that only logs the URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingPresenter;

#[async_trait]
impl ApprovalPresenter for TracingPresenter {
    async fn present(&self, approval_url: &Url) {
        tracing::info!(%approval_url, "open this URL to approve access");
    }
}

/// A successful handshake.
#[derive(Debug, Clone)]
pub struct Approval {
    pub session: Session,
    pub identity: Identity,
}

/// Runs handshake attempts against one relay.
pub struct Handshake<T: Transport + ?Sized> {
    transport: Arc<T>,
    config: HandshakeConfig,
    state: Mutex<HandshakeState>,
}

impl<T: Transport + ?Sized> Handshake<T> {
    pub fn new(transport: Arc<T>, config: HandshakeConfig) -> Self {
        Self {
            transport,
            config,
            state: Mutex::new(HandshakeState::Idle),
        }
    }

    /// State of the current or most recent attempt.
    pub fn state(&self) -> HandshakeState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, next: HandshakeState) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let previous = *state;
        tracing::debug!(from = %previous, to = %next, "handshake state");
        *state = next;
    }

    /// Run one attempt from `Idle` to a terminal state.
    pub async fn run(&self, presenter: &dyn ApprovalPresenter) -> Result<Approval> {
        self.set_state(HandshakeState::Idle);
        let deadline = deadline_after(self.config.deadline);

        let request = match self.create(deadline).await {
            Ok(request) => request,
            Err(AuthError::Timeout) => {
                self.set_state(HandshakeState::TimedOut);
                return Err(AuthError::Timeout);
            }
            Err(e) => {
                self.set_state(HandshakeState::Idle);
                return Err(e);
            }
        };
        self.set_state(HandshakeState::RequestCreated);
        tracing::info!(request = %request.id, "authorization requested");

        if timeout_at(request.deadline, presenter.present(&request.approval_url))
            .await
            .is_err()
        {
            return Err(self.timed_out(&request));
        }
        self.set_state(HandshakeState::Polling);

        loop {
            tokio::time::sleep(self.config.poll_interval).await;
            if Instant::now() >= request.deadline {
                break;
            }

            let status = match timeout_at(request.deadline, self.poll(&request)).await {
                Err(_) => break,
                Ok(Err(reason)) => {
                    tracing::debug!(request = %request.id, %reason, "poll failed, retrying");
                    continue;
                }
                Ok(Ok(status)) => status,
            };

            match status {
                AuthStatus::Pending => {}
                AuthStatus::Approved { session, identity } => {
                    self.set_state(HandshakeState::Approved);
                    tracing::info!(identity = %identity, "authorization approved");
                    return Ok(Approval { session, identity });
                }
                AuthStatus::Denied => {
                    self.set_state(HandshakeState::Denied);
                    return Err(AuthError::Denied);
                }
                AuthStatus::Expired => {
                    self.set_state(HandshakeState::Expired);
                    return Err(AuthError::Expired);
                }
            }
        }

        Err(self.timed_out(&request))
    }

    fn timed_out(&self, request: &AuthRequest) -> AuthError {
        self.set_state(HandshakeState::TimedOut);
        tracing::warn!(request = %request.id, "authorization timed out");
        AuthError::Timeout
    }

    async fn create(&self, deadline: Instant) -> Result<AuthRequest> {
        let relay = Url::parse(&self.config.relay_url)
            .map_err(|e| AuthError::RelayUnavailable(format!("bad relay URL: {e}")))?;
        let endpoint = format!("{}/requests", relay.as_str().trim_end_matches('/'));
        let endpoint =
            Url::parse(&endpoint).map_err(|e| AuthError::RelayUnavailable(e.to_string()))?;

        let body = CreateRequest {
            app: &self.config.app,
            capabilities: &self.config.capabilities,
        };
        let request = HttpRequest::post_json(endpoint, &body)
            .map_err(|e| AuthError::RelayUnavailable(e.to_string()))?;

        let response = timeout_at(deadline, self.transport.send(request))
            .await
            .map_err(|_| AuthError::Timeout)?
            .map_err(|e| AuthError::RelayUnavailable(e.to_string()))?;

        if !response.is_success() {
            return Err(AuthError::RelayUnavailable(format!(
                "relay returned status {}",
                response.status
            )));
        }

        let created: CreateResponse = response
            .json()
            .map_err(|e| AuthError::RelayUnavailable(e.to_string()))?;

        AuthRequest::from_response(created, &relay, deadline)
    }

    /// One status poll. `Err` carries the reason the tick is skipped.
    async fn poll(&self, request: &AuthRequest) -> std::result::Result<AuthStatus, String> {
        let response = self
            .transport
            .send(HttpRequest::get(request.status_url.clone()))
            .await
            .map_err(|e| e.to_string())?;

        if !response.is_success() {
            return Err(format!("status {}", response.status));
        }

        let status: StatusResponse = response.json().map_err(|e| e.to_string())?;
        Ok(status.into())
    }
}

/// Cap on the budget of a single attempt.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `now + budget`, capped so huge budgets cannot overflow the clock.
fn deadline_after(budget: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(budget.min(FAR_FUTURE)).unwrap_or(now)
}
