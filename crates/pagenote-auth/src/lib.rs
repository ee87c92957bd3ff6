//! # pagenote Auth
//!
//! Obtains a session for the user's identity through a third-party relay.
//!
//! ## Protocol
//!
//! ```text
//! POST <relay>/requests {app, capabilities}  -> {id, approvalUrl, statusUrl}
//! present approvalUrl to the user
//! every interval: GET statusUrl              -> {status, session?, identity?}
//!   approved -> Approval{session, identity}
//!   denied   -> AuthError::Denied
//!   expired  -> AuthError::Expired
//!   other    -> keep polling
//! deadline elapsed                           -> AuthError::Timeout
//! ```
//!
//! Transport failures while polling skip the tick; only creating the request
//! fails fast. The whole attempt is one future, so dropping it cancels it.

pub mod error;
pub mod handshake;
pub mod request;
pub mod state;

pub use error::{AuthError, Result};
pub use handshake::{Approval, ApprovalPresenter, Handshake, HandshakeConfig, TracingPresenter};
pub use request::{AuthRequest, AuthStatus, CreateRequest, CreateResponse, StatusResponse};
pub use state::HandshakeState;
