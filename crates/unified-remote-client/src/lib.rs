//! Client for the Unified Remote server HTTP API
//!
//! A Unified Remote server exposes a small JSON-over-HTTP API used by its web
//! client. Triggering a remote action takes four requests, all scoped by a
//! connection identifier the server hands out on connect:
//!
//! 1. `GET /client/connect` returns the connection id
//! 2. `POST /client/request` (action 0) announces the client and a nonce
//! 3. `POST /client/request` (action 1) declares capabilities, optionally
//!    with a SHA-256 password proof
//! 4. `POST /client/request` (action 7) runs the named action
//!
//! # Example
//!
//! ```ignore
//! use unified_remote_client::{CommandDispatcher, HttpTransport, Target};
//!
//! let target = Target::new("192.168.1.50:9510").with_password("secret");
//! let dispatcher = CommandDispatcher::new(target, HttpTransport::new()?);
//! dispatcher.trigger("Core.Input", "MyMacro").await?;
//! ```

mod auth;
mod dispatcher;
mod error;
mod protocol;
mod target;
mod tokens;
mod transport;

pub use auth::{password_digest, sha256_hex};
pub use dispatcher::CommandDispatcher;
pub use error::{DispatchError, DispatchResult, Step};
pub use protocol::{
    AuthenticateRequest, Capabilities, NegotiateRequest, RunSpec, TriggerRequest,
    ACTION_ID_PREFIX, CONNECTION_HEADER, PLATFORM, PROTOCOL_VERSION, SOURCE_PREFIX,
};
pub use target::{Credentials, Target, DEFAULT_PORT};
pub use tokens::{TokenSource, UuidTokens};
pub use transport::{HttpResponse, HttpTransport, Transport, TransportError};
