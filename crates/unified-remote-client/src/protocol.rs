//! Wire types for the Unified Remote web client protocol
//!
//! Request bodies use PascalCase keys. Numeric action codes identify the
//! request kind; `Request` always repeats the `Action` value.

use serde::{Deserialize, Serialize};

/// Header carrying the connection id on every request after connect
pub const CONNECTION_HEADER: &str = "UR-Connection-ID";

/// Protocol version announced by the web client
pub const PROTOCOL_VERSION: u32 = 10;

/// Platform announced by the web client
pub const PLATFORM: &str = "web";

/// Prefix of the per-call source identifier
pub const SOURCE_PREFIX: &str = "web-";

/// Prefix of remote ids in the trigger request
pub const ACTION_ID_PREFIX: &str = "Unified.";

pub(crate) const ACTION_NEGOTIATE: u32 = 0;
pub(crate) const ACTION_AUTHENTICATE: u32 = 1;
pub(crate) const ACTION_RUN: u32 = 7;

/// Response to `GET /client/connect`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConnectResponse {
    pub id: String,
}

/// Response to the negotiate request; only the challenge is used
///
/// The challenge is kept untyped: it only has to be a string when the
/// target has credentials.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NegotiateResponse {
    #[serde(rename = "Password", default)]
    pub password: Option<serde_json::Value>,
}

/// Step 2: announce protocol version, platform and the client nonce
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NegotiateRequest<'a> {
    pub action: u32,
    pub request: u32,
    pub version: u32,
    pub password: &'a str,
    pub platform: &'a str,
    pub source: &'a str,
}

impl<'a> NegotiateRequest<'a> {
    pub fn new(nonce: &'a str, source: &'a str) -> Self {
        Self {
            action: ACTION_NEGOTIATE,
            request: ACTION_NEGOTIATE,
            version: PROTOCOL_VERSION,
            password: nonce,
            platform: PLATFORM,
            source,
        }
    }
}

/// Client capabilities declared during authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Capabilities {
    pub actions: bool,
    pub sync: bool,
    pub grid: bool,
    pub fast: bool,
    pub loading: bool,
    pub encryption2: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            actions: true,
            sync: true,
            grid: true,
            fast: false,
            loading: true,
            encryption2: true,
        }
    }
}

/// Step 3: capabilities plus the optional password proof
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AuthenticateRequest<'a> {
    pub capabilities: Capabilities,
    pub action: u32,
    pub request: u32,
    pub source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl<'a> AuthenticateRequest<'a> {
    pub fn new(source: &'a str, password: Option<String>) -> Self {
        Self {
            capabilities: Capabilities::default(),
            action: ACTION_AUTHENTICATE,
            request: ACTION_AUTHENTICATE,
            source,
            password,
        }
    }
}

/// Name of the remote action to run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RunSpec<'a> {
    pub name: &'a str,
}

/// Step 4: run an action of a remote
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TriggerRequest<'a> {
    #[serde(rename = "ID")]
    pub id: String,
    pub action: u32,
    pub request: u32,
    pub run: RunSpec<'a>,
    pub source: &'a str,
}

impl<'a> TriggerRequest<'a> {
    pub fn new(action_id: &str, run_name: &'a str, source: &'a str) -> Self {
        Self {
            id: format!("{}{}", ACTION_ID_PREFIX, action_id),
            action: ACTION_RUN,
            request: ACTION_RUN,
            run: RunSpec { name: run_name },
            source,
        }
    }
}
