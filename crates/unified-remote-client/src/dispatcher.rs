//! Command dispatcher: runs the four-step handshake for one remote trigger

use crate::auth::password_digest;
use crate::error::{DispatchError, DispatchResult, Step};
use crate::protocol::{
    AuthenticateRequest, ConnectResponse, NegotiateRequest, NegotiateResponse, TriggerRequest,
    SOURCE_PREFIX,
};
use crate::target::Target;
use crate::tokens::{TokenSource, UuidTokens};
use crate::transport::{HttpResponse, Transport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Handshake state of a single trigger call
///
/// Created after connect and dropped when the call returns; nothing in it
/// is ever reused by a later call.
struct Session {
    connection_id: String,
    nonce: String,
    source: String,
}

impl Session {
    fn open(connection_id: String, tokens: &dyn TokenSource) -> Self {
        let nonce = tokens.next_token();
        let source = format!("{}{}", SOURCE_PREFIX, tokens.next_token());
        Self {
            connection_id,
            nonce,
            source,
        }
    }
}

/// Sends "run" commands to one Unified Remote server
///
/// The dispatcher holds no per-call state, so a single instance can serve
/// concurrent triggers. Each [`CommandDispatcher::trigger`] performs a full
/// handshake with a fresh connection id, nonce and source id.
#[derive(Clone)]
pub struct CommandDispatcher {
    target: Target,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenSource>,
}

impl CommandDispatcher {
    /// Create a dispatcher with random UUID tokens
    pub fn new(target: Target, transport: impl Transport + 'static) -> Self {
        Self::with_shared(target, Arc::new(transport), Arc::new(UuidTokens))
    }

    /// Create a dispatcher sharing a transport (and its connection pool)
    pub fn with_shared(
        target: Target,
        transport: Arc<dyn Transport>,
        tokens: Arc<dyn TokenSource>,
    ) -> Self {
        Self {
            target,
            transport,
            tokens,
        }
    }

    /// Replace the token source
    pub fn with_tokens(mut self, tokens: impl TokenSource + 'static) -> Self {
        self.tokens = Arc::new(tokens);
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Run `run_name` on the remote `action_id`
    ///
    /// Succeeds once the trigger request completes at the HTTP level; the
    /// server's answer to the trigger is not inspected. Any failure aborts
    /// the remaining steps.
    #[instrument(skip(self), fields(host = %self.target.host()))]
    pub async fn trigger(&self, action_id: &str, run_name: &str) -> DispatchResult<()> {
        let connection_id = self.connect().await?;
        let session = Session::open(connection_id, self.tokens.as_ref());

        let challenge = self.negotiate(&session).await?;

        let password = match self.target.credentials() {
            Some(credentials) => {
                let challenge = challenge
                    .as_ref()
                    .and_then(serde_json::Value::as_str)
                    .ok_or_else(|| {
                        DispatchError::protocol(
                            Step::Negotiate,
                            "response has no string `Password` challenge",
                        )
                    })?;
                Some(password_digest(challenge, credentials, &session.nonce))
            }
            None => None,
        };

        self.authenticate(&session, password).await?;
        self.run(&session, action_id, run_name).await
    }

    async fn connect(&self) -> DispatchResult<String> {
        let url = self.target.client_url("connect");
        let response = self
            .transport
            .get(&url)
            .await
            .map_err(|source| DispatchError::Transport {
                step: Step::Connect,
                source,
            })?;

        let connect: ConnectResponse = parse(Step::Connect, &response)?;
        debug!(connection_id = %connect.id, "Connected");
        Ok(connect.id)
    }

    async fn negotiate(&self, session: &Session) -> DispatchResult<Option<serde_json::Value>> {
        let request = NegotiateRequest::new(&session.nonce, &session.source);
        let response = self.post(Step::Negotiate, session, &request).await?;

        let negotiated: NegotiateResponse = parse(Step::Negotiate, &response)?;
        debug!(
            source = %session.source,
            challenge = negotiated.password.is_some(),
            "Negotiated client session"
        );
        Ok(negotiated.password)
    }

    async fn authenticate(&self, session: &Session, password: Option<String>) -> DispatchResult<()> {
        let with_password = password.is_some();
        let request = AuthenticateRequest::new(&session.source, password);
        self.post(Step::Authenticate, session, &request).await?;

        debug!(with_password, "Sent capabilities");
        Ok(())
    }

    async fn run(&self, session: &Session, action_id: &str, run_name: &str) -> DispatchResult<()> {
        let request = TriggerRequest::new(action_id, run_name, &session.source);
        let response = self.post(Step::Trigger, session, &request).await?;

        if !response.is_success() {
            warn!(
                status = response.status,
                remote = %request.id,
                "Unified Remote answered trigger with non-success status"
            );
        }
        debug!(remote = %request.id, run = %run_name, "Triggered remote action");
        Ok(())
    }

    async fn post<T: Serialize>(
        &self,
        step: Step,
        session: &Session,
        request: &T,
    ) -> DispatchResult<HttpResponse> {
        let body = serde_json::to_string(request)
            .map_err(|e| DispatchError::protocol(step, format!("cannot encode request: {}", e)))?;

        self.transport
            .post(
                &self.target.client_url("request"),
                &session.connection_id,
                body,
            )
            .await
            .map_err(|source| DispatchError::Transport { step, source })
    }
}

fn parse<T: DeserializeOwned>(step: Step, response: &HttpResponse) -> DispatchResult<T> {
    serde_json::from_str(&response.body)
        .map_err(|e| DispatchError::protocol(step, format!("invalid response: {}", e)))
}
