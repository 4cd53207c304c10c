//! HTTP transport used by the dispatcher

use crate::protocol::CONNECTION_HEADER;
use async_trait::async_trait;
use reqwest::{header, Client, Response};
use std::time::Duration;
use thiserror::Error;

/// Per-request timeout of [`HttpTransport::new`]
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure of a single HTTP call
#[derive(Debug, Error)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError::Other(message.into())
    }
}

/// Status and raw body of a completed HTTP call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 response with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    async fn read(response: Response) -> Result<Self, TransportError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(Self { status, body })
    }
}

/// The two HTTP calls the handshake needs
///
/// Implementations must not retry on their own; the dispatcher treats every
/// error as final for the current handshake.
#[async_trait]
pub trait Transport: Send + Sync {
    /// `GET url`
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;

    /// `POST url` with a JSON body and the connection id header
    async fn post(
        &self,
        url: &str,
        connection_id: &str,
        body: String,
    ) -> Result<HttpResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with [`DEFAULT_REQUEST_TIMEOUT`]
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a transport with a custom per-request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client (shares its connection pool)
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        HttpResponse::read(response).await
    }

    async fn post(
        &self,
        url: &str,
        connection_id: &str,
        body: String,
    ) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONNECTION_HEADER, connection_id)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        HttpResponse::read(response).await
    }
}
