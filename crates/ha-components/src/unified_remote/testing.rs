//! In-process stand-in for Unified Remote servers
//!
//! Routes by host: hosts starting with `offline` refuse connections, hosts
//! starting with `slow` never answer connect, every other host behaves like
//! an open server.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use unified_remote_client::{HttpResponse, Transport, TransportError};

#[derive(Default)]
pub(crate) struct MockServer {
    connects: AtomicUsize,
    requests: AtomicUsize,
    /// (host, remote id, run name) of every trigger request
    runs: Mutex<Vec<(String, String, String)>>,
    /// Client nonce of every negotiate request
    nonces: Mutex<Vec<String>>,
    /// Bodies of every authenticate request
    auth_bodies: Mutex<Vec<Value>>,
}

impl MockServer {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn runs(&self) -> Vec<(String, String, String)> {
        self.runs.lock().unwrap().clone()
    }

    pub(crate) fn nonces(&self) -> Vec<String> {
        self.nonces.lock().unwrap().clone()
    }

    pub(crate) fn auth_bodies(&self) -> Vec<Value> {
        self.auth_bodies.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

fn host_of(url: &str) -> String {
    let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    rest.split('/').next().unwrap_or_default().to_string()
}

#[async_trait]
impl Transport for MockServer {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let host = host_of(url);
        if host.starts_with("offline") {
            return Err(TransportError::new("connection refused"));
        }
        if host.starts_with("slow") {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        let n = self.connects.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(HttpResponse::ok(format!(r#"{{"id":"conn-{}"}}"#, n)))
    }

    async fn post(
        &self,
        url: &str,
        _connection_id: &str,
        body: String,
    ) -> Result<HttpResponse, TransportError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let body: Value =
            serde_json::from_str(&body).map_err(|e| TransportError::new(e.to_string()))?;

        match body["Action"].as_u64() {
            Some(0) => {
                let nonce = body["Password"].as_str().unwrap_or_default().to_string();
                self.nonces.lock().unwrap().push(nonce);
                Ok(HttpResponse::ok(r#"{"Password":"abc123"}"#))
            }
            Some(1) => {
                self.auth_bodies.lock().unwrap().push(body);
                Ok(HttpResponse::ok("{}"))
            }
            Some(7) => {
                let id = body["ID"].as_str().unwrap_or_default().to_string();
                let run = body["Run"]["Name"].as_str().unwrap_or_default().to_string();
                self.runs.lock().unwrap().push((host_of(url), id, run));
                Ok(HttpResponse::ok("{}"))
            }
            _ => Ok(HttpResponse::new(400, "{}")),
        }
    }
}
