//! End-to-end handshake tests against a mock Unified Remote server
//!
//! The mock server speaks the web client protocol over real HTTP and
//! verifies the password proof the same way the real server does.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use unified_remote_client::{
    sha256_hex, CommandDispatcher, HttpTransport, Step, Target, CONNECTION_HEADER,
};

const CHALLENGE: &str = "abc123";

#[derive(Default)]
struct MockServer {
    /// Expected `user:password` or `password` material, if auth is enabled
    secret: Option<String>,
    connects: AtomicUsize,
    /// Nonce announced per connection id
    nonces: Mutex<HashMap<String, String>>,
    /// (connection id, body) of every request
    requests: Mutex<Vec<(Option<String>, Value)>>,
    /// Connection ids that presented a valid password proof
    authenticated: Mutex<Vec<String>>,
    /// Remote actions run by authenticated (or open) connections
    runs: Mutex<Vec<(String, String)>>,
}

async fn connect(State(server): State<Arc<MockServer>>) -> Json<Value> {
    let n = server.connects.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({"id": format!("conn-{}", n), "session": "ignored"}))
}

async fn request(
    State(server): State<Arc<MockServer>>,
    headers: HeaderMap,
    body: String,
) -> Json<Value> {
    let connection = headers
        .get(CONNECTION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    server
        .requests
        .lock()
        .unwrap()
        .push((connection.clone(), body.clone()));

    let connection = connection.unwrap_or_default();
    match body["Action"].as_u64() {
        Some(0) => {
            let nonce = body["Password"].as_str().unwrap_or_default().to_string();
            server.nonces.lock().unwrap().insert(connection, nonce);
            Json(json!({"Password": CHALLENGE, "Version": 10}))
        }
        Some(1) => {
            let accepted = match &server.secret {
                None => true,
                Some(secret) => {
                    let nonce = server
                        .nonces
                        .lock()
                        .unwrap()
                        .get(&connection)
                        .cloned()
                        .unwrap_or_default();
                    let expected = sha256_hex(format!("{}{}{}", CHALLENGE, secret, nonce).as_bytes());
                    body["Password"].as_str() == Some(expected.as_str())
                }
            };
            if accepted {
                server.authenticated.lock().unwrap().push(connection);
            }
            Json(json!({}))
        }
        Some(7) => {
            // Unauthenticated runs are silently dropped, like the real server
            if server.authenticated.lock().unwrap().contains(&connection) {
                let id = body["ID"].as_str().unwrap_or_default().to_string();
                let run = body["Run"]["Name"].as_str().unwrap_or_default().to_string();
                server.runs.lock().unwrap().push((id, run));
            }
            Json(json!({}))
        }
        _ => Json(json!({})),
    }
}

async fn spawn_server(secret: Option<&str>) -> (SocketAddr, Arc<MockServer>) {
    let server = Arc::new(MockServer {
        secret: secret.map(String::from),
        ..Default::default()
    });
    let app = Router::new()
        .route("/client/connect", get(connect))
        .route("/client/request", post(request))
        .with_state(server.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, server)
}

fn transport() -> HttpTransport {
    HttpTransport::with_timeout(Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_open_server_runs_action() {
    let (addr, server) = spawn_server(None).await;
    let dispatcher = CommandDispatcher::new(Target::new(addr.to_string()), transport());

    dispatcher.trigger("5", "MyMacro").await.unwrap();

    let requests = server.requests.lock().unwrap().clone();
    assert_eq!(requests.len(), 3);
    assert!(requests
        .iter()
        .all(|(conn, _)| conn.as_deref() == Some("conn-1")));
    assert!(requests[1].1.get("Password").is_none());

    let runs = server.runs.lock().unwrap().clone();
    assert_eq!(runs, vec![("Unified.5".to_string(), "MyMacro".to_string())]);
}

#[tokio::test]
async fn test_username_and_password_are_accepted() {
    let (addr, server) = spawn_server(Some("alice:secret")).await;
    let target = Target::new(addr.to_string())
        .with_username("alice")
        .with_password("secret");
    let dispatcher = CommandDispatcher::new(target, transport());

    dispatcher.trigger("Core.Input", "Play").await.unwrap();

    assert_eq!(
        server.authenticated.lock().unwrap().clone(),
        vec!["conn-1".to_string()]
    );
    assert_eq!(server.runs.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_wrong_password_is_silently_ignored() {
    let (addr, server) = spawn_server(Some("secret")).await;
    let target = Target::new(addr.to_string()).with_password("not-the-secret");
    let dispatcher = CommandDispatcher::new(target, transport());

    // The handshake itself succeeds; the server just drops the run
    dispatcher.trigger("5", "MyMacro").await.unwrap();

    assert!(server.authenticated.lock().unwrap().is_empty());
    assert!(server.runs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_each_trigger_opens_new_connection() {
    let (addr, server) = spawn_server(Some("secret")).await;
    let target = Target::new(addr.to_string()).with_password("secret");
    let dispatcher = CommandDispatcher::new(target, transport());

    dispatcher.trigger("5", "A").await.unwrap();
    dispatcher.trigger("5", "B").await.unwrap();

    assert_eq!(server.connects.load(Ordering::SeqCst), 2);
    assert_eq!(
        server.authenticated.lock().unwrap().clone(),
        vec!["conn-1".to_string(), "conn-2".to_string()]
    );
    let nonces = server.nonces.lock().unwrap().clone();
    assert_ne!(nonces["conn-1"], nonces["conn-2"]);
}

#[tokio::test]
async fn test_missing_endpoint_is_protocol_error() {
    // Axum answers unknown routes with an empty 404 body
    let app = Router::new();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let dispatcher = CommandDispatcher::new(Target::new(addr.to_string()), transport());
    let err = dispatcher.trigger("5", "MyMacro").await.unwrap_err();

    assert!(err.is_protocol());
    assert_eq!(err.step(), Step::Connect);
}
