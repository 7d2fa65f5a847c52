//! Shared fixtures for client integration tests

#![allow(dead_code)]

use jsonwebtoken::{EncodingKey, Header, encode};
use nauan_client::{ApiClient, MemoryTokenStore, ModerationApi, Session, SessionListener};
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::util::SubscriberInitExt;
use wiremock::MockServer;

/// Route client logs at DEBUG to the test output for the current thread
pub fn init_tracing() -> tracing::subscriber::DefaultGuard {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .with_test_writer()
        .finish()
        .set_default()
}

/// Mint an HS256 token with the given expiry and role
pub fn token(exp: i64, role: &str) -> String {
    encode(
        &Header::default(),
        &json!({ "sub": "staff-1", "urole": role, "exp": exp }),
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn fresh_token() -> String {
    token(now() + 3600, "Admin")
}

pub fn expiring_token() -> String {
    token(now() + 2, "Admin")
}

pub fn session_with(token: Option<&str>) -> Arc<Session> {
    let store = match token {
        Some(token) => MemoryTokenStore::with_token(token),
        None => MemoryTokenStore::new(),
    };
    Arc::new(Session::new(Arc::new(store)))
}

pub fn client(server: &MockServer, session: Arc<Session>) -> ApiClient {
    ApiClient::builder()
        .base_url(server.uri())
        .cors_origin("http://admin.test")
        .session(session)
        .build()
        .unwrap()
}

/// Counts session terminations
#[derive(Default)]
pub struct CountingListener {
    ended: AtomicUsize,
}

impl CountingListener {
    pub fn count(&self) -> usize {
        self.ended.load(Ordering::SeqCst)
    }
}

impl SessionListener for CountingListener {
    fn session_ended(&self) {
        self.ended.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn api(server: &MockServer, session: Arc<Session>) -> (ModerationApi, Arc<CountingListener>) {
    let listener = Arc::new(CountingListener::default());
    let api = ModerationApi::new(client(server, session), listener.clone());
    (api, listener)
}
