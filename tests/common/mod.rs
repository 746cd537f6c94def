#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use draftboard::util::ManualClock;
use draftboard::{app, build_state, AppConfig, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt; // for oneshot

/// Address allow-listed by [`test_config`].
pub const ADMIN_ADDR: &str = "203.0.113.7";

/// Tracks environment variable mutations and restores originals on drop.
pub struct EnvGuard {
    originals: HashMap<String, Option<String>>,
}

impl EnvGuard {
    pub fn new() -> Self {
        Self {
            originals: HashMap::new(),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.capture(key);
        std::env::set_var(key, value);
    }

    pub fn set_many(&mut self, entries: &[(&str, &str)]) {
        for (key, value) in entries {
            self.set(key, value);
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.capture(key);
        std::env::remove_var(key);
    }

    fn capture(&mut self, key: &str) {
        if self.originals.contains_key(key) {
            return;
        }
        let original = std::env::var(key).ok();
        self.originals.insert(key.to_string(), original);
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, original) in self.originals.drain() {
            match original {
                Some(value) => std::env::set_var(&key, value),
                None => std::env::remove_var(&key),
            }
        }
    }
}

/// Default configuration with one allow-listed operator address and a short
/// blocked-word list.
pub fn test_config() -> AppConfig {
    AppConfig {
        blocked_words: vec!["noob".into(), "troll".into()],
        admin_addresses: vec![ADMIN_ADDR.into()],
        ..AppConfig::default()
    }
}

/// Build state on a manual clock so tests can step through the send
/// interval and the visitor timeout.
pub fn state_with(config: AppConfig) -> (AppState, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::default());
    let state = build_state(config, clock.clone()).unwrap();
    (state, clock)
}

pub fn test_app() -> (Router, AppState, Arc<ManualClock>) {
    let (state, clock) = state_with(test_config());
    (app(state.clone()), state, clock)
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_json_from(uri: &str, body: Value, addr: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-forwarded-for", addr)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get_from(uri: &str, addr: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-forwarded-for", addr)
        .body(Body::empty())
        .unwrap()
}

/// Run one request through the router.  Returns the status and the body
/// parsed as JSON (`Null` for an empty or non-JSON body).
pub async fn call(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
