#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use intake_api::config::{ServerConfig, UpstreamConfig};
use intake_api::router::build_app_router;
use intake_api::sessions::WizardSessions;
use intake_api::state::AppState;
use intake_api::upstream::{InMemorySubmissionBackend, SubmissionBackend};

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:3000` as CORS origin and a 30-second request
/// timeout. No upstream URL, so submissions stay in memory.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        session_idle_timeout_secs: 1800,
        upstream: UpstreamConfig {
            base_url: None,
            api_token: None,
            timeout_secs: 5,
        },
    }
}

/// Build the full application router backed by an in-memory submission store.
pub fn build_test_app() -> Router {
    build_test_app_with(Arc::new(InMemorySubmissionBackend::new()))
}

/// Build the full application router around a caller-owned backend so the
/// test can inspect what was stored.
pub fn build_test_app_with(backend: Arc<InMemorySubmissionBackend>) -> Router {
    build_test_app_with_backend(backend)
}

/// Build the full application router around any submission backend.
pub fn build_test_app_with_backend(backend: Arc<dyn SubmissionBackend>) -> Router {
    let state = AppState {
        sessions: Arc::new(WizardSessions::new()),
        backend,
    };
    build_app_router(state, &test_config()).expect("test router must build")
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_empty(app: &Router, uri: &str) -> Response {
    send(app, Method::POST, uri, None).await
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
