#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use skiadmin_api::app::build_app;
use skiadmin_api::config::{ServerConfig, StorageBackend};
use skiadmin_api::state::AppState;
use skiadmin_core::service::Services;
use skiadmin_core::validation::Validator;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        storage: StorageBackend::Memory,
    }
}

/// Build the full application router backed by fresh in-memory stores.
///
/// The router is cheap to clone and every clone shares the same stores, so a
/// test can issue several requests against one app.
pub fn build_test_app() -> Router {
    let state = AppState {
        config: Arc::new(test_config()),
        services: Services::in_memory(Arc::new(Validator::new())),
    };
    build_app(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn delete(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send_json(app, Method::PUT, uri, body).await
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Create a winter sport and return its id.
pub async fn create_sport(app: &Router, name: &str) -> i64 {
    let response = post_json(
        app,
        "/api/v1/sports",
        serde_json::json!({ "name": name, "season": "WINTER" }),
    )
    .await;
    let json = body_json(response).await;
    json["data"]["id"].as_i64().unwrap()
}

/// A valid ski lift body offering `sports`.
pub fn lift_body(name: &str, sports: &[i64]) -> Value {
    serde_json::json!({
        "name": name,
        "type": "CHAIRLIFT",
        "status": "OPEN",
        "comment": "Detachable six-seater",
        "available_sports": sports,
        "commissioning_date": "1998-12-19",
    })
}
