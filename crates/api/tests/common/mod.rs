//! Shared helpers for API integration tests.
//!
//! Tests run against the in-memory stores, so no database is required.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use studio_api::config::ServerConfig;
use studio_api::router::build_app_router;
use studio_api::state::AppState;
use studio_db::{InMemoryDesignStore, InMemoryPortalTokenStore};
use studio_events::EventBus;

/// A test `ServerConfig` with development defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        portal_token_ttl_hours: 168,
        database_url: None,
        log_json: false,
    }
}

pub fn test_state() -> AppState {
    AppState {
        config: Arc::new(test_config()),
        designs: Arc::new(InMemoryDesignStore::new()),
        portal_tokens: Arc::new(InMemoryPortalTokenStore::new()),
        event_bus: Arc::new(EventBus::default()),
        pool: None,
    }
}

/// The full application router (same middleware stack as `main.rs`) over
/// fresh in-memory stores.
pub fn build_test_app() -> Router {
    build_app_router(test_state(), &test_config())
}

/// Like [`build_test_app`], also returning the state so tests can reach the
/// stores and the event bus.
pub fn build_test_app_with_state() -> (Router, AppState) {
    let state = test_state();
    (build_app_router(state.clone(), &test_config()), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
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
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the parsed body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

/// Create a design through the API and return its `data` object.
pub async fn create_design(app: &Router, format: &str, brand_id: &str) -> Value {
    let response = post_json(
        app,
        "/api/v1/designs",
        json!({ "format": format, "brandId": brand_id, "name": "Launch post" }),
    )
    .await;
    expect_json(response, StatusCode::CREATED).await["data"].clone()
}

/// Create a design and move it to `pending_approval`.
pub async fn create_pending_design(app: &Router, brand_id: &str) -> Value {
    let design = create_design(app, "social_square", brand_id).await;
    let id = design["id"].as_str().unwrap();
    let response = post_json(
        app,
        &format!("/api/v1/designs/{id}/approval/request"),
        json!({ "requesterId": "creator-1" }),
    )
    .await;
    expect_json(response, StatusCode::OK).await["data"].clone()
}
