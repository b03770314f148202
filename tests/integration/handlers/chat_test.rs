//! Chat API integration tests
//!
//! These tests exercise the complete HTTP application, including static file
//! serving, against mock Gemini and webhook servers.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use AutoStream::handlers::build_app;
use AutoStream::state::scenarios::{CONFIRMATION, PROMPT_NAME};

use crate::helpers::*;
use crate::integration::init_test_logging;

async fn setup() -> (TestContext, Router) {
    init_test_logging();
    let ctx = TestContext::new().await;
    let app = build_app(ctx.app_state().await, ctx.settings.server.static_dir.as_deref());
    (ctx, app)
}

async fn post_chat(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_lead_capture_over_http() {
    let (ctx, app) = setup().await;
    ctx.gemini.mock_label_for(TRIGGER, "HIGH_INTENT").await;
    ctx.mock_webhook(200, 1).await;

    let mut last = Value::Null;
    for text in lead_capture_script() {
        let (status, body) = post_chat(&app, json!({ "message": text, "sessionId": "web-1" })).await;
        assert_eq!(status, StatusCode::OK);
        last = body;
    }

    assert_eq!(last["response"], CONFIRMATION);
    assert_eq!(last["state"]["lead"]["name"], NAME);
    assert_eq!(last["state"]["lead"]["email"], EMAIL);
    assert_eq!(last["state"]["lead"]["platform"], PLATFORM);
    assert_eq!(last["state"]["intent"], "HIGH_INTENT");
    assert_eq!(last["state"]["history"].as_array().map(Vec::len), Some(4));

    let (status, bytes) = get(&app, "/sessions/web-1").await;
    assert_eq!(status, StatusCode::OK);
    let snapshot: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(snapshot["lead"]["platform"], PLATFORM);
}

#[tokio::test]
async fn test_missing_session_id_uses_default() {
    let (ctx, app) = setup().await;
    ctx.gemini.mock_default_label("HIGH_INTENT").await;

    let (status, body) = post_chat(&app, json!({ "message": "I'm in" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], PROMPT_NAME);
    assert_eq!(body["state"]["session_id"], "default");
}

#[tokio::test]
async fn test_sink_failure_is_reported_as_warning() {
    let (ctx, app) = setup().await;
    ctx.gemini.mock_default_label("HIGH_INTENT").await;
    ctx.mock_webhook(503, 1).await;

    let mut last = Value::Null;
    for text in lead_capture_script() {
        last = post_chat(&app, json!({ "message": text, "session_id": "web-2" })).await.1;
    }

    assert_eq!(last["response"], CONFIRMATION);
    let warnings = last["warnings"].as_array().cloned().unwrap_or_default();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap_or_default().contains("503"));
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let (_ctx, app) = setup().await;

    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_static_index_is_served() {
    let (_ctx, app) = setup().await;

    let (status, bytes) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8_lossy(&bytes), STATIC_INDEX);
}

#[tokio::test]
async fn test_health_reports_sessions() {
    let (ctx, app) = setup().await;
    ctx.gemini.mock_default_label("HIGH_INTENT").await;

    post_chat(&app, json!({ "message": "sign me up", "session_id": "h1" })).await;

    let (status, bytes) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["sessions"]["total_sessions"], 1);
    assert_eq!(health["sessions"]["collecting_leads"], 1);
}
