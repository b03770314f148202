//! Mock Gemini API server for testing
//!
//! This module provides a mock HTTP server that simulates the Gemini
//! `generateContent` endpoint. Labels can be scripted per message text.

use serde_json::{json, Value};
use wiremock::{
    matchers::{body_string_contains, header, method, path_regex},
    Mock, MockServer, ResponseTemplate,
};

pub const TEST_API_KEY: &str = "test-gemini-key";

/// Mock Gemini API server
pub struct GeminiMockServer {
    pub server: MockServer,
}

impl GeminiMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Answer `label` whenever the prompt contains `message`
    pub async fn mock_label_for(&self, message: &str, label: &str) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/models/[^/]+:generateContent$"))
            .and(header("x-goog-api-key", TEST_API_KEY))
            .and(body_string_contains(message))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate(label)))
            .with_priority(1)
            .named(format!("label for {:?}", message))
            .mount(&self.server)
            .await;
    }

    /// Answer `label` for every message not matched by a specific mock
    pub async fn mock_default_label(&self, label: &str) {
        Mock::given(method("POST"))
            .and(path_regex(r"^/models/[^/]+:generateContent$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate(label)))
            .with_priority(10)
            .named("default label")
            .mount(&self.server)
            .await;
    }

    /// Fail every classification with `status`
    pub async fn mock_failure(&self, status: u16) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "error": { "code": status, "message": "mock failure", "status": "UNAVAILABLE" }
            })))
            .mount(&self.server)
            .await;
    }

    /// Number of classification requests received so far
    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}

fn candidate(label: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": label }] },
            "finishReason": "STOP",
            "index": 0
        }]
    })
}
