//! Intent oracle implementations
//!
//! The oracle turns free text into a raw intent label. It is treated as a
//! black box: labels are passed through untouched and mapped onto the closed
//! `Intent` set by the caller, so an unexpected label is never an error here.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OracleConfig;
use crate::utils::errors::{AutoStreamError, OracleError, Result};

/// Classifier prompt sent to the language model
pub const INTENT_PROMPT: &str = "You are an intent classifier for a SaaS sales agent.

Classify the user message into exactly ONE of the following intents:
- GREETING (hello, hi, casual talk)
- INFO (pricing, features, plans, support, refund, questions)
- HIGH_INTENT (ready to sign up, wants to try, buy, subscribe)

User message:
{message}

Return ONLY the intent name.";

/// Render the classifier prompt for one message
pub fn render_prompt(message: &str) -> String {
    INTENT_PROMPT.replace("{message}", message)
}

/// External classifier of user messages
#[async_trait]
pub trait IntentOracle: Send + Sync {
    /// Return the raw label for `text`
    async fn classify(&self, text: &str) -> Result<String>;
}

/// Gemini `generateContent` request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Gemini `generateContent` response body
#[derive(Debug, Clone, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Intent oracle backed by the Gemini REST API
#[derive(Debug, Clone)]
pub struct GeminiIntentOracle {
    client: Client,
    config: OracleConfig,
}

impl GeminiIntentOracle {
    /// Create a new GeminiIntentOracle instance
    pub fn new(config: OracleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("AutoStream-Agent/1.0")
            .build()
            .map_err(AutoStreamError::Http)?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, text: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: render_prompt(text) }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
            },
        }
    }
}

#[async_trait]
impl IntentOracle for GeminiIntentOracle {
    async fn classify(&self, text: &str) -> Result<String> {
        let api_key = self.config.api_key.as_deref().ok_or(OracleError::MissingApiKey)?;

        debug!(model = %self.config.model, "Requesting intent classification");

        let response = self.client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&self.build_request(text))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout
                } else if e.is_connect() {
                    OracleError::ServiceUnavailable
                } else {
                    OracleError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(OracleError::RequestFailed(format!("HTTP {}: {}", status, error_text)).into());
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| OracleError::InvalidResponse(e.to_string()))?;

        let label = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content.parts.into_iter().map(|part| part.text).collect::<String>()
            })
            .ok_or_else(|| OracleError::InvalidResponse("No candidates in response".to_string()))?;

        Ok(label.trim().to_string())
    }
}

/// Oracle returning scripted labels, for tests and offline runs
#[derive(Debug, Clone, Default)]
pub struct StaticIntentOracle {
    labels: Arc<Mutex<VecDeque<String>>>,
    fallback: String,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StaticIntentOracle {
    /// Always answer with `label`
    pub fn always(label: impl Into<String>) -> Self {
        Self {
            fallback: label.into(),
            ..Self::default()
        }
    }

    /// Answer with `labels` in order, then with `fallback`
    pub fn scripted<I, S>(labels: I, fallback: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: Arc::new(Mutex::new(labels.into_iter().map(Into::into).collect())),
            fallback: fallback.into(),
            calls: Arc::default(),
        }
    }

    /// Texts this oracle was asked to classify
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
    }
}

#[async_trait]
impl IntentOracle for StaticIntentOracle {
    async fn classify(&self, text: &str) -> Result<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(text.to_string());
        }

        let next = self.labels.lock().ok().and_then(|mut labels| labels.pop_front());
        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Oracle that always fails, used to exercise degraded routing
#[derive(Debug, Clone, Default)]
pub struct UnavailableIntentOracle;

#[async_trait]
impl IntentOracle for UnavailableIntentOracle {
    async fn classify(&self, _text: &str) -> Result<String> {
        Err(OracleError::ServiceUnavailable.into())
    }
}
