//! Lead sink implementations
//!
//! A lead sink is the external system of record that receives a fully
//! captured lead. Delivery is a single attempt; failures are reported to
//! the caller and never undo the capture held in session state.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::config::LeadSinkConfig;
use crate::models::CapturedLead;
use crate::utils::errors::{AutoStreamError, LeadSinkError, Result};

/// Receiver of fully captured leads
#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn capture(&self, lead: &CapturedLead) -> Result<()>;
}

/// Sink that records leads in the application log only
#[derive(Debug, Clone, Default)]
pub struct LogLeadSink;

#[async_trait]
impl LeadSink for LogLeadSink {
    async fn capture(&self, lead: &CapturedLead) -> Result<()> {
        info!(
            session_id = %lead.session_id,
            platform = %lead.platform,
            "Lead captured successfully"
        );
        debug!(
            session_id = %lead.session_id,
            name = %lead.name,
            email = %lead.email,
            "Captured lead contact details"
        );
        Ok(())
    }
}

/// Sink that posts leads as JSON to a webhook
#[derive(Debug, Clone)]
pub struct WebhookLeadSink {
    client: Client,
    url: String,
}

impl WebhookLeadSink {
    /// Create a new WebhookLeadSink instance
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("AutoStream-Agent/1.0")
            .build()
            .map_err(AutoStreamError::Http)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl LeadSink for WebhookLeadSink {
    async fn capture(&self, lead: &CapturedLead) -> Result<()> {
        debug!(session_id = %lead.session_id, url = %self.url, "Delivering lead to webhook");

        let response = self.client
            .post(&self.url)
            .json(lead)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LeadSinkError::Timeout
                } else {
                    LeadSinkError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LeadSinkError::Rejected(format!("HTTP {}: {}", status, body)).into());
        }

        info!(session_id = %lead.session_id, "Lead delivered to webhook");
        Ok(())
    }
}

/// In-memory sink that keeps every lead it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingLeadSink {
    leads: Arc<Mutex<Vec<CapturedLead>>>,
    fail_with: Option<String>,
}

impl RecordingLeadSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records the attempt but reports a delivery failure
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            leads: Arc::default(),
            fail_with: Some(reason.into()),
        }
    }

    pub fn leads(&self) -> Vec<CapturedLead> {
        self.leads.lock().map(|leads| leads.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.leads.lock().map(|leads| leads.len()).unwrap_or_default()
    }
}

#[async_trait]
impl LeadSink for RecordingLeadSink {
    async fn capture(&self, lead: &CapturedLead) -> Result<()> {
        if let Ok(mut leads) = self.leads.lock() {
            leads.push(lead.clone());
        }

        match &self.fail_with {
            Some(reason) => Err(LeadSinkError::RequestFailed(reason.clone()).into()),
            None => Ok(()),
        }
    }
}

/// Build the sink described by configuration
pub fn build_lead_sink(config: &LeadSinkConfig) -> Result<Arc<dyn LeadSink>> {
    match &config.webhook_url {
        Some(url) => {
            info!(url = %url, "Lead sink: webhook");
            let sink = WebhookLeadSink::new(url.clone(), Duration::from_secs(config.timeout_seconds))?;
            Ok(Arc::new(sink))
        }
        None => {
            info!("Lead sink: log only");
            Ok(Arc::new(LogLeadSink))
        }
    }
}
