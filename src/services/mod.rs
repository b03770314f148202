//! Services module
//!
//! This module contains the collaborators the conversation router depends on:
//! the intent oracle, the knowledge base, and the lead sink.

pub mod intent;
pub mod knowledge;
pub mod lead_sink;

// Re-export commonly used services
pub use intent::{IntentOracle, GeminiIntentOracle, StaticIntentOracle, UnavailableIntentOracle};
pub use knowledge::{KnowledgeBase, KnowledgeRule};
pub use lead_sink::{LeadSink, LogLeadSink, WebhookLeadSink, RecordingLeadSink};

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::settings::Settings;
use crate::utils::errors::Result;

/// Service factory for creating and sharing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub intent_oracle: Arc<dyn IntentOracle>,
    pub knowledge_base: Arc<KnowledgeBase>,
    pub lead_sink: Arc<dyn LeadSink>,
    oracle_configured: bool,
}

impl ServiceFactory {
    /// Assemble a factory from already-built services
    pub fn new(
        intent_oracle: Arc<dyn IntentOracle>,
        knowledge_base: KnowledgeBase,
        lead_sink: Arc<dyn LeadSink>,
    ) -> Self {
        Self {
            intent_oracle,
            knowledge_base: Arc::new(knowledge_base),
            lead_sink,
            oracle_configured: true,
        }
    }

    /// Build every service from settings
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let oracle_configured = settings.oracle.api_key.is_some();
        if !oracle_configured {
            warn!("No oracle API key configured, every message will get the fallback reply");
        }

        let intent_oracle: Arc<dyn IntentOracle> =
            Arc::new(GeminiIntentOracle::new(settings.oracle.clone())?);
        let knowledge_base = KnowledgeBase::from_config(settings.knowledge.path.as_deref()).await;
        let lead_sink = lead_sink::build_lead_sink(&settings.lead_sink)?;

        info!(
            model = %settings.oracle.model,
            knowledge_rules = knowledge_base.rule_count(),
            "Services initialized"
        );

        Ok(Self {
            intent_oracle,
            knowledge_base: Arc::new(knowledge_base),
            lead_sink,
            oracle_configured,
        })
    }

    /// Health check for all services
    pub fn health_check(&self) -> ServiceHealthStatus {
        ServiceHealthStatus {
            oracle_configured: self.oracle_configured,
            knowledge_rules: self.knowledge_base.rule_count(),
        }
    }
}

impl std::fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceFactory")
            .field("knowledge_base", &self.knowledge_base)
            .field("oracle_configured", &self.oracle_configured)
            .finish_non_exhaustive()
    }
}

/// Health status for all services
#[derive(Debug, Clone, serde::Serialize)]
pub struct ServiceHealthStatus {
    pub oracle_configured: bool,
    pub knowledge_rules: usize,
}

impl ServiceHealthStatus {
    /// The assistant can answer beyond the fallback reply
    pub fn is_healthy(&self) -> bool {
        self.oracle_configured
    }

    /// Get list of degraded services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.oracle_configured {
            issues.push("Intent oracle has no API key".to_string());
        }
        if self.knowledge_rules == 0 {
            issues.push("Knowledge base has no rules".to_string());
        }

        issues
    }
}
