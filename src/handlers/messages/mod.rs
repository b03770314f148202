//! Message handlers module
//!
//! Routes each incoming user message to the lead capture flow, the knowledge
//! base, or one of the fixed conversational replies.

use std::sync::Arc;
use tracing::{debug, error};

use crate::models::Intent;
use crate::services::{IntentOracle, KnowledgeBase, ServiceFactory};
use crate::state::{LeadCaptureMachine, LeadSession};
use crate::utils::logging;

pub const GREETING_REPLY: &str =
    "Hello! I'm the AutoStream assistant. How can I help you with our video tools today?";
pub const FALLBACK_REPLY: &str =
    "I'm not sure I understand. I can help with pricing, support, or setting up a Pro account!";

/// Reply produced for one routed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOutcome {
    pub reply: String,
    /// Intent the message was dispatched on
    pub intent: Intent,
    /// Non-fatal problems the caller may surface
    pub warnings: Vec<String>,
}

/// Glue between the session, the intent oracle and the reply sources
#[derive(Clone)]
pub struct ConversationRouter {
    oracle: Arc<dyn IntentOracle>,
    knowledge: Arc<KnowledgeBase>,
    machine: LeadCaptureMachine,
}

impl ConversationRouter {
    pub fn new(
        oracle: Arc<dyn IntentOracle>,
        knowledge: Arc<KnowledgeBase>,
        machine: LeadCaptureMachine,
    ) -> Self {
        Self { oracle, knowledge, machine }
    }

    /// Create a router over the services of a factory
    pub fn from_services(services: &ServiceFactory) -> Self {
        Self::new(
            services.intent_oracle.clone(),
            services.knowledge_base.clone(),
            LeadCaptureMachine::new(services.lead_sink.clone()),
        )
    }

    /// Handle one user message for `session`.
    ///
    /// Never fails: every branch yields a reply and exactly one history entry
    /// is appended.
    pub async fn route(&self, session: &mut LeadSession, text: &str) -> RouteOutcome {
        let intent = self.resolve_intent(session, text).await;
        session.intent = Some(intent);

        let mut warnings = Vec::new();
        let reply = match intent {
            Intent::HighIntent => match self.machine.advance(session, text).await {
                Ok(outcome) => {
                    warnings.extend(outcome.sink_warning);
                    outcome.reply
                }
                Err(e) => {
                    error!(session_id = %session.session_id, error = %e, severity = %e.severity(), "Lead capture failed");
                    FALLBACK_REPLY.to_string()
                }
            },
            Intent::Info => self.knowledge.lookup(text).to_string(),
            Intent::Greeting => GREETING_REPLY.to_string(),
            Intent::Unknown => FALLBACK_REPLY.to_string(),
        };

        session.record_exchange(text, reply.as_str());
        debug!(session_id = %session.session_id, history = session.history.len(), "Exchange recorded");

        RouteOutcome { reply, intent, warnings }
    }

    /// Pinned to high intent while a lead is being collected, classified otherwise
    async fn resolve_intent(&self, session: &LeadSession, text: &str) -> Intent {
        if session.is_collecting_lead {
            logging::log_intent_classified(&session.session_id, "", Intent::HighIntent.as_str(), true);
            return Intent::HighIntent;
        }

        match self.oracle.classify(text).await {
            Ok(label) => {
                let intent = Intent::from_label(&label);
                logging::log_intent_classified(&session.session_id, &label, intent.as_str(), false);
                intent
            }
            Err(e) => {
                logging::log_oracle_failure(&session.session_id, &e);
                Intent::Unknown
            }
        }
    }
}

impl std::fmt::Debug for ConversationRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationRouter")
            .field("knowledge", &self.knowledge)
            .field("machine", &self.machine)
            .finish_non_exhaustive()
    }
}
