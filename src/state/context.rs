//! Conversation session management
//!
//! This module holds the per-session state of a conversation: the last
//! classified intent, lead-capture progress, and the transcript.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, Duration};

use crate::models::{Intent, LeadRecord};

/// One exchange between the user and the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub user: String,
    pub agent: String,
}

/// Per-conversation state, one per session identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadSession {
    /// Session identifier this state belongs to
    pub session_id: String,
    /// Last intent the router acted on
    pub intent: Option<Intent>,
    /// Set by the first high-intent message and never cleared
    pub is_collecting_lead: bool,
    pub lead: LeadRecord,
    /// Append-only transcript in arrival order
    pub history: Vec<HistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LeadSession {
    /// Create a fresh session
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            intent: None,
            is_collecting_lead: false,
            lead: LeadRecord::default(),
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append one exchange to the transcript
    pub fn record_exchange(&mut self, user: impl Into<String>, agent: impl Into<String>) {
        self.history.push(HistoryEntry {
            user: user.into(),
            agent: agent.into(),
        });
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether the session has been idle for longer than `ttl`
    pub fn is_idle_for(&self, ttl: Duration) -> bool {
        Utc::now() - self.updated_at > ttl
    }

    pub fn is_lead_captured(&self) -> bool {
        self.lead.is_complete()
    }

    /// Create a summary of the session for logging
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            intent: self.intent,
            is_collecting_lead: self.is_collecting_lead,
            lead_captured: self.is_lead_captured(),
            messages: self.history.len(),
            updated_at: self.updated_at,
        }
    }
}

/// Session summary for logging and monitoring
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub intent: Option<Intent>,
    pub is_collecting_lead: bool,
    pub lead_captured: bool,
    pub messages: usize,
    pub updated_at: DateTime<Utc>,
}
