//! Lead capture scenario
//!
//! This module defines the lead capture flow as an explicit set of stages and
//! a transition table. The stage is derived from the session on every call,
//! so the session itself stays the single source of truth.

use std::sync::Arc;
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::LeadField;
use crate::services::lead_sink::LeadSink;
use crate::utils::errors::{AutoStreamError, Result};
use crate::utils::logging;
use super::context::LeadSession;

pub const PROMPT_NAME: &str = "Great! Could you please share your name?";
pub const PROMPT_EMAIL: &str = "Thanks! Could you share your email address?";
pub const PROMPT_PLATFORM: &str = "Which platform do you create content on? (YouTube, Instagram, etc.)";
pub const CONFIRMATION: &str = "🎉 You're all set! Our team will reach out to you shortly.";
pub const ALREADY_CAPTURED: &str = "Lead already captured.";

/// Stages of the lead capture flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStage {
    NotEngaged,
    AwaitingName,
    AwaitingEmail,
    AwaitingPlatform,
    Captured,
}

impl LeadStage {
    /// Derive the stage from a session's flags and lead fill state
    pub fn of(session: &LeadSession) -> Self {
        if !session.is_collecting_lead {
            return LeadStage::NotEngaged;
        }

        match session.lead.next_missing() {
            Some(LeadField::Name) => LeadStage::AwaitingName,
            Some(LeadField::Email) => LeadStage::AwaitingEmail,
            Some(LeadField::Platform) => LeadStage::AwaitingPlatform,
            None => LeadStage::Captured,
        }
    }

    /// Field the stage is waiting for
    pub fn awaited_field(&self) -> Option<LeadField> {
        match self {
            LeadStage::AwaitingName => Some(LeadField::Name),
            LeadStage::AwaitingEmail => Some(LeadField::Email),
            LeadStage::AwaitingPlatform => Some(LeadField::Platform),
            LeadStage::NotEngaged | LeadStage::Captured => None,
        }
    }

    /// Prompt shown to a user sitting in this stage
    pub fn prompt(&self) -> &'static str {
        match self {
            LeadStage::NotEngaged => PROMPT_NAME,
            LeadStage::AwaitingName => PROMPT_NAME,
            LeadStage::AwaitingEmail => PROMPT_EMAIL,
            LeadStage::AwaitingPlatform => PROMPT_PLATFORM,
            LeadStage::Captured => ALREADY_CAPTURED,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStage::NotEngaged => "not_engaged",
            LeadStage::AwaitingName => "awaiting_name",
            LeadStage::AwaitingEmail => "awaiting_email",
            LeadStage::AwaitingPlatform => "awaiting_platform",
            LeadStage::Captured => "captured",
        }
    }
}

impl std::fmt::Display for LeadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTransition {
    pub from: LeadStage,
    pub to: LeadStage,
    /// Field the incoming text is stored into, if any
    pub stores: Option<LeadField>,
    /// Whether taking this transition delivers the lead to the sink
    pub delivers_lead: bool,
    pub reply: &'static str,
}

/// Exactly one transition per stage
pub const TRANSITIONS: [StageTransition; 5] = [
    StageTransition {
        from: LeadStage::NotEngaged,
        to: LeadStage::AwaitingName,
        stores: None,
        delivers_lead: false,
        reply: PROMPT_NAME,
    },
    StageTransition {
        from: LeadStage::AwaitingName,
        to: LeadStage::AwaitingEmail,
        stores: Some(LeadField::Name),
        delivers_lead: false,
        reply: PROMPT_EMAIL,
    },
    StageTransition {
        from: LeadStage::AwaitingEmail,
        to: LeadStage::AwaitingPlatform,
        stores: Some(LeadField::Email),
        delivers_lead: false,
        reply: PROMPT_PLATFORM,
    },
    StageTransition {
        from: LeadStage::AwaitingPlatform,
        to: LeadStage::Captured,
        stores: Some(LeadField::Platform),
        delivers_lead: true,
        reply: CONFIRMATION,
    },
    StageTransition {
        from: LeadStage::Captured,
        to: LeadStage::Captured,
        stores: None,
        delivers_lead: false,
        reply: ALREADY_CAPTURED,
    },
];

/// Look up the transition leaving `stage`
pub fn transition_for(stage: LeadStage) -> &'static StageTransition {
    match stage {
        LeadStage::NotEngaged => &TRANSITIONS[0],
        LeadStage::AwaitingName => &TRANSITIONS[1],
        LeadStage::AwaitingEmail => &TRANSITIONS[2],
        LeadStage::AwaitingPlatform => &TRANSITIONS[3],
        LeadStage::Captured => &TRANSITIONS[4],
    }
}

/// Result of advancing the lead capture flow by one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadOutcome {
    pub reply: String,
    pub from: LeadStage,
    pub to: LeadStage,
    /// Set when the lead sink reported a failure
    pub sink_warning: Option<String>,
}

/// Drives a session through the lead capture stages
#[derive(Clone)]
pub struct LeadCaptureMachine {
    sink: Arc<dyn LeadSink>,
}

impl LeadCaptureMachine {
    pub fn new(sink: Arc<dyn LeadSink>) -> Self {
        Self { sink }
    }

    /// Advance `session` by one user message and produce the reply.
    ///
    /// The text that opens the flow is a trigger only and is never stored.
    /// Empty text while a field is awaited re-issues the current prompt; any
    /// other text, whitespace included, is stored as-is.
    /// The sink is called only on the awaiting-platform -> captured step, so
    /// it runs at most once per session.
    pub async fn advance(&self, session: &mut LeadSession, text: &str) -> Result<LeadOutcome> {
        let from = LeadStage::of(session);

        if from.awaited_field().is_some() && text.is_empty() {
            debug!(session_id = %session.session_id, stage = %from, "Empty input, repeating prompt");
            return Ok(LeadOutcome {
                reply: from.prompt().to_string(),
                from,
                to: from,
                sink_warning: None,
            });
        }

        let transition = transition_for(from);

        if from == LeadStage::NotEngaged {
            session.is_collecting_lead = true;
        }

        if let Some(field) = transition.stores {
            session.lead.fill(field, text)?;
        }

        let to = LeadStage::of(session);
        if to != transition.to {
            return Err(AutoStreamError::InvalidStateTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        logging::log_lead_stage(&session.session_id, from.as_str(), to.as_str());

        let mut sink_warning = None;
        if transition.delivers_lead {
            if let Some(captured) = session.lead.to_captured(&session.session_id) {
                logging::log_lead_captured(&session.session_id, &captured.platform);
                if let Err(e) = self.sink.capture(&captured).await {
                    logging::log_sink_failure(&session.session_id, &e);
                    sink_warning = Some(format!("Lead saved but delivery failed: {}", e));
                }
            } else {
                warn!(session_id = %session.session_id, "Captured stage reached with incomplete lead");
            }
        }

        session.touch();

        Ok(LeadOutcome {
            reply: transition.reply.to_string(),
            from,
            to,
            sink_warning,
        })
    }
}

impl std::fmt::Debug for LeadCaptureMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadCaptureMachine").finish_non_exhaustive()
    }
}
