//! Logging middleware
//!
//! This module provides request logging for chat turns: what arrived, which
//! session it belonged to, and how long the turn took.

use std::time::Instant;
use tracing::{info, debug, warn, Span};

use crate::state::SessionSummary;
use crate::utils::helpers::{generate_uuid, truncate_text};

/// Longest message excerpt written to the log
const MESSAGE_EXCERPT_CHARS: usize = 80;

/// Turns slower than this are logged as warnings
const SLOW_TURN_MS: u128 = 5_000;

/// Logging middleware for chat requests
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    log_messages: bool,
    log_performance: bool,
}

impl LoggingMiddleware {
    /// Create a new LoggingMiddleware instance
    pub fn new(log_messages: bool, log_performance: bool) -> Self {
        Self {
            log_messages,
            log_performance,
        }
    }

    /// Log an incoming chat message and start timing the turn
    pub fn start_turn(&self, session_id: &str, message: &str) -> TurnTracker {
        let request_id = generate_uuid();

        if self.log_messages {
            info!(
                request_id = %request_id,
                session_id = session_id,
                message_chars = message.chars().count(),
                "Chat message received"
            );
            debug!(
                request_id = %request_id,
                text = %truncate_text(message, MESSAGE_EXCERPT_CHARS),
                "Chat message text"
            );
        }

        TurnTracker::new(request_id, session_id.to_string(), self.log_performance)
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new(true, true)
    }
}

/// Measures a single chat turn
///
/// The tracker lives across await points in the HTTP handler, so its span is
/// attached with `Instrument` rather than entered.
pub struct TurnTracker {
    request_id: String,
    session_id: String,
    log_performance: bool,
    start_time: Instant,
    span: Span,
}

impl TurnTracker {
    fn new(request_id: String, session_id: String, log_performance: bool) -> Self {
        let span = tracing::info_span!("chat_turn", request_id = %request_id, session_id = %session_id);

        Self {
            request_id,
            session_id,
            log_performance,
            start_time: Instant::now(),
            span,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// Span carrying the request and session ids of this turn
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Finish the turn and log its latency with the resulting session state
    pub fn complete(self, summary: &SessionSummary, warnings: usize) {
        if !self.log_performance {
            return;
        }

        let duration_ms = self.start_time.elapsed().as_millis();
        let intent = summary.intent.map_or("NONE", |intent| intent.as_str());

        if duration_ms > SLOW_TURN_MS {
            warn!(
                request_id = %self.request_id,
                session_id = %self.session_id,
                intent = intent,
                duration_ms = duration_ms,
                "Slow chat turn"
            );
        } else {
            info!(
                request_id = %self.request_id,
                session_id = %self.session_id,
                intent = intent,
                collecting_lead = summary.is_collecting_lead,
                lead_captured = summary.lead_captured,
                messages = summary.messages,
                warnings = warnings,
                duration_ms = duration_ms,
                "Chat turn completed"
            );
        }
    }
}
