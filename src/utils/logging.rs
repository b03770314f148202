//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the AutoStream assistant.

use tracing::{info, warn, debug, error};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{AutoStreamError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer and must be held until shutdown.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| AutoStreamError::Config(format!("Invalid log filter: {}", e)))?;

    let (file_layer, guard) = match &config.file_path {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "autostream.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .try_init()
        .map_err(|e| AutoStreamError::Config(format!("Logging already initialized: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log the intent the router acted on
pub fn log_intent_classified(session_id: &str, label: &str, intent: &str, pinned: bool) {
    info!(
        session_id = session_id,
        label = label,
        intent = intent,
        pinned = pinned,
        "Intent resolved"
    );
}

/// Log a lead capture stage change
pub fn log_lead_stage(session_id: &str, from: &str, to: &str) {
    debug!(
        session_id = session_id,
        from = from,
        to = to,
        "Lead stage advanced"
    );
}

/// Log a completed lead capture
pub fn log_lead_captured(session_id: &str, platform: &str) {
    info!(
        session_id = session_id,
        platform = platform,
        "Lead capture completed"
    );
}

/// Log a lead sink delivery failure
pub fn log_sink_failure(session_id: &str, err: &AutoStreamError) {
    if err.is_recoverable() {
        warn!(
            session_id = session_id,
            error = %err,
            severity = %err.severity(),
            "Lead sink delivery failed, lead kept in session"
        );
    } else {
        error!(
            session_id = session_id,
            error = %err,
            severity = %err.severity(),
            "Lead sink delivery failed and will not recover, lead kept in session"
        );
    }
}

/// Log an oracle failure that was degraded to the fallback reply.
///
/// Failures that persist until the configuration changes, such as a missing
/// API key, are logged as errors.
pub fn log_oracle_failure(session_id: &str, err: &AutoStreamError) {
    if err.is_recoverable() {
        warn!(
            session_id = session_id,
            error = %err,
            severity = %err.severity(),
            "Intent oracle failed, using fallback"
        );
    } else {
        error!(
            session_id = session_id,
            error = %err,
            severity = %err.severity(),
            "Intent oracle unusable, using fallback"
        );
    }
}

/// Log a session removed from the store
pub fn log_session_evicted(session_id: &str, reason: &str) {
    info!(
        session_id = session_id,
        reason = reason,
        "Session evicted"
    );
}
