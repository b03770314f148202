//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{AutoStreamError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_oracle_config(&settings.oracle)?;
    validate_lead_sink_config(&settings.lead_sink)?;
    validate_sessions_config(&settings.sessions)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(AutoStreamError::Config(
            "Server host is required".to_string()
        ));
    }

    if config.port == 0 {
        return Err(AutoStreamError::Config(
            "Server port must be greater than 0".to_string()
        ));
    }

    if config.default_session_id.trim().is_empty() {
        return Err(AutoStreamError::Config(
            "Default session id cannot be empty".to_string()
        ));
    }

    Ok(())
}

/// Validate intent oracle configuration
fn validate_oracle_config(config: &super::OracleConfig) -> Result<()> {
    url::Url::parse(&config.api_url)?;

    if config.model.is_empty() {
        return Err(AutoStreamError::Config(
            "Oracle model is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(AutoStreamError::Config(
            "Oracle timeout must be greater than 0".to_string()
        ));
    }

    if !(0.0..=2.0).contains(&config.temperature) {
        return Err(AutoStreamError::Config(
            format!("Oracle temperature out of range: {}", config.temperature)
        ));
    }

    Ok(())
}

/// Validate lead sink configuration
fn validate_lead_sink_config(config: &super::LeadSinkConfig) -> Result<()> {
    if let Some(ref webhook_url) = config.webhook_url {
        url::Url::parse(webhook_url)?;
    }

    if config.timeout_seconds == 0 {
        return Err(AutoStreamError::Config(
            "Lead sink timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate session store configuration
fn validate_sessions_config(config: &super::SessionsConfig) -> Result<()> {
    if config.max_sessions == Some(0) {
        return Err(AutoStreamError::Config(
            "Max sessions must be greater than 0 when set".to_string()
        ));
    }

    if config.idle_ttl_seconds == Some(0) {
        return Err(AutoStreamError::Config(
            "Idle TTL must be greater than 0 when set".to_string()
        ));
    }

    if config.cleanup_interval_seconds == 0 {
        return Err(AutoStreamError::Config(
            "Cleanup interval must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(AutoStreamError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(AutoStreamError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
