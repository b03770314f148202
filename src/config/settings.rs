//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::state::storage::SessionPolicy;

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub oracle: OracleConfig,
    pub knowledge: KnowledgeConfig,
    pub lead_sink: LeadSinkConfig,
    pub sessions: SessionsConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory of static assets served as the fallback route
    pub static_dir: Option<String>,
    /// Session used when a request omits its identifier
    pub default_session_id: String,
}

/// Intent oracle (Gemini) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OracleConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

/// Knowledge base configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// JSON rule table; the builtin table is used when unset
    pub path: Option<String>,
}

/// Lead sink configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LeadSinkConfig {
    /// Leads are only logged when no webhook is configured
    pub webhook_url: Option<String>,
    pub timeout_seconds: u64,
}

/// Session store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionsConfig {
    pub max_sessions: Option<usize>,
    pub idle_ttl_seconds: Option<u64>,
    pub cleanup_interval_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file
    pub file_path: Option<String>,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("AUTOSTREAM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = settings.try_deserialize()?;

        if settings.oracle.api_key.is_none() {
            settings.oracle.api_key = std::env::var("GOOGLE_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        Ok(settings)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::AutoStreamError> {
        super::validation::validate_settings(self)
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl SessionsConfig {
    /// Build the store policy described by this configuration
    pub fn policy(&self) -> SessionPolicy {
        SessionPolicy {
            max_sessions: self.max_sessions,
            idle_ttl: self.idle_ttl_seconds.map(|secs| chrono::Duration::seconds(secs as i64)),
        }
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            oracle: OracleConfig::default(),
            knowledge: KnowledgeConfig::default(),
            lead_sink: LeadSinkConfig::default(),
            sessions: SessionsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            static_dir: None,
            default_session_id: "default".to_string(),
        }
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.0,
            timeout_seconds: 30,
        }
    }
}

impl Default for LeadSinkConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_seconds: 10,
        }
    }
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_sessions: None,
            idle_ttl_seconds: None,
            cleanup_interval_seconds: 300,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
        }
    }
}
