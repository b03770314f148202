//! Error handling for AutoStream
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the AutoStream assistant
#[derive(Error, Debug)]
pub enum AutoStreamError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Intent oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("Lead sink error: {0}")]
    LeadSink(#[from] LeadSinkError),

    #[error("Session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Intent oracle specific errors
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Oracle request failed: {0}")]
    RequestFailed(String),

    #[error("Oracle request timed out")]
    Timeout,

    #[error("Invalid oracle response: {0}")]
    InvalidResponse(String),

    #[error("Oracle service unavailable")]
    ServiceUnavailable,

    #[error("Oracle API key is not configured")]
    MissingApiKey,
}

/// Lead sink specific errors
#[derive(Error, Debug)]
pub enum LeadSinkError {
    #[error("Lead delivery failed: {0}")]
    RequestFailed(String),

    #[error("Lead delivery timed out")]
    Timeout,

    #[error("Lead rejected by sink: {0}")]
    Rejected(String),
}

/// Result type alias for AutoStream operations
pub type Result<T> = std::result::Result<T, AutoStreamError>;

impl AutoStreamError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            AutoStreamError::Config(_) => false,
            AutoStreamError::Oracle(OracleError::MissingApiKey) => false,
            AutoStreamError::Oracle(_) => true,
            AutoStreamError::LeadSink(_) => true,
            AutoStreamError::SessionNotFound { .. } => false,
            AutoStreamError::InvalidStateTransition { .. } => false,
            AutoStreamError::Http(_) => true,
            AutoStreamError::Serialization(_) => false,
            AutoStreamError::Io(_) => true,
            AutoStreamError::UrlParse(_) => false,
            AutoStreamError::InvalidInput(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AutoStreamError::Config(_) => ErrorSeverity::Critical,
            AutoStreamError::InvalidStateTransition { .. } => ErrorSeverity::Critical,
            AutoStreamError::Oracle(_) => ErrorSeverity::Warning,
            AutoStreamError::LeadSink(_) => ErrorSeverity::Warning,
            AutoStreamError::SessionNotFound { .. } => ErrorSeverity::Info,
            AutoStreamError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
