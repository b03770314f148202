//! AutoStream sales assistant
//!
//! A conversational sales assistant for the AutoStream video platform.
//! This library classifies user messages by intent, answers product questions
//! from a keyword knowledge base, and walks high-intent users through a
//! name, email, platform lead capture before handing the lead to a sink.

#![allow(non_snake_case)]

pub mod config;
pub mod handlers;
pub mod services;
pub mod models;
pub mod state;
pub mod utils;
pub mod middleware;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{AutoStreamError, Result};

// Re-export main components for easy access
pub use handlers::{AppState, ConversationRouter};
pub use services::ServiceFactory;
pub use state::{LeadCaptureMachine, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
