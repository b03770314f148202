//! Request handlers module
//!
//! This module contains the conversation handlers:
//! - Message routing between lead capture, knowledge lookup and fixed replies
//! - HTTP endpoints exposing the chat API

pub mod chat;
pub mod messages;

// Re-export commonly used handler types
pub use chat::{build_app, chat_routes, AppState, ChatRequest, ChatResponse};
pub use messages::{ConversationRouter, RouteOutcome, FALLBACK_REPLY, GREETING_REPLY};
