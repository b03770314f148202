//! Middleware module
//!
//! This module contains middleware for request processing

pub mod logging;

// Re-export commonly used middleware
pub use logging::{LoggingMiddleware, TurnTracker};
