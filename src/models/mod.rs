//! Data models module
//!
//! This module contains the data structures shared across the assistant

pub mod intent;
pub mod lead;

// Re-export commonly used models
pub use intent::Intent;
pub use lead::{LeadRecord, LeadField, CapturedLead};
