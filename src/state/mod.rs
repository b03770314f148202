//! State management module
//!
//! This module handles per-session conversation state and the lead capture flow

pub mod context;
pub mod scenarios;
pub mod storage;

// Re-export commonly used state components
pub use context::{LeadSession, HistoryEntry, SessionSummary};
pub use scenarios::{LeadCaptureMachine, LeadOutcome, LeadStage, StageTransition};
pub use storage::{SessionStore, SessionStoreManager, SessionPolicy, SessionHandle, StoreStats};
