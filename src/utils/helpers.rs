//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use uuid::Uuid;

/// Generate a new UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Truncate text to a maximum number of characters with ellipsis
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Lower-case text for keyword matching
pub fn normalize_query(text: &str) -> String {
    text.to_lowercase()
}

/// Use `session_id` when it is non-blank, `default` otherwise
pub fn resolve_session_id(session_id: Option<&str>, default: &str) -> String {
    session_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .unwrap_or(default)
        .to_string()
}
