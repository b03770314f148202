//! Intent model

use serde::{Deserialize, Serialize};

/// Coarse classification of a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    Greeting,
    Info,
    HighIntent,
    /// Any label the oracle returns outside the known set
    Unknown,
}

impl Intent {
    /// Map a raw oracle label onto the closed set of intents
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "GREETING" => Intent::Greeting,
            "INFO" => Intent::Info,
            "HIGH_INTENT" => Intent::HighIntent,
            _ => Intent::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "GREETING",
            Intent::Info => "INFO",
            Intent::HighIntent => "HIGH_INTENT",
            Intent::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
