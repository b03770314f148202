//! Lead model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use crate::utils::errors::{AutoStreamError, Result};

/// Fields collected from a prospect, in capture order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadField {
    Name,
    Email,
    Platform,
}

impl LeadField {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadField::Name => "name",
            LeadField::Email => "email",
            LeadField::Platform => "platform",
        }
    }
}

/// The prospect being captured. Fields fill strictly name -> email -> platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    name: Option<String>,
    email: Option<String>,
    platform: Option<String>,
}

impl LeadRecord {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    /// The next field waiting for a value, `None` once the lead is complete
    pub fn next_missing(&self) -> Option<LeadField> {
        if self.name.is_none() {
            Some(LeadField::Name)
        } else if self.email.is_none() {
            Some(LeadField::Email)
        } else if self.platform.is_none() {
            Some(LeadField::Platform)
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.next_missing().is_none()
    }

    /// Store a value for `field`, which must be the next missing one
    pub fn fill(&mut self, field: LeadField, value: impl Into<String>) -> Result<()> {
        match self.next_missing() {
            Some(expected) if expected == field => {}
            expected => {
                return Err(AutoStreamError::InvalidStateTransition {
                    from: expected.map_or("complete", |f| f.as_str()).to_string(),
                    to: field.as_str().to_string(),
                });
            }
        }

        let value = Some(value.into());
        match field {
            LeadField::Name => self.name = value,
            LeadField::Email => self.email = value,
            LeadField::Platform => self.platform = value,
        }
        Ok(())
    }

    /// Snapshot of a complete lead for delivery to a sink
    pub fn to_captured(&self, session_id: &str) -> Option<CapturedLead> {
        Some(CapturedLead {
            name: self.name.clone()?,
            email: self.email.clone()?,
            platform: self.platform.clone()?,
            session_id: session_id.to_string(),
            captured_at: Utc::now(),
        })
    }
}

/// A fully captured lead as handed to the lead sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedLead {
    pub name: String,
    pub email: String,
    pub platform: String,
    pub session_id: String,
    pub captured_at: DateTime<Utc>,
}
