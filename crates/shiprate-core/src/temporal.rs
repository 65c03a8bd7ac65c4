//! # Validity Windows
//!
//! Half-open `[valid_from, valid_until)` time ranges in UTC. An unset bound
//! leaves that side of the window open.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A half-open UTC time range during which a rule is in force.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityWindow {
    /// First instant the rule applies (inclusive). `None` = since forever.
    #[serde(default)]
    pub valid_from: Option<DateTime<Utc>>,
    /// First instant the rule no longer applies (exclusive). `None` = forever.
    #[serde(default)]
    pub valid_until: Option<DateTime<Utc>>,
}

impl ValidityWindow {
    /// A window open on both sides.
    pub fn always() -> Self {
        Self::default()
    }

    /// A window with both bounds set. Rejects `from > until`.
    pub fn between(from: DateTime<Utc>, until: DateTime<Utc>) -> Result<Self, ValidationError> {
        let window = Self {
            valid_from: Some(from),
            valid_until: Some(until),
        };
        window.validate()?;
        Ok(window)
    }

    /// Check that the window is not inverted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let (Some(from), Some(until)) = (self.valid_from, self.valid_until) {
            if from > until {
                return Err(ValidationError::InvertedWindow {
                    from: from.to_rfc3339(),
                    until: until.to_rfc3339(),
                });
            }
        }
        Ok(())
    }

    /// Whether `now` falls inside the window.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        if let Some(from) = self.valid_from {
            if now < from {
                return false;
            }
        }
        if let Some(until) = self.valid_until {
            if now >= until {
                return false;
            }
        }
        true
    }
}
