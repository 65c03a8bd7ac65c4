//! # Error Hierarchy
//!
//! Value-level validation errors shared by every shiprate crate, built with
//! `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Business outcomes of a shipping calculation (a restriction applies, no rule
//! matched) are *not* errors. They travel as data on the calculation result.
//! The types here cover structural problems only: malformed values and
//! malformed configuration.

use thiserror::Error;

/// Validation errors for domain value types.
///
/// Each variant carries the offending input so that a misconfigured rule file
/// can be diagnosed from the message alone.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A weight, dimension, cost, or rate was negative.
    #[error("{field} must be non-negative, got {value}")]
    Negative {
        /// Name of the offending field.
        field: String,
        /// The rejected value.
        value: f64,
    },

    /// A numeric field was NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite {
        /// Name of the offending field.
        field: String,
    },

    /// A required string field was empty.
    #[error("{field} must be non-empty")]
    EmptyField {
        /// Name of the offending field.
        field: String,
    },

    /// A validity window starts after it ends.
    #[error("invalid validity window: valid_from {from} is after valid_until {until}")]
    InvertedWindow {
        /// Window start (RFC 3339).
        from: String,
        /// Window end (RFC 3339).
        until: String,
    },

    /// A whole-number field exceeded its upper bound.
    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        /// Name of the offending field.
        field: String,
        /// The rejected value.
        value: u64,
        /// The largest accepted value.
        max: u64,
    },
}

impl ValidationError {
    /// Check that `value` is finite and non-negative.
    pub fn check_non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NotFinite {
                field: field.to_string(),
            });
        }
        if value < 0.0 {
            return Err(ValidationError::Negative {
                field: field.to_string(),
                value,
            });
        }
        Ok(())
    }

    /// Check that `value` does not exceed `max`.
    pub fn check_at_most(field: &str, value: u64, max: u64) -> Result<(), ValidationError> {
        if value > max {
            return Err(ValidationError::TooLarge {
                field: field.to_string(),
                value,
                max,
            });
        }
        Ok(())
    }

    /// Check that a required string is not blank.
    pub fn check_non_empty(field: &str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyField {
                field: field.to_string(),
            });
        }
        Ok(())
    }
}
