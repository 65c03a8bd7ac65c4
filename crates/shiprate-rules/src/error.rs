//! Rule-configuration error types.
//!
//! Structured errors for rule validation, rule-store mutation, and rule
//! document loading. Every variant names the rule family (`kind`) and, where
//! one exists, the offending rule id so that a bad configuration file can be
//! fixed from the message alone.

use std::path::PathBuf;

use shiprate_core::ValidationError;
use thiserror::Error;

/// Errors raised by rule validation, the rule store, and document loading.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A required field was empty.
    #[error("{kind} {id:?}: field `{field}` must be non-empty")]
    EmptyField {
        kind: &'static str,
        id: String,
        field: &'static str,
    },

    /// A rule with the same id already exists.
    #[error("{kind} {id:?} already exists")]
    Duplicate { kind: &'static str, id: String },

    /// A rule with the same uniqueness key (other than id) already exists.
    #[error("{kind} {id:?} conflicts with {existing:?} on key {key}")]
    DuplicateKey {
        kind: &'static str,
        id: String,
        existing: String,
        key: String,
    },

    /// No rule with the given id exists.
    #[error("{kind} {id:?} not found")]
    NotFound { kind: &'static str, id: String },

    /// The rule's validity window starts after it ends.
    #[error("{kind} {id:?}: {source}")]
    InvalidWindow {
        kind: &'static str,
        id: String,
        source: ValidationError,
    },

    /// A numeric field failed validation.
    #[error("{kind} {id:?}: {source}")]
    InvalidValue {
        kind: &'static str,
        id: String,
        source: ValidationError,
    },

    /// A rule document was written by an incompatible version.
    #[error("unsupported rule document version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// The document extension is neither YAML nor JSON.
    #[error("cannot infer rule document format from {path} (expected .yaml, .yml, or .json)")]
    UnknownFormat { path: PathBuf },

    /// A required file was not found.
    #[error("rule document not found: {path}")]
    FileNotFound { path: PathBuf },

    /// YAML parsing failed.
    #[error("failed to parse YAML at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// JSON parsing failed.
    #[error("failed to parse JSON at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic serde_json error (not file-specific).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic serde_yaml error (not file-specific).
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for rule operations.
pub type RuleResult<T> = Result<T, RuleError>;
