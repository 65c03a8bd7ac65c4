//! # Rule Documents
//!
//! Versioned, typed import/export of a complete [`RuleSet`] as YAML or JSON.
//!
//! A document carries a format `version` alongside the rules. Loading rejects
//! any version other than [`RULE_DOCUMENT_VERSION`] and validates every rule,
//! so a document that loads is a document the engine can run.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RuleError, RuleResult};
use crate::ruleset::RuleSet;

/// The rule document format version written and accepted by this crate.
pub const RULE_DOCUMENT_VERSION: u32 = 1;

/// Serialization format of a rule document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> RuleResult<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(RuleError::UnknownFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// A serialized rule configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rules: RuleSet,
}

impl RuleDocument {
    /// Wrap a rule set in a current-version document.
    pub fn new(rules: RuleSet, exported_at: Option<DateTime<Utc>>) -> Self {
        Self {
            version: RULE_DOCUMENT_VERSION,
            exported_at,
            rules,
        }
    }

    /// Check the version and every rule, returning the rule set.
    pub fn into_rule_set(self) -> RuleResult<RuleSet> {
        if self.version != RULE_DOCUMENT_VERSION {
            return Err(RuleError::UnsupportedVersion {
                found: self.version,
                expected: RULE_DOCUMENT_VERSION,
            });
        }
        self.rules.validate()?;
        Ok(self.rules)
    }

    /// Parse a YAML document.
    pub fn from_yaml_str(content: &str) -> RuleResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parse a JSON document.
    pub fn from_json_str(content: &str) -> RuleResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Render as YAML.
    pub fn to_yaml_string(&self) -> RuleResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json_string(&self) -> RuleResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document to `path`, choosing the format by extension.
    pub fn save(&self, path: &Path) -> RuleResult<()> {
        let content = match DocumentFormat::from_path(path)? {
            DocumentFormat::Yaml => self.to_yaml_string()?,
            DocumentFormat::Json => self.to_json_string()?,
        };
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Load a rule document from `path`, choosing the format by extension.
///
/// The document is parsed but not validated; call
/// [`RuleDocument::into_rule_set`] (or use [`load_rule_set`]) for that.
pub fn load_document(path: &Path) -> RuleResult<RuleDocument> {
    let format = DocumentFormat::from_path(path)?;
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RuleError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            RuleError::Io(e)
        }
    })?;
    match format {
        DocumentFormat::Yaml => serde_yaml::from_str(&content).map_err(|e| RuleError::YamlParse {
            path: path.to_path_buf(),
            source: e,
        }),
        DocumentFormat::Json => serde_json::from_str(&content).map_err(|e| RuleError::JsonParse {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Load and validate the rule set stored at `path`.
pub fn load_rule_set(path: &Path) -> RuleResult<RuleSet> {
    let rules = load_document(path)?.into_rule_set()?;
    tracing::info!(
        path = %path.display(),
        rule_count = rules.rule_count(),
        "loaded rule document"
    );
    Ok(rules)
}
