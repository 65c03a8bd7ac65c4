//! # shiprate-cli — Command-Line Front End
//!
//! Provides the `shiprate` command-line interface over the shipping engine.
//!
//! ## Subcommands
//!
//! - `shiprate quote` — every option for an order, ranked.
//! - `shiprate best` — a single option by criteria.
//! - `shiprate rules validate` — check a rule document.
//! - `shiprate rules export` — re-emit a rule document, optionally filtered
//!   to the rules in force at an instant.
//!
//! ```bash
//! shiprate quote --rules rules.yaml --order order.json
//! shiprate best --rules rules.yaml --order order.json --criteria fastest
//! shiprate rules validate rules.yaml
//! ```
//!
//! ## Exit Codes
//!
//! `0` success, `1` business failure (invalid shipment, no options, invalid
//! rules), `2` operational error (unreadable file, bad arguments).

pub mod quote;
pub mod rules;

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use shiprate_engine::ShippingCalculationInput;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// YAML.
    Yaml,
}

/// Load an order (a calculation input) from a JSON or YAML file.
pub fn load_order(path: &Path) -> Result<ShippingCalculationInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read order {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let order = match extension.as_deref() {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("failed to parse order {}", path.display()))?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse order {}", path.display()))?,
        _ => bail!(
            "unsupported order format for {}: expected .json, .yaml, or .yml",
            path.display()
        ),
    };
    Ok(order)
}

/// The evaluation instant: `at` parsed as RFC 3339, or now.
pub fn resolve_now(at: Option<&str>) -> Result<DateTime<Utc>> {
    match at {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("invalid --at timestamp: {s}"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

/// Render `value` as JSON or YAML.
pub fn render<T: serde::Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Json | OutputFormat::Text => serde_json::to_string_pretty(value)?,
    })
}
