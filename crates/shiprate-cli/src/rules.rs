//! # Rules Subcommand
//!
//! Validation and export of rule documents.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use shiprate_rules::{load_document, RuleError, RuleSet, RuleStore};

use crate::resolve_now;

/// Arguments for the `shiprate rules` subcommand.
#[derive(Args, Debug)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

/// Rule document operations.
#[derive(Subcommand, Debug)]
pub enum RulesCommand {
    /// Check that a rule document loads and every rule is valid.
    Validate {
        /// Rule document (.yaml, .yml, or .json).
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Re-emit a rule document, as YAML or JSON by output extension.
    Export {
        /// Rule document to read.
        #[arg(value_name = "PATH")]
        path: PathBuf,

        /// Write here instead of printing YAML to stdout.
        #[arg(long, short, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Keep only rules in force at this RFC 3339 instant.
        #[arg(long, value_name = "TIMESTAMP")]
        active_at: Option<String>,
    },
}

/// Execute the rules subcommand.
///
/// Returns exit code: 0 on success, 1 when the document holds invalid rules.
pub fn run_rules(args: &RulesArgs) -> Result<u8> {
    match &args.command {
        RulesCommand::Validate { path } => run_validate(path),
        RulesCommand::Export {
            path,
            output,
            active_at,
        } => run_export(path, output.as_deref(), active_at.as_deref()),
    }
}

/// Whether a load error is a problem with the rules rather than the file.
fn is_rule_violation(err: &RuleError) -> bool {
    matches!(
        err,
        RuleError::EmptyField { .. }
            | RuleError::Duplicate { .. }
            | RuleError::DuplicateKey { .. }
            | RuleError::InvalidWindow { .. }
            | RuleError::InvalidValue { .. }
            | RuleError::UnsupportedVersion { .. }
    )
}

/// Load and validate, separating rule violations (`Ok(Err)`) from I/O and
/// parse failures (`Err`).
fn load_validated(path: &Path) -> Result<std::result::Result<RuleSet, RuleError>> {
    let document = load_document(path).with_context(|| format!("failed to load {}", path.display()))?;
    match document.into_rule_set() {
        Ok(rules) => Ok(Ok(rules)),
        Err(e) if is_rule_violation(&e) => Ok(Err(e)),
        Err(e) => Err(e.into()),
    }
}

fn print_summary(rules: &RuleSet) {
    println!("  shipping rules:        {}", rules.shipping_rules.len());
    println!("  carrier rules:         {}", rules.carrier_rules.len());
    println!("  zone rules:            {}", rules.zone_rules.len());
    println!("  delivery time rules:   {}", rules.delivery_time_rules.len());
    println!("  restrictions:          {}", rules.restrictions.len());
    println!("  free shipping rules:   {}", rules.free_shipping_rules.len());
}

fn run_validate(path: &Path) -> Result<u8> {
    match load_validated(path)? {
        Ok(rules) => {
            println!("OK: {} ({} rules)", path.display(), rules.rule_count());
            print_summary(&rules);
            Ok(0)
        }
        Err(e) => {
            println!("FAIL: {} — {e}", path.display());
            Ok(1)
        }
    }
}

fn run_export(path: &Path, output: Option<&Path>, active_at: Option<&str>) -> Result<u8> {
    let rules = match load_validated(path)? {
        Ok(rules) => rules,
        Err(e) => {
            println!("FAIL: {} — {e}", path.display());
            return Ok(1);
        }
    };
    let store = RuleStore::from_rule_set(rules)?;
    let now = resolve_now(active_at)?;
    let mut document = store.export_document(now);
    if active_at.is_some() {
        document.rules = store.active_snapshot(now);
    }

    match output {
        Some(out) => {
            document
                .save(out)
                .with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(path = %out.display(), rule_count = document.rules.rule_count(), "rules exported");
        }
        None => print!("{}", document.to_yaml_string()?),
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiprate_rules::load_rule_set;

    const VALID: &str = r#"
version: 1
rules:
  shipping_rules:
    - id: ground
      name: Ground
      method: standard
      base_cost: 5.0
    - id: holiday
      name: Holiday Express
      method: express
      flat_rate: 9.99
      valid_until: 2026-01-01T00:00:00Z
"#;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn validate_ok() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "rules.yaml", VALID);
        assert_eq!(run_validate(&path).unwrap(), 0);
    }

    #[test]
    fn validate_reports_rule_violation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "rules.yaml",
            "version: 1\nrules:\n  zone_rules:\n    - {id: a, zone: local}\n    - {id: a, zone: national}\n",
        );
        assert_eq!(run_validate(&path).unwrap(), 1);
    }

    #[test]
    fn validate_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(run_validate(&dir.path().join("absent.yaml")).is_err());
    }

    #[test]
    fn export_active_subset_to_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "rules.yaml", VALID);
        let out = dir.path().join("active.json");
        let code = run_export(&path, Some(&out), Some("2026-06-01T00:00:00Z")).unwrap();
        assert_eq!(code, 0);
        let exported = load_rule_set(&out).unwrap();
        let ids: Vec<&str> = exported.shipping_rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["ground"]);
    }

    #[test]
    fn export_without_filter_keeps_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "rules.yaml", VALID);
        let out = dir.path().join("all.yaml");
        run_export(&path, Some(&out), None).unwrap();
        assert_eq!(load_rule_set(&out).unwrap().shipping_rules.len(), 2);
    }
}
