//! # Quote Subcommands
//!
//! `shiprate quote` prints every option for an order; `shiprate best` prints
//! the one option chosen by a selection criterion.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use shiprate_core::{format_cents, to_cents};
use shiprate_engine::{
    EngineError, SelectionCriteria, ShippingCalculationResult, ShippingEngine, ShippingOption,
};
use shiprate_rules::load_rule_set;

use crate::{load_order, render, resolve_now, OutputFormat};

/// Arguments shared by the quoting subcommands.
#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Rule document (.yaml, .yml, or .json).
    #[arg(long, value_name = "PATH")]
    pub rules: PathBuf,

    /// Order to quote (.yaml, .yml, or .json).
    #[arg(long, value_name = "PATH")]
    pub order: PathBuf,

    /// Evaluate as of this RFC 3339 instant instead of now.
    #[arg(long, value_name = "TIMESTAMP")]
    pub at: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for `shiprate best`.
#[derive(Args, Debug)]
pub struct BestArgs {
    #[command(flatten)]
    pub quote: QuoteArgs,

    /// cheapest, fastest, or recommended. Anything else means recommended.
    #[arg(long, default_value = "recommended")]
    pub criteria: String,
}

fn load_engine(args: &QuoteArgs) -> Result<ShippingEngine> {
    let rules = load_rule_set(&args.rules)
        .with_context(|| format!("failed to load rules from {}", args.rules.display()))?;
    Ok(ShippingEngine::new(rules))
}

fn money(amount: f64) -> String {
    to_cents(amount)
        .map(format_cents)
        .unwrap_or_else(|| amount.to_string())
}

/// One line per option, with its selection tags.
pub fn format_option(option: &ShippingOption, tags: &[&str]) -> String {
    let mut line = format!(
        "  {:<24} {:<32} {:>10}  {:>2} day(s)",
        option.id,
        option.service_name,
        money(option.cost),
        option.estimated_days
    );
    for tag in tags {
        let _ = write!(line, " [{tag}]");
    }
    line
}

/// Human-readable summary of a calculation.
pub fn format_result(result: &ShippingCalculationResult) -> String {
    let mut out = String::new();
    if !result.is_valid {
        let _ = writeln!(
            out,
            "INVALID: {}",
            result.error_message.as_deref().unwrap_or("unknown error")
        );
        return out;
    }

    let zone = result.zone.map(|z| z.to_string()).unwrap_or_default();
    let distance = result
        .distance_km
        .map(|d| format!("{d:.1} km"))
        .unwrap_or_else(|| "unknown".to_string());
    let _ = writeln!(
        out,
        "Zone: {zone}  Distance: {distance}  Weight: {:.2} kg  Value: {}",
        result.total_weight_kg,
        money(result.total_value)
    );

    let is = |pick: &Option<ShippingOption>, option: &ShippingOption| {
        pick.as_ref().map_or(false, |p| p.id == option.id)
    };
    for option in &result.options {
        let mut tags = Vec::new();
        if is(&result.cheapest, option) {
            tags.push("cheapest");
        }
        if is(&result.fastest, option) {
            tags.push("fastest");
        }
        if is(&result.recommended, option) {
            tags.push("recommended");
        }
        let _ = writeln!(out, "{}", format_option(option, &tags));
    }
    for warning in &result.warnings {
        let _ = writeln!(out, "WARN: {warning}");
    }
    out
}

/// Execute `shiprate quote`.
///
/// Returns exit code: 0 for a valid quote, 1 for an invalid shipment.
pub fn run_quote(args: &QuoteArgs) -> Result<u8> {
    let engine = load_engine(args)?;
    let order = load_order(&args.order)?;
    let now = resolve_now(args.at.as_deref())?;

    let result = engine.calculate_at(&order, now);
    match args.format {
        OutputFormat::Text => print!("{}", format_result(&result)),
        other => println!("{}", render(&result, other)?),
    }

    Ok(if result.is_valid { 0 } else { 1 })
}

/// Execute `shiprate best`.
///
/// Returns exit code: 0 when an option was chosen, 1 when there was none.
pub fn run_best(args: &BestArgs) -> Result<u8> {
    let engine = load_engine(&args.quote)?;
    let order = load_order(&args.quote.order)?;
    let now = resolve_now(args.quote.at.as_deref())?;
    let criteria: SelectionCriteria = args.criteria.parse().unwrap_or_default();

    match engine.calculate_best_option_at(&order, criteria, now) {
        Ok(option) => {
            match args.quote.format {
                OutputFormat::Text => println!("{}", format_option(&option, &[criteria.as_str()])),
                other => println!("{}", render(&option, other)?),
            }
            Ok(0)
        }
        Err(EngineError::NoOptions) => {
            println!("{}", EngineError::NoOptions);
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}
