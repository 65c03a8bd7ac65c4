//! # shiprate CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shiprate_cli::quote::{run_best, run_quote, BestArgs, QuoteArgs};
use shiprate_cli::rules::{run_rules, RulesArgs};

/// Shipping rate calculator.
///
/// Quotes orders against a YAML or JSON rule document and manages rule
/// documents.
#[derive(Parser, Debug)]
#[command(name = "shiprate", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Quote every shipping option for an order.
    Quote(QuoteArgs),

    /// Pick one option for an order: cheapest, fastest, or recommended.
    Best(BestArgs),

    /// Validate or export rule documents.
    Rules(RulesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("shiprate CLI starting");

    let result = match cli.command {
        Commands::Quote(args) => run_quote(&args),
        Commands::Best(args) => run_best(&args),
        Commands::Rules(args) => run_rules(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
