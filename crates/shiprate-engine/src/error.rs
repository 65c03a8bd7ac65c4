//! # Engine Errors
//!
//! Only structural failures are errors. A shipment that cannot be quoted
//! (no items, a restriction applies, nothing matched) is reported in the
//! [`ShippingCalculationResult`](crate::ShippingCalculationResult) itself.

use shiprate_rules::RuleError;
use thiserror::Error;

/// Errors raised by the shipping engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The calculation produced no option to choose from.
    #[error("no shipping options available")]
    NoOptions,

    /// The rule set handed to the engine failed validation.
    #[error("invalid rule configuration: {0}")]
    Rules(#[from] RuleError),
}

/// Convenience alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;
