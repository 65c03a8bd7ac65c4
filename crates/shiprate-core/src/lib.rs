#![deny(missing_docs)]

//! # shiprate-core — Foundational Types for shiprate
//!
//! This crate defines the value types every other crate in the workspace
//! depends on. It has no internal crate dependencies — only `serde`,
//! `thiserror`, and `chrono` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Units are typed.** A [`Weight`] always carries its [`WeightUnit`] and a
//!    [`Dimensions`] its [`DimensionUnit`]; conversion goes through a fixed
//!    pivot (grams, centimeters) so every pair of units is reachable.
//!
//! 2. **Closed vocabularies are enums.** [`Zone`] and [`ShippingMethod`] are
//!    exhaustive; no stringly-typed zone names flow through the engine.
//!
//! 3. **Money is rounded in one place.** [`round_cents`] is the sole path
//!    from a computed cost to a reported cost.
//!
//! 4. **[`ValidationError`] for bad values.** Structured errors with
//!    `thiserror` — no `Box<dyn Error>`, no `.unwrap()` outside tests. Each
//!    higher crate wraps it in its own error enum.

pub mod domain;
pub mod error;
pub mod geo;
pub mod money;
pub mod temporal;
pub mod units;

// Re-export primary types at crate root for ergonomic imports.
pub use domain::{ShippingMethod, Zone};
pub use error::ValidationError;
pub use geo::{distance_km, haversine_km, Address, EARTH_RADIUS_KM};
pub use money::{format_cents, round_cents, to_cents};
pub use temporal::ValidityWindow;
pub use units::{
    convert_dimension, convert_weight, DimensionUnit, Dimensions, Weight, WeightUnit,
};
