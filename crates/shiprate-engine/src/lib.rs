//! # shiprate-engine — Shipping Rate Engine
//!
//! Quotes an order against a [`RuleSet`](shiprate_rules::RuleSet):
//!
//! - **Shipments** (`shipment.rs`): line items and their aggregate weight,
//!   value, and dimensional weight.
//! - **Zones** (`zone.rs`): rule-based zone resolution with a geographic
//!   fallback.
//! - **Restrictions** (`restriction.rs`): conditions that block a shipment.
//! - **Matching** (`matcher.rs`): which shipping and carrier rules apply.
//! - **Pricing** (`cost.rs`, `surcharge.rs`): option cost from a matched rule.
//! - **Delivery** (`delivery.rs`): transit-day estimates.
//! - **Free shipping** (`free_shipping.rs`): order-level promotions.
//! - **Ranking** (`ranking.rs`): cheapest, fastest, and recommended picks.
//! - **Engine** (`engine.rs`): [`ShippingEngine`], the pipeline tying the
//!   stages together.
//!
//! ## Error Model
//!
//! Business outcomes (no items, restricted destination, no matching rule)
//! are data on [`ShippingCalculationResult`]. [`EngineError`] is reserved for
//! an empty selection and invalid rule configuration.

pub mod cost;
pub mod delivery;
pub mod engine;
pub mod error;
pub mod free_shipping;
pub mod matcher;
pub mod option;
pub mod ranking;
pub mod restriction;
pub mod shipment;
pub mod surcharge;
pub mod zone;

pub use engine::{SelectionCriteria, ShippingEngine, NO_ITEMS_MESSAGE};
pub use error::{EngineError, EngineResult};
pub use option::{
    AppliedSurcharge, CarrierInfo, ShippingCalculationInput, ShippingCalculationResult,
    ShippingOption, FREE_SHIPPING_SUFFIX,
};
pub use ranking::{rank, Ranking};
pub use shipment::{dimensional_weight_kg, total_value, total_weight_kg, Shipment, ShippingItem};
pub use zone::ZoneResolver;
