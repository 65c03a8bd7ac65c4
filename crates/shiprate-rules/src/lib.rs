//! # shiprate-rules — Rule Configuration
//!
//! Everything the shipping engine is *configured with*, as opposed to what it
//! computes:
//!
//! - **Rule families** (`rules.rs`): shipping, carrier, zone, delivery-time,
//!   restriction, and free-shipping rules, each with its own validation.
//!
//! - **Rule sets** (`ruleset.rs`): [`RuleSet`], the immutable snapshot an
//!   engine reads, and the [`Rule`] trait that lets all six families be
//!   handled generically.
//!
//! - **Rule store** (`store.rs`): [`RuleStore`], validated CRUD over a rule
//!   set with an active-at-time snapshot accessor.
//!
//! - **Documents** (`document.rs`): versioned YAML/JSON import and export.
//!
//! ## Crate Policy
//!
//! - Depends only on `shiprate-core` internally.
//! - No rule is ever stored or returned from a load without passing
//!   validation.

pub mod document;
pub mod error;
pub mod rules;
pub mod ruleset;
pub mod store;

pub use document::{load_document, load_rule_set, DocumentFormat, RuleDocument, RULE_DOCUMENT_VERSION};
pub use error::{RuleError, RuleResult};
pub use rules::{
    CarrierRule, DeliveryTimeRule, FreeShippingRule, PostalRange, RestrictionType, MAX_TRANSIT_DAYS,
    ShippingRestriction, ShippingRule, Surcharge, SurchargeKind, ZoneRule,
};
pub use ruleset::{Rule, RuleSet};
pub use store::RuleStore;
