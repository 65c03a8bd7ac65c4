//! # Rule Sets
//!
//! [`RuleSet`] is the immutable configuration snapshot a shipping engine
//! reads. It is plain data: six ordered lists, one per rule family. Order is
//! significant (zone-rule tie-breaks, first qualifying free-shipping rule), so
//! lists are `Vec`s rather than maps.
//!
//! The [`Rule`] trait ties each family to its slot in the set, which lets the
//! rule store and document loader treat all six families generically.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RuleError, RuleResult};
use crate::rules::{
    CarrierRule, DeliveryTimeRule, FreeShippingRule, ShippingRestriction, ShippingRule, ZoneRule,
};

/// Behaviour shared by every rule family.
pub trait Rule: Clone + std::fmt::Debug {
    /// Human-readable family name used in error messages.
    const KIND: &'static str;

    /// The rule's unique identifier within its family.
    fn id(&self) -> &str;

    /// Check required fields, non-negative amounts, and window ordering.
    fn validate(&self) -> RuleResult<()>;

    /// A secondary key that must also be unique within the family.
    fn unique_key(&self) -> Option<String> {
        None
    }

    /// Whether the rule should be handed to the engine at `now`.
    fn is_active_at(&self, _now: DateTime<Utc>) -> bool {
        true
    }

    /// This family's list inside a rule set.
    fn slot(set: &RuleSet) -> &Vec<Self>;

    /// Mutable access to this family's list inside a rule set.
    fn slot_mut(set: &mut RuleSet) -> &mut Vec<Self>;
}

/// A complete, ordered rule configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub shipping_rules: Vec<ShippingRule>,
    #[serde(default)]
    pub carrier_rules: Vec<CarrierRule>,
    #[serde(default)]
    pub zone_rules: Vec<ZoneRule>,
    #[serde(default)]
    pub delivery_time_rules: Vec<DeliveryTimeRule>,
    #[serde(default)]
    pub restrictions: Vec<ShippingRestriction>,
    #[serde(default)]
    pub free_shipping_rules: Vec<FreeShippingRule>,
}

impl RuleSet {
    /// An empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of rules across all families.
    pub fn rule_count(&self) -> usize {
        self.shipping_rules.len()
            + self.carrier_rules.len()
            + self.zone_rules.len()
            + self.delivery_time_rules.len()
            + self.restrictions.len()
            + self.free_shipping_rules.len()
    }

    /// Whether the set holds no rules at all.
    pub fn is_empty(&self) -> bool {
        self.rule_count() == 0
    }

    /// Validate every rule and check id / key uniqueness in every family.
    ///
    /// Stops at the first violation.
    pub fn validate(&self) -> RuleResult<()> {
        validate_family::<ShippingRule>(self)?;
        validate_family::<CarrierRule>(self)?;
        validate_family::<ZoneRule>(self)?;
        validate_family::<DeliveryTimeRule>(self)?;
        validate_family::<ShippingRestriction>(self)?;
        validate_family::<FreeShippingRule>(self)
    }

    /// A copy holding only rules in force at `now`, order preserved.
    pub fn active_at(&self, now: DateTime<Utc>) -> RuleSet {
        RuleSet {
            shipping_rules: active_family(&self.shipping_rules, now),
            carrier_rules: active_family(&self.carrier_rules, now),
            zone_rules: active_family(&self.zone_rules, now),
            delivery_time_rules: active_family(&self.delivery_time_rules, now),
            restrictions: active_family(&self.restrictions, now),
            free_shipping_rules: active_family(&self.free_shipping_rules, now),
        }
    }
}

fn active_family<T: Rule>(rules: &[T], now: DateTime<Utc>) -> Vec<T> {
    rules
        .iter()
        .filter(|r| r.is_active_at(now))
        .cloned()
        .collect()
}

fn validate_family<T: Rule>(set: &RuleSet) -> RuleResult<()> {
    let mut ids = BTreeSet::new();
    let mut keys: BTreeMap<String, &str> = BTreeMap::new();
    for rule in T::slot(set) {
        rule.validate()?;
        if !ids.insert(rule.id()) {
            return Err(RuleError::Duplicate {
                kind: T::KIND,
                id: rule.id().to_string(),
            });
        }
        if let Some(key) = rule.unique_key() {
            if let Some(existing) = keys.get(&key) {
                return Err(RuleError::DuplicateKey {
                    kind: T::KIND,
                    id: rule.id().to_string(),
                    existing: existing.to_string(),
                    key,
                });
            }
            keys.insert(key, rule.id());
        }
    }
    Ok(())
}
