//! # Shipping Engine
//!
//! Runs one calculation as a single pass over an owned rule snapshot:
//!
//! ```text
//! validate items ─▶ resolve zone ─▶ check restrictions ─▶ price shipping rules
//!        │                                 │              (or the default option)
//!        ▼                                 ▼                        │
//!     invalid                           invalid                     ▼
//!                                                          price carrier rules
//!                                                                   │
//!                                                                   ▼
//!                                                  apply free shipping ─▶ rank ─▶ valid
//! ```
//!
//! The engine holds no mutable state. Every calculation reads the same
//! [`RuleSet`], so one engine can serve concurrent callers; swap in a new
//! engine to change rules.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shiprate_core::distance_km;
use shiprate_rules::{RuleSet, RuleStore};

use crate::cost::{default_option, price_carrier_rule, price_shipping_rule};
use crate::delivery::DeliveryEstimator;
use crate::error::{EngineError, EngineResult};
use crate::free_shipping::apply_free_shipping;
use crate::matcher::{carrier_rule_applies, shipping_rule_applies};
use crate::option::{ShippingCalculationInput, ShippingCalculationResult, ShippingOption};
use crate::ranking::{rank, sort_by_cost};
use crate::restriction::{check_restrictions, MESSAGE_SEPARATOR};
use crate::shipment::Shipment;
use crate::zone::ZoneResolver;

/// Error message for a request without items.
pub const NO_ITEMS_MESSAGE: &str = "no items to ship";

/// Warning added when shipping rules exist but none applies.
pub const NO_SHIPPING_RULE_MATCHED: &str = "no shipping rules matched the shipment";

/// Warning added when carrier rules exist but none can take the shipment.
pub const NO_CARRIER_RULE_MATCHED: &str = "no carrier rules matched the shipment";

// ---------------------------------------------------------------------------
// Selection criteria
// ---------------------------------------------------------------------------

/// Which option [`ShippingEngine::calculate_best_option`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCriteria {
    Cheapest,
    Fastest,
    #[default]
    Recommended,
}

impl SelectionCriteria {
    /// Return the string representation of this criterion.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cheapest => "cheapest",
            Self::Fastest => "fastest",
            Self::Recommended => "recommended",
        }
    }

    /// Return all criteria.
    pub fn all() -> &'static [SelectionCriteria] {
        &[Self::Cheapest, Self::Fastest, Self::Recommended]
    }
}

impl std::fmt::Display for SelectionCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsing never fails: unknown criteria mean [`SelectionCriteria::Recommended`].
impl FromStr for SelectionCriteria {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "cheapest" => Self::Cheapest,
            "fastest" => Self::Fastest,
            _ => Self::Recommended,
        })
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Computes shipping quotes against an owned rule snapshot.
#[derive(Clone, Default)]
pub struct ShippingEngine {
    rules: RuleSet,
}

impl ShippingEngine {
    /// An engine over `rules`, taken as already validated.
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    /// An engine over `rules` after validating them.
    pub fn validated(rules: RuleSet) -> EngineResult<Self> {
        rules.validate()?;
        Ok(Self::new(rules))
    }

    /// An engine over the rules `store` holds in force at `now`.
    pub fn from_store(store: &RuleStore, now: DateTime<Utc>) -> Self {
        Self::new(store.active_snapshot(now))
    }

    /// The rule snapshot this engine reads.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Quote `input` as of the current time.
    pub fn calculate(&self, input: &ShippingCalculationInput) -> ShippingCalculationResult {
        self.calculate_at(input, Utc::now())
    }

    /// Quote `input` as of `now`.
    ///
    /// Never fails: a shipment that cannot be quoted comes back with
    /// `is_valid = false` and an `error_message`.
    pub fn calculate_at(&self, input: &ShippingCalculationInput, now: DateTime<Utc>) -> ShippingCalculationResult {
        let mut result = ShippingCalculationResult::new(now);

        if input.items.is_empty() {
            tracing::warn!(calculation_id = %result.calculation_id, "calculation rejected: no items");
            return result.invalidate(NO_ITEMS_MESSAGE);
        }
        for item in &input.items {
            if let Err(e) = item.validate() {
                tracing::warn!(calculation_id = %result.calculation_id, item = %item.id, error = %e, "calculation rejected: invalid item");
                return result.invalidate(format!("item {}: {e}", item.id));
            }
        }

        let distance = distance_km(&input.origin, &input.destination);
        let zone = ZoneResolver::new(&self.rules.zone_rules).resolve(&input.origin, &input.destination, distance);
        let shipment = Shipment::new(&input.items, &input.origin, &input.destination, zone, distance, now);

        result.zone = Some(zone);
        result.distance_km = distance;
        result.total_weight_kg = shipment.total_weight_kg;
        result.total_value = shipment.total_value;
        result.dimensional_weight_kg = shipment.dimensional_weight_kg;

        let blocked = check_restrictions(&input.items, &input.destination, &self.rules.restrictions);
        if !blocked.is_empty() {
            tracing::warn!(
                calculation_id = %result.calculation_id,
                restrictions = blocked.len(),
                "calculation rejected: restricted shipment"
            );
            return result.invalidate(blocked.join(MESSAGE_SEPARATOR));
        }

        let mut options = self.price_options(&shipment, &mut result.warnings);
        result.free_shipping_rule = apply_free_shipping(&mut options, &self.rules.free_shipping_rules, &shipment);

        let ranking = rank(&options);
        result.cheapest = ranking.cheapest.map(|i| options[i].clone());
        result.fastest = ranking.fastest.map(|i| options[i].clone());
        result.recommended = ranking.recommended.map(|i| options[i].clone());
        sort_by_cost(&mut options);
        result.options = options;

        tracing::info!(
            calculation_id = %result.calculation_id,
            zone = %zone,
            options = result.options.len(),
            free_shipping = result.free_shipping_rule.is_some(),
            "shipping calculated"
        );
        result
    }

    /// Priced options from shipping rules (or the default) then carriers.
    fn price_options(&self, shipment: &Shipment<'_>, warnings: &mut Vec<String>) -> Vec<ShippingOption> {
        let estimator = DeliveryEstimator::new(&self.rules.delivery_time_rules);
        let mut options = Vec::new();

        if self.rules.shipping_rules.is_empty() {
            options.push(default_option(shipment));
        } else {
            options.extend(
                self.rules
                    .shipping_rules
                    .iter()
                    .filter(|rule| shipping_rule_applies(rule, shipment))
                    .map(|rule| price_shipping_rule(rule, shipment, &estimator)),
            );
            if options.is_empty() {
                tracing::warn!(zone = %shipment.zone, "no shipping rule matched");
                warnings.push(NO_SHIPPING_RULE_MATCHED.to_string());
            }
        }

        let before = options.len();
        options.extend(
            self.rules
                .carrier_rules
                .iter()
                .filter(|rule| carrier_rule_applies(rule, shipment))
                .map(|rule| price_carrier_rule(rule, shipment, &estimator)),
        );
        if !self.rules.carrier_rules.is_empty() && options.len() == before {
            warnings.push(NO_CARRIER_RULE_MATCHED.to_string());
        }
        options
    }

    /// The single option matching `criteria`, as of the current time.
    pub fn calculate_best_option(
        &self,
        input: &ShippingCalculationInput,
        criteria: SelectionCriteria,
    ) -> EngineResult<ShippingOption> {
        self.calculate_best_option_at(input, criteria, Utc::now())
    }

    /// The single option matching `criteria`, as of `now`.
    ///
    /// Fails with [`EngineError::NoOptions`] when the calculation is invalid
    /// or produced no options.
    pub fn calculate_best_option_at(
        &self,
        input: &ShippingCalculationInput,
        criteria: SelectionCriteria,
        now: DateTime<Utc>,
    ) -> EngineResult<ShippingOption> {
        let result = self.calculate_at(input, now);
        let picked = match criteria {
            SelectionCriteria::Cheapest => result.cheapest,
            SelectionCriteria::Fastest => result.fastest,
            SelectionCriteria::Recommended => result.recommended,
        };
        picked.ok_or(EngineError::NoOptions)
    }
}

impl std::fmt::Debug for ShippingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShippingEngine")
            .field("shipping_rules", &self.rules.shipping_rules.len())
            .field("carrier_rules", &self.rules.carrier_rules.len())
            .field("zone_rules", &self.rules.zone_rules.len())
            .field("total_rules", &self.rules.rule_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shipment::ShippingItem;
    use chrono::TimeZone;
    use shiprate_core::{Address, ShippingMethod, Weight, Zone};
    use shiprate_rules::{
        CarrierRule, DeliveryTimeRule, FreeShippingRule, ShippingRestriction, ShippingRule, ZoneRule,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 11, 10, 0, 0).unwrap()
    }

    fn input(items: Vec<ShippingItem>) -> ShippingCalculationInput {
        ShippingCalculationInput::new(
            items,
            Address::new("Los Angeles", "CA", "90001", "US").with_coordinates(34.0522, -118.2437),
            Address::new("New York", "NY", "10001", "US").with_coordinates(40.7128, -74.0060),
        )
    }

    fn parcel() -> ShippingItem {
        ShippingItem::new("sku-1", Weight::kg(2.0), 40.0)
    }

    fn rules() -> RuleSet {
        let mut rules = RuleSet::new();
        rules.shipping_rules.push(
            ShippingRule::new("ground", "Ground", ShippingMethod::Standard).with_pricing(5.0, 1.0),
        );
        rules.shipping_rules.push(
            ShippingRule::new("express", "Express", ShippingMethod::Express).with_pricing(15.0, 2.0),
        );
        rules
    }

    #[test]
    fn empty_items_is_invalid() {
        let result = ShippingEngine::new(rules()).calculate_at(&input(vec![]), now());
        assert!(!result.is_valid);
        assert_eq!(result.error_message.as_deref(), Some(NO_ITEMS_MESSAGE));
        assert!(result.options.is_empty());
        assert!(result.zone.is_none());
    }

    #[test]
    fn negative_item_weight_is_invalid() {
        let item = ShippingItem::new("bad", Weight::kg(-1.0), 1.0);
        let result = ShippingEngine::new(rules()).calculate_at(&input(vec![item]), now());
        assert!(!result.is_valid);
        assert!(result.error_message.unwrap().starts_with("item bad:"));
    }

    #[test]
    fn prices_matching_rules_and_ranks() {
        let result = ShippingEngine::new(rules()).calculate_at(&input(vec![parcel()]), now());
        assert!(result.is_valid);
        assert_eq!(result.zone, Some(Zone::National));
        let distance = result.distance_km.unwrap();
        assert!((3935.0..=3945.0).contains(&distance));
        assert_eq!(result.options.len(), 2);
        assert_eq!(result.options[0].cost, 7.0);
        assert_eq!(result.options[1].cost, 19.0);
        assert_eq!(result.cheapest.as_ref().unwrap().id, "rule-ground");
        assert_eq!(result.fastest.as_ref().unwrap().id, "rule-express");
        assert_eq!(result.recommended.as_ref().unwrap().id, "rule-ground");
    }

    #[test]
    fn restriction_short_circuits() {
        let mut rules = rules();
        rules
            .restrictions
            .push(ShippingRestriction::hazardous("hz", "hazardous goods not accepted"));
        rules
            .restrictions
            .push(ShippingRestriction::destination("us", &["US"], "domestic shipping paused"));
        let result = ShippingEngine::new(rules).calculate_at(&input(vec![parcel().hazardous()]), now());
        assert!(!result.is_valid);
        assert!(result.options.is_empty());
        assert_eq!(
            result.error_message.as_deref(),
            Some("hazardous goods not accepted; domestic shipping paused")
        );
        // Aggregates are still reported.
        assert_eq!(result.zone, Some(Zone::National));
    }

    #[test]
    fn no_shipping_rules_yields_default_option() {
        let result = ShippingEngine::new(RuleSet::new()).calculate_at(&input(vec![parcel()]), now());
        assert!(result.is_valid);
        assert_eq!(result.options.len(), 1);
        assert_eq!(result.options[0].id, "default-standard");
        assert_eq!(result.options[0].cost, 10.0);
        assert_eq!(result.options[0].estimated_days, 5);
    }

    #[test]
    fn default_option_sits_alongside_carriers() {
        let mut rules = RuleSet::new();
        rules.carrier_rules.push(
            CarrierRule::new("fedex", "fedex", "FedEx", ShippingMethod::Overnight)
                .with_pricing(25.0, 0.0)
                .with_delivery_days(1),
        );
        let result = ShippingEngine::new(rules).calculate_at(&input(vec![parcel()]), now());
        let ids: Vec<&str> = result.options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["default-standard", "carrier-fedex"]);
        assert_eq!(result.fastest.unwrap().id, "carrier-fedex");
    }

    #[test]
    fn unmatched_rules_give_warning_and_empty_options() {
        let mut rules = RuleSet::new();
        rules
            .shipping_rules
            .push(ShippingRule::new("local", "Local", ShippingMethod::SameDay).with_zone(Zone::Local));
        let result = ShippingEngine::new(rules).calculate_at(&input(vec![parcel()]), now());
        assert!(result.is_valid);
        assert!(result.options.is_empty());
        assert!(result.cheapest.is_none());
        assert_eq!(result.warnings, vec![NO_SHIPPING_RULE_MATCHED.to_string()]);
    }

    #[test]
    fn zone_rules_override_geography() {
        let mut rules = rules();
        rules
            .zone_rules
            .push(ZoneRule::new("ny", Zone::Regional).with_states(&["NY"]));
        let result = ShippingEngine::new(rules).calculate_at(&input(vec![parcel()]), now());
        assert_eq!(result.zone, Some(Zone::Regional));
    }

    #[test]
    fn free_shipping_zeroes_cheapest() {
        let mut rules = rules();
        rules
            .free_shipping_rules
            .push(FreeShippingRule::new("over-25", "Orders over 25").with_min_order_value(25.0));
        let result = ShippingEngine::new(rules).calculate_at(&input(vec![parcel()]), now());
        assert_eq!(result.free_shipping_rule.as_deref(), Some("over-25"));
        assert_eq!(result.options[0].cost, 0.0);
        assert_eq!(result.options[0].service_name, "Ground (Free Shipping)");
        assert_eq!(result.cheapest.unwrap().cost, 0.0);
    }

    #[test]
    fn rule_threshold_free_shipping_is_not_credited_to_order_rule() {
        let mut rules = rules();
        rules.shipping_rules[1].free_shipping_threshold = Some(30.0);
        rules
            .free_shipping_rules
            .push(FreeShippingRule::new("over-25", "Orders over 25").with_min_order_value(25.0));
        let result = ShippingEngine::new(rules).calculate_at(&input(vec![parcel()]), now());
        assert!(result.free_shipping_rule.is_none());
        let free: Vec<_> = result.options.iter().filter(|o| o.free_shipping).collect();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].rule_id.as_deref(), Some("express"));
        let ground = result
            .options
            .iter()
            .find(|o| o.rule_id.as_deref() == Some("ground"))
            .unwrap();
        assert!(ground.cost > 0.0);
    }

    #[test]
    fn best_option_by_criteria() {
        let engine = ShippingEngine::new(rules());
        let req = input(vec![parcel()]);
        let cheapest = engine
            .calculate_best_option_at(&req, SelectionCriteria::Cheapest, now())
            .unwrap();
        let fastest = engine
            .calculate_best_option_at(&req, SelectionCriteria::Fastest, now())
            .unwrap();
        assert_eq!(cheapest.id, "rule-ground");
        assert_eq!(fastest.id, "rule-express");
    }

    #[test]
    fn best_option_without_options_errors() {
        let engine = ShippingEngine::new(rules());
        let err = engine
            .calculate_best_option_at(&input(vec![]), SelectionCriteria::Cheapest, now())
            .unwrap_err();
        assert!(matches!(err, EngineError::NoOptions));
    }

    #[test]
    fn unknown_criteria_means_recommended() {
        let parse = |s: &str| s.parse::<SelectionCriteria>().unwrap();
        assert_eq!(parse("cheapest"), SelectionCriteria::Cheapest);
        assert_eq!(parse(" Fastest "), SelectionCriteria::Fastest);
        assert_eq!(parse("balanced"), SelectionCriteria::Recommended);
        assert_eq!(parse(""), SelectionCriteria::Recommended);
    }

    #[test]
    fn validated_rejects_bad_rules() {
        let mut rules = RuleSet::new();
        rules
            .shipping_rules
            .push(ShippingRule::new("", "Nameless id", ShippingMethod::Standard));
        assert!(matches!(
            ShippingEngine::validated(rules),
            Err(EngineError::Rules(_))
        ));
    }

    #[test]
    fn validated_rejects_unbounded_transit_days() {
        let mut rules = rules();
        rules
            .carrier_rules
            .push(CarrierRule::new("slow", "slowco", "SlowCo", ShippingMethod::Freight).with_delivery_days(u32::MAX));
        assert!(matches!(
            ShippingEngine::validated(rules),
            Err(EngineError::Rules(_))
        ));
    }

    #[test]
    fn extreme_transit_days_never_panic() {
        let mut rules = rules();
        rules
            .carrier_rules
            .push(CarrierRule::new("slow", "slowco", "SlowCo", ShippingMethod::Freight).with_delivery_days(u32::MAX));
        rules.delivery_time_rules.push(
            DeliveryTimeRule::new("ground-national", ShippingMethod::Standard, Zone::National, u32::MAX)
                .with_weekend_delay(1),
        );
        let friday = Utc.with_ymd_and_hms(2026, 3, 13, 10, 0, 0).unwrap();
        let result = ShippingEngine::new(rules).calculate_at(&input(vec![parcel()]), friday);

        assert!(result.is_valid);
        let slow = result.options.iter().find(|o| o.id == "carrier-slow").unwrap();
        assert_eq!(slow.estimated_days, u32::MAX);
        assert_eq!(slow.delivery_date, None);
        let ground = result.options.iter().find(|o| o.id == "rule-ground").unwrap();
        assert_eq!(ground.estimated_days, u32::MAX);
        assert_eq!(ground.delivery_date, None);
    }

    #[test]
    fn engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ShippingEngine>();
    }
}
