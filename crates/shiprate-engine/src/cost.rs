//! # Cost Model
//!
//! Turns a matched rule into a priced [`ShippingOption`].
//!
//! ## Shipping rules
//!
//! A positive `flat_rate` is the whole pre-surcharge price. Otherwise the
//! price is `base_cost` plus, for each positive rate:
//!
//! - `weight_rate` × total weight (kg)
//! - `value_rate`% of total value
//! - `dimensional_rate` × dimensional weight (kg)
//!
//! Applicable surcharges are then added and the total is rounded to cents.
//! A rule with a `free_shipping_threshold` ships free once the order value
//! reaches it.
//!
//! ## Carrier rules
//!
//! `base_cost` + `weight_rate` × total weight (kg) + the zone's extra, if the
//! carrier lists one. No surcharges and no dimensional pricing.

use shiprate_core::{round_cents, ShippingMethod};
use shiprate_rules::{CarrierRule, ShippingRule};

use crate::delivery::{delivery_date, DeliveryEstimator};
use crate::option::{CarrierInfo, ShippingOption};
use crate::shipment::Shipment;
use crate::surcharge::applicable_surcharges;

/// Price of the option emitted when no shipping rules are configured.
pub const DEFAULT_OPTION_COST: f64 = 10.0;

/// Transit days of the option emitted when no shipping rules are configured.
pub const DEFAULT_OPTION_DAYS: u32 = 5;

/// Value above which rule-based options include insurance.
pub const INSURANCE_INCLUDED_ABOVE: f64 = 100.0;

/// Value above which rule-based options require a signature.
pub const SIGNATURE_REQUIRED_ABOVE: f64 = 500.0;

/// Pre-surcharge price of a shipping rule, unrounded.
pub fn shipping_rule_base_cost(rule: &ShippingRule, shipment: &Shipment<'_>) -> f64 {
    if rule.flat_rate > 0.0 {
        return rule.flat_rate;
    }
    let mut cost = rule.base_cost;
    if rule.weight_rate > 0.0 {
        cost += shipment.total_weight_kg * rule.weight_rate;
    }
    if rule.value_rate > 0.0 {
        cost += shipment.total_value * rule.value_rate / 100.0;
    }
    if rule.dimensional_rate > 0.0 {
        cost += shipment.dimensional_weight_kg * rule.dimensional_rate;
    }
    cost
}

/// Price a matched shipping rule.
pub fn price_shipping_rule(
    rule: &ShippingRule,
    shipment: &Shipment<'_>,
    estimator: &DeliveryEstimator<'_>,
) -> ShippingOption {
    let base = shipping_rule_base_cost(rule, shipment);
    let surcharges = applicable_surcharges(&rule.surcharges, shipment);
    let total = base + surcharges.iter().map(|s| s.amount).sum::<f64>();
    let days = estimator.estimate(rule.method, shipment);

    let description = if rule.description.is_empty() {
        format!("{} shipping to {} zone", rule.method, shipment.zone)
    } else {
        rule.description.clone()
    };

    let mut option = ShippingOption {
        id: format!("rule-{}", rule.id),
        rule_id: Some(rule.id.clone()),
        method: rule.method,
        carrier: None,
        service_name: rule.name.clone(),
        cost: round_cents(total),
        base_cost: round_cents(base),
        surcharges,
        estimated_days: days,
        delivery_date: delivery_date(shipment.now, days),
        tracking_included: rule.method != ShippingMethod::Standard,
        insurance_included: shipment.total_value > INSURANCE_INCLUDED_ABOVE,
        signature_required: shipment.total_value > SIGNATURE_REQUIRED_ABOVE,
        zone: shipment.zone,
        description,
        free_shipping: false,
    };

    if let Some(threshold) = rule.free_shipping_threshold {
        if shipment.total_value >= threshold {
            tracing::debug!(rule = %rule.id, threshold, "rule free-shipping threshold reached");
            option.make_free();
        }
    }
    option
}

/// Price a matched carrier rule.
///
/// Transit days come from the carrier's own `delivery_days` when set, and
/// from the estimator otherwise.
pub fn price_carrier_rule(
    rule: &CarrierRule,
    shipment: &Shipment<'_>,
    estimator: &DeliveryEstimator<'_>,
) -> ShippingOption {
    let zone_extra = rule.zone_rates.get(&shipment.zone).copied().unwrap_or(0.0);
    let cost = rule.base_cost + rule.weight_rate * shipment.total_weight_kg + zone_extra;
    let days = if rule.delivery_days > 0 {
        rule.delivery_days
    } else {
        estimator.estimate(rule.method, shipment)
    };
    let service_name = rule.display_name();

    ShippingOption {
        id: format!("carrier-{}", rule.id),
        rule_id: Some(rule.id.clone()),
        method: rule.method,
        carrier: Some(CarrierInfo {
            carrier_id: rule.carrier_id.clone(),
            carrier_name: rule.carrier_name.clone(),
            service_code: rule.service_code.clone(),
        }),
        description: format!("{} to {} zone", service_name, shipment.zone),
        service_name,
        cost: round_cents(cost),
        base_cost: round_cents(rule.base_cost),
        surcharges: Vec::new(),
        estimated_days: days,
        delivery_date: delivery_date(shipment.now, days),
        tracking_included: rule.tracking_included,
        insurance_included: rule.insurance_included,
        signature_required: rule.signature_required,
        zone: shipment.zone,
        free_shipping: false,
    }
}

/// The standard option offered when no shipping rules are configured.
pub fn default_option(shipment: &Shipment<'_>) -> ShippingOption {
    ShippingOption {
        id: "default-standard".to_string(),
        rule_id: None,
        method: ShippingMethod::Standard,
        carrier: None,
        service_name: "Standard Shipping".to_string(),
        cost: DEFAULT_OPTION_COST,
        base_cost: DEFAULT_OPTION_COST,
        surcharges: Vec::new(),
        estimated_days: DEFAULT_OPTION_DAYS,
        delivery_date: delivery_date(shipment.now, DEFAULT_OPTION_DAYS),
        tracking_included: false,
        insurance_included: false,
        signature_required: false,
        zone: shipment.zone,
        description: "Default standard shipping".to_string(),
        free_shipping: false,
    }
}
