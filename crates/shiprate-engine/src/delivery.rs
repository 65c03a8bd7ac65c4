//! # Delivery Estimation
//!
//! Transit days for a shipping method into the shipment's zone. A configured
//! [`DeliveryTimeRule`] for the (method, zone) pair takes precedence; without
//! one, a fixed per-method table applies.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use shiprate_core::{convert_weight, ShippingMethod, WeightUnit};
use shiprate_rules::DeliveryTimeRule;

use crate::shipment::Shipment;

/// Transit days when no delivery-time rule covers the method and zone.
pub fn fallback_days(method: ShippingMethod) -> u32 {
    match method {
        ShippingMethod::SameDay | ShippingMethod::Pickup => 0,
        ShippingMethod::Overnight => 1,
        ShippingMethod::Express => 2,
        ShippingMethod::Standard => 5,
        ShippingMethod::Economy | ShippingMethod::Freight => 3,
    }
}

/// Whether dispatching at `now` incurs the weekend delay (Friday or Saturday).
pub fn is_weekend_dispatch(now: DateTime<Utc>) -> bool {
    matches!(now.weekday(), Weekday::Fri | Weekday::Sat)
}

/// `now` plus `days`, or `None` when there is no transit time or the date
/// would fall outside the representable range.
pub fn delivery_date(now: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
    if days == 0 {
        return None;
    }
    now.checked_add_signed(Duration::days(i64::from(days)))
}

/// Estimates transit days from an ordered list of delivery-time rules.
#[derive(Debug, Clone, Copy)]
pub struct DeliveryEstimator<'a> {
    rules: &'a [DeliveryTimeRule],
}

impl<'a> DeliveryEstimator<'a> {
    /// An estimator over `rules`.
    pub fn new(rules: &'a [DeliveryTimeRule]) -> Self {
        Self { rules }
    }

    /// The rule covering `method` in the shipment's zone, if any.
    pub fn rule_for(&self, method: ShippingMethod, shipment: &Shipment<'_>) -> Option<&'a DeliveryTimeRule> {
        self.rules
            .iter()
            .find(|r| r.method == method && r.zone == shipment.zone)
    }

    /// Estimated transit days for `method`.
    pub fn estimate(&self, method: ShippingMethod, shipment: &Shipment<'_>) -> u32 {
        match self.rule_for(method, shipment) {
            Some(rule) => days_from_rule(rule, shipment),
            None => fallback_days(method),
        }
    }
}

/// Apply a rule's base days and delays to a shipment.
pub fn days_from_rule(rule: &DeliveryTimeRule, shipment: &Shipment<'_>) -> u32 {
    let mut days = rule.base_days;
    if let Some(threshold) = &rule.weight_threshold {
        let weight = convert_weight(shipment.total_weight_kg, WeightUnit::Kg, threshold.unit);
        if weight > threshold.value {
            days = days.saturating_add(rule.weight_delay_days);
        }
    }
    if let (Some(threshold), Some(distance)) = (rule.distance_threshold_km, shipment.distance_km) {
        if distance > threshold {
            days = days.saturating_add(rule.distance_delay_days);
        }
    }
    if is_weekend_dispatch(shipment.now) {
        days = days.saturating_add(rule.weekend_delay_days);
    }
    days
}
