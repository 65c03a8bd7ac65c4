//! # Rule Matching
//!
//! Decides which shipping and carrier rules apply to a shipment. Matching is
//! a pure predicate over the rule and the aggregated [`Shipment`]; pricing
//! happens afterwards in [`crate::cost`].

use shiprate_core::{convert_weight, Weight, WeightUnit};
use shiprate_rules::{CarrierRule, ShippingRule};

use crate::shipment::{code_listed, has_category, Shipment};

/// Why a shipping rule was passed over. Used only for debug logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    NotInForce,
    Zone,
    BelowMinWeight,
    AboveMaxWeight,
    BelowMinValue,
    AboveMaxValue,
    Country,
    State,
    Category,
    TooHeavy,
    TooLarge,
}

impl Mismatch {
    /// Return the string representation of this mismatch.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInForce => "not_in_force",
            Self::Zone => "zone",
            Self::BelowMinWeight => "below_min_weight",
            Self::AboveMaxWeight => "above_max_weight",
            Self::BelowMinValue => "below_min_value",
            Self::AboveMaxValue => "above_max_value",
            Self::Country => "country",
            Self::State => "state",
            Self::Category => "category",
            Self::TooHeavy => "too_heavy",
            Self::TooLarge => "too_large",
        }
    }
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total shipment weight expressed in `bound`'s unit.
fn weight_in_unit_of(shipment: &Shipment<'_>, bound: &Weight) -> f64 {
    convert_weight(shipment.total_weight_kg, WeightUnit::Kg, bound.unit)
}

/// Check a shipping rule against a shipment.
pub fn check_shipping_rule(rule: &ShippingRule, shipment: &Shipment<'_>) -> Result<(), Mismatch> {
    if !rule.is_in_force(shipment.now) {
        return Err(Mismatch::NotInForce);
    }
    if let Some(zone) = rule.zone {
        if zone != shipment.zone {
            return Err(Mismatch::Zone);
        }
    }
    if let Some(min) = &rule.min_weight {
        if weight_in_unit_of(shipment, min) < min.value {
            return Err(Mismatch::BelowMinWeight);
        }
    }
    if let Some(max) = &rule.max_weight {
        if weight_in_unit_of(shipment, max) > max.value {
            return Err(Mismatch::AboveMaxWeight);
        }
    }
    if let Some(min) = rule.min_value {
        if shipment.total_value < min {
            return Err(Mismatch::BelowMinValue);
        }
    }
    if let Some(max) = rule.max_value {
        if shipment.total_value > max {
            return Err(Mismatch::AboveMaxValue);
        }
    }
    if !rule.countries.is_empty() && !code_listed(&rule.countries, &shipment.destination.country) {
        return Err(Mismatch::Country);
    }
    if !rule.states.is_empty() && !code_listed(&rule.states, &shipment.destination.state) {
        return Err(Mismatch::State);
    }
    if !rule.categories.is_empty() && !has_category(shipment.items, &rule.categories) {
        return Err(Mismatch::Category);
    }
    Ok(())
}

/// Whether a shipping rule applies to a shipment.
pub fn shipping_rule_applies(rule: &ShippingRule, shipment: &Shipment<'_>) -> bool {
    match check_shipping_rule(rule, shipment) {
        Ok(()) => true,
        Err(reason) => {
            tracing::debug!(rule = %rule.id, %reason, "shipping rule skipped");
            false
        }
    }
}

/// Check a carrier rule's weight and size limits against a shipment.
pub fn check_carrier_rule(rule: &CarrierRule, shipment: &Shipment<'_>) -> Result<(), Mismatch> {
    if let Some(max) = &rule.max_weight {
        if weight_in_unit_of(shipment, max) > max.value {
            return Err(Mismatch::TooHeavy);
        }
    }
    if let Some(limit) = &rule.max_dimensions {
        let oversize = shipment
            .items
            .iter()
            .filter_map(|item| item.dimensions.as_ref())
            .any(|dims| !dims.fits_within(limit));
        if oversize {
            return Err(Mismatch::TooLarge);
        }
    }
    Ok(())
}

/// Whether a carrier rule can take a shipment.
pub fn carrier_rule_applies(rule: &CarrierRule, shipment: &Shipment<'_>) -> bool {
    match check_carrier_rule(rule, shipment) {
        Ok(()) => true,
        Err(reason) => {
            tracing::debug!(rule = %rule.id, carrier = %rule.carrier_id, %reason, "carrier rule skipped");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shipment::ShippingItem;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use shiprate_core::{Address, DimensionUnit, Dimensions, ShippingMethod, ValidityWindow, Zone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn dest() -> Address {
        Address::new("Portland", "OR", "97201", "US")
    }

    fn origin() -> Address {
        Address::new("Seattle", "WA", "98101", "US")
    }

    fn items() -> Vec<ShippingItem> {
        vec![ShippingItem::new("a", Weight::kg(4.0), 80.0)
            .with_category("books")
            .with_dimensions(Dimensions::cm(40.0, 30.0, 20.0))]
    }

    fn with_shipment<R>(items: &[ShippingItem], f: impl FnOnce(&Shipment<'_>) -> R) -> R {
        let (o, d) = (origin(), dest());
        let shipment = Shipment::new(items, &o, &d, Zone::National, None, now());
        f(&shipment)
    }

    fn rule() -> ShippingRule {
        ShippingRule::new("r", "Ground", ShippingMethod::Standard)
    }

    #[test]
    fn unconstrained_rule_matches() {
        with_shipment(&items(), |s| assert!(shipping_rule_applies(&rule(), s)));
    }

    #[test]
    fn inactive_rule_does_not_match() {
        let mut r = rule();
        r.active = false;
        with_shipment(&items(), |s| {
            assert_eq!(check_shipping_rule(&r, s), Err(Mismatch::NotInForce))
        });
    }

    #[test]
    fn window_is_half_open() {
        let r = rule().with_window(ValidityWindow {
            valid_from: None,
            valid_until: Some(now()),
        });
        with_shipment(&items(), |s| {
            assert_eq!(check_shipping_rule(&r, s), Err(Mismatch::NotInForce))
        });
        let r = rule().with_window(ValidityWindow {
            valid_from: Some(now()),
            valid_until: Some(now() + Duration::days(1)),
        });
        with_shipment(&items(), |s| assert!(shipping_rule_applies(&r, s)));
    }

    #[test]
    fn zone_must_match_when_set() {
        with_shipment(&items(), |s| {
            assert!(shipping_rule_applies(&rule().with_zone(Zone::National), s));
            assert_eq!(
                check_shipping_rule(&rule().with_zone(Zone::Local), s),
                Err(Mismatch::Zone)
            );
        });
    }

    #[test]
    fn weight_bounds_compare_in_rule_unit() {
        // 4 kg is about 8.82 lb.
        let mut r = rule();
        r.min_weight = Some(Weight::new(8.0, WeightUnit::Lb).unwrap());
        r.max_weight = Some(Weight::new(9.0, WeightUnit::Lb).unwrap());
        with_shipment(&items(), |s| assert!(shipping_rule_applies(&r, s)));

        r.max_weight = Some(Weight::new(8.5, WeightUnit::Lb).unwrap());
        with_shipment(&items(), |s| {
            assert_eq!(check_shipping_rule(&r, s), Err(Mismatch::AboveMaxWeight))
        });
    }

    #[test]
    fn weight_bounds_are_inclusive() {
        let mut r = rule();
        r.min_weight = Some(Weight::kg(4.0));
        r.max_weight = Some(Weight::kg(4.0));
        with_shipment(&items(), |s| assert!(shipping_rule_applies(&r, s)));
    }

    #[test]
    fn value_bounds() {
        let mut r = rule();
        r.min_value = Some(100.0);
        with_shipment(&items(), |s| {
            assert_eq!(check_shipping_rule(&r, s), Err(Mismatch::BelowMinValue))
        });
        r.min_value = None;
        r.max_value = Some(50.0);
        with_shipment(&items(), |s| {
            assert_eq!(check_shipping_rule(&r, s), Err(Mismatch::AboveMaxValue))
        });
    }

    #[test]
    fn allow_lists() {
        let mut r = rule();
        r.countries = vec!["US".into()];
        r.states = vec!["OR".into(), "WA".into()];
        r.categories = vec!["books".into()];
        with_shipment(&items(), |s| assert!(shipping_rule_applies(&r, s)));

        r.states = vec!["CA".into()];
        with_shipment(&items(), |s| {
            assert_eq!(check_shipping_rule(&r, s), Err(Mismatch::State))
        });

        r.states.clear();
        r.categories = vec!["toys".into()];
        with_shipment(&items(), |s| {
            assert_eq!(check_shipping_rule(&r, s), Err(Mismatch::Category))
        });
    }

    #[test]
    fn carrier_weight_limit() {
        let c = CarrierRule::new("c", "acme", "Acme", ShippingMethod::Express)
            .with_limits(Some(Weight::kg(3.0)), None);
        with_shipment(&items(), |s| {
            assert_eq!(check_carrier_rule(&c, s), Err(Mismatch::TooHeavy))
        });
    }

    #[test]
    fn carrier_dimension_limit_converts_units() {
        // 40x30x20 cm is about 15.7x11.8x7.9 in.
        let fits = Dimensions::new(16.0, 12.0, 8.0, DimensionUnit::In).unwrap();
        let tight = Dimensions::new(15.0, 12.0, 8.0, DimensionUnit::In).unwrap();
        let c = CarrierRule::new("c", "acme", "Acme", ShippingMethod::Express);
        with_shipment(&items(), |s| {
            assert!(carrier_rule_applies(&c.clone().with_limits(None, Some(fits)), s));
            assert_eq!(
                check_carrier_rule(&c.clone().with_limits(None, Some(tight)), s),
                Err(Mismatch::TooLarge)
            );
        });
    }

    #[test]
    fn carrier_ignores_items_without_dimensions() {
        let items = vec![ShippingItem::new("a", Weight::kg(1.0), 1.0)];
        let c = CarrierRule::new("c", "acme", "Acme", ShippingMethod::Express)
            .with_limits(None, Some(Dimensions::cm(1.0, 1.0, 1.0)));
        with_shipment(&items, |s| assert!(carrier_rule_applies(&c, s)));
    }
}
