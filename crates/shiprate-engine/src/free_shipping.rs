//! # Free Shipping
//!
//! Order-level free-shipping promotions. The first rule (in configured order)
//! that the order qualifies for zeroes the cheapest computed option.
//!
//! Applying free shipping is idempotent: once an option has been made free,
//! re-applying leaves every option as it is.

use shiprate_core::{convert_weight, WeightUnit};
use shiprate_rules::FreeShippingRule;

use crate::option::ShippingOption;
use crate::shipment::{code_listed, has_category, Shipment};

/// Whether the order qualifies for `rule`.
pub fn qualifies(rule: &FreeShippingRule, shipment: &Shipment<'_>) -> bool {
    if !rule.is_in_force(shipment.now) {
        return false;
    }
    if let Some(min) = rule.min_order_value {
        if shipment.total_value < min {
            return false;
        }
    }
    if let Some(min) = &rule.min_weight {
        if convert_weight(shipment.total_weight_kg, WeightUnit::Kg, min.unit) < min.value {
            return false;
        }
    }
    if !rule.zones.is_empty() && !rule.zones.contains(&shipment.zone) {
        return false;
    }
    if !rule.categories.is_empty() && !has_category(shipment.items, &rule.categories) {
        return false;
    }
    !shipment
        .items
        .iter()
        .any(|item| code_listed(&rule.excluded_categories, &item.category))
}

/// The first rule the order qualifies for.
pub fn first_qualifying<'r>(rules: &'r [FreeShippingRule], shipment: &Shipment<'_>) -> Option<&'r FreeShippingRule> {
    rules.iter().find(|rule| qualifies(rule, shipment))
}

/// Index of the lowest-cost option, earliest on ties.
fn cheapest_index(options: &[ShippingOption]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, option) in options.iter().enumerate() {
        if best.map_or(true, |b| option.cost < options[b].cost) {
            best = Some(i);
        }
    }
    best
}

/// Apply the first qualifying free-shipping rule to `options`.
///
/// Returns the id of the rule when it zeroed an option. If some option
/// already ships free (an earlier application, or a shipping rule's own
/// threshold) nothing changes and `None` is returned.
pub fn apply_free_shipping(
    options: &mut [ShippingOption],
    rules: &[FreeShippingRule],
    shipment: &Shipment<'_>,
) -> Option<String> {
    let rule = first_qualifying(rules, shipment)?;
    if options.iter().any(|o| o.free_shipping) {
        tracing::debug!(rule = %rule.id, "an option already ships free");
        return None;
    }
    let index = cheapest_index(options)?;
    let option = &mut options[index];
    tracing::debug!(rule = %rule.id, option = %option.id, "free shipping applied");
    option.make_free();
    Some(rule.id.clone())
}
