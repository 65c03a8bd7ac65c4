//! # Restriction Checks
//!
//! Restrictions block a shipment outright. Every restriction that applies
//! contributes its message; any message at all makes the calculation invalid
//! before a single option is priced.

use shiprate_core::Address;
use shiprate_rules::{RestrictionType, ShippingRestriction};

use crate::shipment::{code_listed, has_category, ShippingItem};

/// Separator used when several restriction messages are reported together.
pub const MESSAGE_SEPARATOR: &str = "; ";

/// Whether `restriction` applies to this shipment.
pub fn restriction_applies(
    restriction: &ShippingRestriction,
    items: &[ShippingItem],
    destination: &Address,
) -> bool {
    match restriction.restriction_type {
        RestrictionType::Destination => code_listed(&restriction.countries, &destination.country),
        RestrictionType::ItemCategory => has_category(items, &restriction.categories),
        RestrictionType::Hazardous => items.iter().any(|i| i.is_hazardous),
    }
}

/// Messages of every restriction that applies, in configured order.
pub fn check_restrictions(
    items: &[ShippingItem],
    destination: &Address,
    restrictions: &[ShippingRestriction],
) -> Vec<String> {
    restrictions
        .iter()
        .filter(|r| restriction_applies(r, items, destination))
        .map(|r| {
            tracing::debug!(restriction = %r.id, kind = %r.restriction_type, "restriction applies");
            r.message.clone()
        })
        .collect()
}
