//! # Surcharges
//!
//! Resolves a shipping rule's configured surcharges against a shipment.
//!
//! | Kind        | Applies when                                        |
//! |-------------|-----------------------------------------------------|
//! | `fragile`   | any item is fragile                                 |
//! | `hazardous` | any item is hazardous                               |
//! | `oversized` | any item exceeds 120 × 80 × 80 cm on some axis       |
//! | `fuel`      | always                                              |
//! | `insurance` | total value is above 1000                           |
//!
//! A percentage surcharge charges `amount`% of the shipment's total value.

use shiprate_core::Dimensions;
use shiprate_rules::{Surcharge, SurchargeKind};

use crate::option::AppliedSurcharge;
use crate::shipment::Shipment;

/// Largest package, per axis, that does not trigger an oversize surcharge.
pub const OVERSIZE_LIMIT_CM: (f64, f64, f64) = (120.0, 80.0, 80.0);

/// Total value above which an insurance surcharge applies.
pub const INSURANCE_VALUE_THRESHOLD: f64 = 1000.0;

fn oversize_limit() -> Dimensions {
    let (l, w, h) = OVERSIZE_LIMIT_CM;
    Dimensions::cm(l, w, h)
}

/// Whether any item exceeds the oversize limit on length, width, or height.
pub fn is_oversized(shipment: &Shipment<'_>) -> bool {
    let limit = oversize_limit();
    shipment
        .items
        .iter()
        .filter_map(|item| item.dimensions.as_ref())
        .any(|dims| dims.exceeds_any(&limit))
}

/// Whether a surcharge of `kind` is triggered by the shipment.
pub fn triggers(kind: SurchargeKind, shipment: &Shipment<'_>) -> bool {
    match kind {
        SurchargeKind::Fragile => shipment.has_fragile(),
        SurchargeKind::Hazardous => shipment.has_hazardous(),
        SurchargeKind::Oversized => is_oversized(shipment),
        SurchargeKind::Fuel => true,
        SurchargeKind::Insurance => shipment.total_value > INSURANCE_VALUE_THRESHOLD,
    }
}

/// The amount `surcharge` charges on a shipment of `total_value`.
pub fn surcharge_amount(surcharge: &Surcharge, total_value: f64) -> f64 {
    if surcharge.is_percentage {
        total_value * surcharge.amount / 100.0
    } else {
        surcharge.amount
    }
}

/// Every configured surcharge that applies, with its amount.
pub fn applicable_surcharges(surcharges: &[Surcharge], shipment: &Shipment<'_>) -> Vec<AppliedSurcharge> {
    surcharges
        .iter()
        .filter(|s| triggers(s.kind, shipment))
        .map(|s| AppliedSurcharge {
            kind: s.kind,
            name: s.display_name().to_string(),
            amount: surcharge_amount(s, shipment.total_value),
        })
        .collect()
}
