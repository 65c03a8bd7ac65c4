//! # Calculation Input and Output
//!
//! The request a caller hands the engine and the quote it gets back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shiprate_core::{Address, ShippingMethod, Zone};
use shiprate_rules::SurchargeKind;
use uuid::Uuid;

use crate::shipment::ShippingItem;

/// Suffix appended to the service name of an option made free.
pub const FREE_SHIPPING_SUFFIX: &str = " (Free Shipping)";

/// What to quote: items travelling from `origin` to `destination`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingCalculationInput {
    #[serde(default)]
    pub items: Vec<ShippingItem>,
    pub origin: Address,
    pub destination: Address,
}

impl ShippingCalculationInput {
    /// A request for `items` between two addresses.
    pub fn new(items: Vec<ShippingItem>, origin: Address, destination: Address) -> Self {
        Self {
            items,
            origin,
            destination,
        }
    }
}

/// The carrier behind a carrier-sourced option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierInfo {
    pub carrier_id: String,
    pub carrier_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_code: String,
}

/// A surcharge that was triggered and its resolved amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedSurcharge {
    pub kind: SurchargeKind,
    pub name: String,
    pub amount: f64,
}

/// One priced way to ship the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingOption {
    /// `rule-<id>`, `carrier-<id>`, or `default-standard`.
    pub id: String,
    /// Id of the shipping or carrier rule that produced this option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub method: ShippingMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carrier: Option<CarrierInfo>,
    pub service_name: String,
    /// Final cost, rounded to cents.
    pub cost: f64,
    /// Cost before surcharges, rounded to cents.
    pub base_cost: f64,
    #[serde(default)]
    pub surcharges: Vec<AppliedSurcharge>,
    pub estimated_days: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<DateTime<Utc>>,
    pub tracking_included: bool,
    pub insurance_included: bool,
    pub signature_required: bool,
    pub zone: Zone,
    #[serde(default)]
    pub description: String,
    /// Set once a free-shipping rule has zeroed this option.
    #[serde(default)]
    pub free_shipping: bool,
}

impl ShippingOption {
    /// Zero the cost and mark the option as shipping free.
    ///
    /// Applying this twice leaves the option unchanged the second time.
    pub fn make_free(&mut self) {
        self.cost = 0.0;
        if !self.free_shipping {
            self.service_name.push_str(FREE_SHIPPING_SUFFIX);
            self.free_shipping = true;
        }
    }
}

/// The engine's answer for one calculation.
///
/// Always well-formed: business failures set `is_valid = false` and
/// `error_message` rather than producing an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingCalculationResult {
    pub calculation_id: Uuid,
    pub calculated_at: DateTime<Utc>,
    /// All options, ascending by cost.
    pub options: Vec<ShippingOption>,
    pub cheapest: Option<ShippingOption>,
    pub fastest: Option<ShippingOption>,
    pub recommended: Option<ShippingOption>,
    pub total_weight_kg: f64,
    pub total_value: f64,
    pub dimensional_weight_kg: f64,
    /// Unset only when the calculation stopped before zone resolution.
    pub zone: Option<Zone>,
    pub distance_km: Option<f64>,
    /// Id of the free-shipping rule that was applied, if any.
    pub free_shipping_rule: Option<String>,
    pub is_valid: bool,
    pub error_message: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ShippingCalculationResult {
    /// An empty valid result stamped at `now`.
    pub(crate) fn new(now: DateTime<Utc>) -> Self {
        Self {
            calculation_id: Uuid::new_v4(),
            calculated_at: now,
            options: Vec::new(),
            cheapest: None,
            fastest: None,
            recommended: None,
            total_weight_kg: 0.0,
            total_value: 0.0,
            dimensional_weight_kg: 0.0,
            zone: None,
            distance_km: None,
            free_shipping_rule: None,
            is_valid: true,
            error_message: None,
            warnings: Vec::new(),
        }
    }

    /// Mark the result invalid with `message`, discarding any options.
    pub(crate) fn invalidate(mut self, message: impl Into<String>) -> Self {
        self.is_valid = false;
        self.error_message = Some(message.into());
        self.options.clear();
        self.cheapest = None;
        self.fastest = None;
        self.recommended = None;
        self
    }
}
