//! # Rule Families
//!
//! The six kinds of configuration the shipping engine consumes:
//!
//! - [`ShippingRule`] — a priced shipping service (base + rates or flat rate,
//!   plus surcharges), scoped by zone, weight, value, and allow-lists.
//! - [`CarrierRule`] — a carrier service with its own base/weight pricing and
//!   per-zone extras, limited by maximum weight and package size.
//! - [`ZoneRule`] — maps destination countries/states/postal codes to a
//!   [`Zone`].
//! - [`DeliveryTimeRule`] — transit-day estimate for a (method, zone) pair.
//! - [`ShippingRestriction`] — blocks a shipment outright.
//! - [`FreeShippingRule`] — qualifies an order for free shipping.
//!
//! Every family implements [`Rule`], which gives it an id, a validation
//! routine, and a slot in [`RuleSet`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shiprate_core::{
    Dimensions, ShippingMethod, ValidationError, ValidityWindow, Weight, Zone,
};

use crate::error::{RuleError, RuleResult};
use crate::ruleset::{Rule, RuleSet};

/// Upper bound on any configured transit-day count or delay.
pub const MAX_TRANSIT_DAYS: u32 = 365;

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn require(kind: &'static str, id: &str, field: &'static str, value: &str) -> RuleResult<()> {
    if value.trim().is_empty() {
        return Err(RuleError::EmptyField {
            kind,
            id: id.to_string(),
            field,
        });
    }
    Ok(())
}

fn invalid<'a>(kind: &'static str, id: &'a str) -> impl FnOnce(ValidationError) -> RuleError + 'a {
    move |source| RuleError::InvalidValue {
        kind,
        id: id.to_string(),
        source,
    }
}

fn non_negative(kind: &'static str, id: &str, field: &str, value: f64) -> RuleResult<()> {
    ValidationError::check_non_negative(field, value).map_err(invalid(kind, id))
}

fn transit_days(kind: &'static str, id: &str, field: &str, days: u32) -> RuleResult<()> {
    ValidationError::check_at_most(field, u64::from(days), u64::from(MAX_TRANSIT_DAYS))
        .map_err(invalid(kind, id))
}

fn optional_non_negative(
    kind: &'static str,
    id: &str,
    field: &str,
    value: Option<f64>,
) -> RuleResult<()> {
    match value {
        Some(v) => non_negative(kind, id, field, v),
        None => Ok(()),
    }
}

fn optional_weight(
    kind: &'static str,
    id: &str,
    field: &str,
    value: &Option<Weight>,
) -> RuleResult<()> {
    match value {
        Some(w) => w.validate(field).map_err(invalid(kind, id)),
        None => Ok(()),
    }
}

fn window(kind: &'static str, id: &str, window: &ValidityWindow) -> RuleResult<()> {
    window.validate().map_err(|source| RuleError::InvalidWindow {
        kind,
        id: id.to_string(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Surcharges
// ---------------------------------------------------------------------------

/// The condition that triggers a surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurchargeKind {
    /// Any item is flagged fragile.
    Fragile,
    /// Any item is flagged hazardous.
    Hazardous,
    /// Any item exceeds the oversize envelope.
    Oversized,
    /// Always applies.
    Fuel,
    /// Shipment value exceeds the insurance threshold.
    Insurance,
}

impl SurchargeKind {
    /// Return the string representation of this surcharge kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fragile => "fragile",
            Self::Hazardous => "hazardous",
            Self::Oversized => "oversized",
            Self::Fuel => "fuel",
            Self::Insurance => "insurance",
        }
    }

    /// Return all surcharge kinds.
    pub fn all() -> &'static [SurchargeKind] {
        &[
            Self::Fragile,
            Self::Hazardous,
            Self::Oversized,
            Self::Fuel,
            Self::Insurance,
        ]
    }
}

impl std::fmt::Display for SurchargeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conditional extra charge attached to a [`ShippingRule`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surcharge {
    /// Trigger condition.
    #[serde(rename = "type")]
    pub kind: SurchargeKind,
    /// Display name. Defaults to the kind when empty.
    #[serde(default)]
    pub name: String,
    /// Fixed amount, or a percentage of shipment value when `is_percentage`.
    pub amount: f64,
    /// Interpret `amount` as a percentage of shipment value.
    #[serde(default)]
    pub is_percentage: bool,
}

impl Surcharge {
    /// A fixed-amount surcharge.
    pub fn fixed(kind: SurchargeKind, amount: f64) -> Self {
        Self {
            kind,
            name: String::new(),
            amount,
            is_percentage: false,
        }
    }

    /// A surcharge of `percent`% of shipment value.
    pub fn percentage(kind: SurchargeKind, percent: f64) -> Self {
        Self {
            kind,
            name: String::new(),
            amount: percent,
            is_percentage: true,
        }
    }

    /// Builder: set the display name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Display name, falling back to the kind.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.kind.as_str()
        } else {
            &self.name
        }
    }
}

// ---------------------------------------------------------------------------
// ShippingRule
// ---------------------------------------------------------------------------

/// A priced shipping service.
///
/// When `flat_rate > 0` the rule charges exactly that (plus surcharges);
/// otherwise it charges `base_cost` plus weight, value, and dimensional
/// components for whichever rates are positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingRule {
    pub id: String,
    pub name: String,
    pub method: ShippingMethod,
    /// `None` matches any zone.
    #[serde(default)]
    pub zone: Option<Zone>,
    #[serde(default)]
    pub min_weight: Option<Weight>,
    #[serde(default)]
    pub max_weight: Option<Weight>,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
    #[serde(default)]
    pub base_cost: f64,
    /// Cost per kilogram of actual weight.
    #[serde(default)]
    pub weight_rate: f64,
    /// Percentage of shipment value.
    #[serde(default)]
    pub value_rate: f64,
    /// Cost per kilogram of dimensional weight.
    #[serde(default)]
    pub dimensional_rate: f64,
    /// Overrides the additive pricing when positive.
    #[serde(default)]
    pub flat_rate: f64,
    /// Orders worth at least this much ship free under this rule.
    #[serde(default)]
    pub free_shipping_threshold: Option<f64>,
    #[serde(default)]
    pub surcharges: Vec<Surcharge>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub window: ValidityWindow,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl ShippingRule {
    /// An active, unbounded rule with zero pricing.
    pub fn new(id: impl Into<String>, name: impl Into<String>, method: ShippingMethod) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            method,
            zone: None,
            min_weight: None,
            max_weight: None,
            min_value: None,
            max_value: None,
            base_cost: 0.0,
            weight_rate: 0.0,
            value_rate: 0.0,
            dimensional_rate: 0.0,
            flat_rate: 0.0,
            free_shipping_threshold: None,
            surcharges: Vec::new(),
            active: true,
            window: ValidityWindow::always(),
            countries: Vec::new(),
            states: Vec::new(),
            categories: Vec::new(),
            description: String::new(),
        }
    }

    /// Builder: restrict to a zone.
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = Some(zone);
        self
    }

    /// Builder: set base cost and per-kilogram rate.
    pub fn with_pricing(mut self, base_cost: f64, weight_rate: f64) -> Self {
        self.base_cost = base_cost;
        self.weight_rate = weight_rate;
        self
    }

    /// Builder: set a flat rate.
    pub fn with_flat_rate(mut self, flat_rate: f64) -> Self {
        self.flat_rate = flat_rate;
        self
    }

    /// Builder: attach a surcharge.
    pub fn with_surcharge(mut self, surcharge: Surcharge) -> Self {
        self.surcharges.push(surcharge);
        self
    }

    /// Builder: set the validity window.
    pub fn with_window(mut self, window: ValidityWindow) -> Self {
        self.window = window;
        self
    }

    /// Whether the rule is switched on and `now` is inside its window.
    pub fn is_in_force(&self, now: DateTime<Utc>) -> bool {
        self.active && self.window.contains(now)
    }
}

impl Rule for ShippingRule {
    const KIND: &'static str = "shipping rule";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> RuleResult<()> {
        let (kind, id) = (Self::KIND, self.id.as_str());
        require(kind, id, "id", id)?;
        require(kind, id, "name", &self.name)?;
        non_negative(kind, id, "base_cost", self.base_cost)?;
        non_negative(kind, id, "weight_rate", self.weight_rate)?;
        non_negative(kind, id, "value_rate", self.value_rate)?;
        non_negative(kind, id, "dimensional_rate", self.dimensional_rate)?;
        non_negative(kind, id, "flat_rate", self.flat_rate)?;
        optional_weight(kind, id, "min_weight", &self.min_weight)?;
        optional_weight(kind, id, "max_weight", &self.max_weight)?;
        optional_non_negative(kind, id, "min_value", self.min_value)?;
        optional_non_negative(kind, id, "max_value", self.max_value)?;
        optional_non_negative(
            kind,
            id,
            "free_shipping_threshold",
            self.free_shipping_threshold,
        )?;
        for surcharge in &self.surcharges {
            non_negative(kind, id, "surcharges.amount", surcharge.amount)?;
        }
        window(kind, id, &self.window)
    }

    fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_in_force(now)
    }

    fn slot(set: &RuleSet) -> &Vec<Self> {
        &set.shipping_rules
    }

    fn slot_mut(set: &mut RuleSet) -> &mut Vec<Self> {
        &mut set.shipping_rules
    }
}

// ---------------------------------------------------------------------------
// CarrierRule
// ---------------------------------------------------------------------------

/// A carrier-specific service offering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierRule {
    pub id: String,
    pub carrier_id: String,
    pub carrier_name: String,
    pub method: ShippingMethod,
    #[serde(default)]
    pub service_code: String,
    #[serde(default)]
    pub service_name: String,
    #[serde(default)]
    pub base_cost: f64,
    /// Cost per kilogram.
    #[serde(default)]
    pub weight_rate: f64,
    /// Extra cost added when shipping into the keyed zone.
    #[serde(default)]
    pub zone_rates: BTreeMap<Zone, f64>,
    #[serde(default)]
    pub max_weight: Option<Weight>,
    #[serde(default)]
    pub max_dimensions: Option<Dimensions>,
    /// Transit days quoted by the carrier; 0 defers to delivery-time rules.
    #[serde(default)]
    pub delivery_days: u32,
    #[serde(default)]
    pub tracking_included: bool,
    #[serde(default)]
    pub insurance_included: bool,
    #[serde(default)]
    pub signature_required: bool,
}

impl CarrierRule {
    /// A carrier service with zero pricing and no limits.
    pub fn new(
        id: impl Into<String>,
        carrier_id: impl Into<String>,
        carrier_name: impl Into<String>,
        method: ShippingMethod,
    ) -> Self {
        Self {
            id: id.into(),
            carrier_id: carrier_id.into(),
            carrier_name: carrier_name.into(),
            method,
            service_code: String::new(),
            service_name: String::new(),
            base_cost: 0.0,
            weight_rate: 0.0,
            zone_rates: BTreeMap::new(),
            max_weight: None,
            max_dimensions: None,
            delivery_days: 0,
            tracking_included: false,
            insurance_included: false,
            signature_required: false,
        }
    }

    /// Builder: set base cost and per-kilogram rate.
    pub fn with_pricing(mut self, base_cost: f64, weight_rate: f64) -> Self {
        self.base_cost = base_cost;
        self.weight_rate = weight_rate;
        self
    }

    /// Builder: add a per-zone extra cost.
    pub fn with_zone_rate(mut self, zone: Zone, extra: f64) -> Self {
        self.zone_rates.insert(zone, extra);
        self
    }

    /// Builder: set weight and size limits.
    pub fn with_limits(mut self, max_weight: Option<Weight>, max_dimensions: Option<Dimensions>) -> Self {
        self.max_weight = max_weight;
        self.max_dimensions = max_dimensions;
        self
    }

    /// Builder: set quoted transit days.
    pub fn with_delivery_days(mut self, days: u32) -> Self {
        self.delivery_days = days;
        self
    }

    /// Service display name, falling back to "<carrier> <method>".
    pub fn display_name(&self) -> String {
        if self.service_name.is_empty() {
            format!("{} {}", self.carrier_name, self.method)
        } else {
            self.service_name.clone()
        }
    }
}

impl Rule for CarrierRule {
    const KIND: &'static str = "carrier rule";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> RuleResult<()> {
        let (kind, id) = (Self::KIND, self.id.as_str());
        require(kind, id, "id", id)?;
        require(kind, id, "carrier_id", &self.carrier_id)?;
        require(kind, id, "carrier_name", &self.carrier_name)?;
        non_negative(kind, id, "base_cost", self.base_cost)?;
        non_negative(kind, id, "weight_rate", self.weight_rate)?;
        for extra in self.zone_rates.values() {
            non_negative(kind, id, "zone_rates", *extra)?;
        }
        optional_weight(kind, id, "max_weight", &self.max_weight)?;
        if let Some(dims) = &self.max_dimensions {
            dims.validate("max_dimensions").map_err(invalid(kind, id))?;
        }
        transit_days(kind, id, "delivery_days", self.delivery_days)
    }

    fn slot(set: &RuleSet) -> &Vec<Self> {
        &set.carrier_rules
    }

    fn slot_mut(set: &mut RuleSet) -> &mut Vec<Self> {
        &mut set.carrier_rules
    }
}

// ---------------------------------------------------------------------------
// ZoneRule
// ---------------------------------------------------------------------------

/// An inclusive postal-code range, compared lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalRange {
    pub start: String,
    pub end: String,
}

impl PostalRange {
    /// Create a range.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Whether `code` lies within `[start, end]`.
    pub fn contains(&self, code: &str) -> bool {
        code >= self.start.as_str() && code <= self.end.as_str()
    }
}

/// Assigns destinations to a [`Zone`].
///
/// Empty criterion lists place no constraint on that dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneRule {
    pub id: String,
    pub zone: Zone,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub postal_codes: Vec<String>,
    #[serde(default)]
    pub postal_ranges: Vec<PostalRange>,
    /// When set and a distance is known, the rule only matches shipments
    /// travelling at most this far.
    #[serde(default)]
    pub distance_threshold_km: Option<f64>,
}

impl ZoneRule {
    /// A rule with no criteria.
    pub fn new(id: impl Into<String>, zone: Zone) -> Self {
        Self {
            id: id.into(),
            zone,
            countries: Vec::new(),
            states: Vec::new(),
            postal_codes: Vec::new(),
            postal_ranges: Vec::new(),
            distance_threshold_km: None,
        }
    }

    /// Builder: set the country list.
    pub fn with_countries(mut self, countries: &[&str]) -> Self {
        self.countries = countries.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Builder: set the state list.
    pub fn with_states(mut self, states: &[&str]) -> Self {
        self.states = states.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Builder: set the exact postal-code list.
    pub fn with_postal_codes(mut self, codes: &[&str]) -> Self {
        self.postal_codes = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Builder: add a postal-code range.
    pub fn with_postal_range(mut self, start: &str, end: &str) -> Self {
        self.postal_ranges.push(PostalRange::new(start, end));
        self
    }

    /// Tie-break weight among matching rules: +2 for states, +1 for countries.
    pub fn specificity(&self) -> u8 {
        let mut score = 0;
        if !self.states.is_empty() {
            score += 2;
        }
        if !self.countries.is_empty() {
            score += 1;
        }
        score
    }
}

impl Rule for ZoneRule {
    const KIND: &'static str = "zone rule";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> RuleResult<()> {
        let (kind, id) = (Self::KIND, self.id.as_str());
        require(kind, id, "id", id)?;
        optional_non_negative(kind, id, "distance_threshold_km", self.distance_threshold_km)
    }

    fn slot(set: &RuleSet) -> &Vec<Self> {
        &set.zone_rules
    }

    fn slot_mut(set: &mut RuleSet) -> &mut Vec<Self> {
        &mut set.zone_rules
    }
}

// ---------------------------------------------------------------------------
// DeliveryTimeRule
// ---------------------------------------------------------------------------

/// Transit-time estimate for one (method, zone) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryTimeRule {
    pub id: String,
    pub method: ShippingMethod,
    pub zone: Zone,
    pub base_days: u32,
    #[serde(default)]
    pub weight_threshold: Option<Weight>,
    #[serde(default)]
    pub weight_delay_days: u32,
    #[serde(default)]
    pub distance_threshold_km: Option<f64>,
    #[serde(default)]
    pub distance_delay_days: u32,
    /// Extra days when dispatching on a Friday or Saturday.
    #[serde(default)]
    pub weekend_delay_days: u32,
}

impl DeliveryTimeRule {
    /// A rule with no delays.
    pub fn new(id: impl Into<String>, method: ShippingMethod, zone: Zone, base_days: u32) -> Self {
        Self {
            id: id.into(),
            method,
            zone,
            base_days,
            weight_threshold: None,
            weight_delay_days: 0,
            distance_threshold_km: None,
            distance_delay_days: 0,
            weekend_delay_days: 0,
        }
    }

    /// Builder: add a delay above a weight threshold.
    pub fn with_weight_delay(mut self, threshold: Weight, days: u32) -> Self {
        self.weight_threshold = Some(threshold);
        self.weight_delay_days = days;
        self
    }

    /// Builder: add a delay above a distance threshold.
    pub fn with_distance_delay(mut self, threshold_km: f64, days: u32) -> Self {
        self.distance_threshold_km = Some(threshold_km);
        self.distance_delay_days = days;
        self
    }

    /// Builder: add a weekend dispatch delay.
    pub fn with_weekend_delay(mut self, days: u32) -> Self {
        self.weekend_delay_days = days;
        self
    }
}

impl Rule for DeliveryTimeRule {
    const KIND: &'static str = "delivery time rule";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> RuleResult<()> {
        let (kind, id) = (Self::KIND, self.id.as_str());
        require(kind, id, "id", id)?;
        optional_weight(kind, id, "weight_threshold", &self.weight_threshold)?;
        optional_non_negative(kind, id, "distance_threshold_km", self.distance_threshold_km)?;
        transit_days(kind, id, "base_days", self.base_days)?;
        transit_days(kind, id, "weight_delay_days", self.weight_delay_days)?;
        transit_days(kind, id, "distance_delay_days", self.distance_delay_days)?;
        transit_days(kind, id, "weekend_delay_days", self.weekend_delay_days)
    }

    fn unique_key(&self) -> Option<String> {
        Some(format!("{}/{}", self.method, self.zone))
    }

    fn slot(set: &RuleSet) -> &Vec<Self> {
        &set.delivery_time_rules
    }

    fn slot_mut(set: &mut RuleSet) -> &mut Vec<Self> {
        &mut set.delivery_time_rules
    }
}

// ---------------------------------------------------------------------------
// ShippingRestriction
// ---------------------------------------------------------------------------

/// What a restriction inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionType {
    /// Destination country is listed.
    Destination,
    /// Any item's category is listed.
    ItemCategory,
    /// Any item is hazardous.
    Hazardous,
}

impl RestrictionType {
    /// Return the string representation of this restriction type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Destination => "destination",
            Self::ItemCategory => "item_category",
            Self::Hazardous => "hazardous",
        }
    }
}

impl std::fmt::Display for RestrictionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A condition under which a shipment cannot be quoted at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingRestriction {
    pub id: String,
    #[serde(rename = "type")]
    pub restriction_type: RestrictionType,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub message: String,
}

impl ShippingRestriction {
    /// Block shipments to any of `countries`.
    pub fn destination(id: impl Into<String>, countries: &[&str], message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            restriction_type: RestrictionType::Destination,
            countries: countries.iter().map(|c| c.to_string()).collect(),
            categories: Vec::new(),
            message: message.into(),
        }
    }

    /// Block shipments containing any of `categories`.
    pub fn item_category(
        id: impl Into<String>,
        categories: &[&str],
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            restriction_type: RestrictionType::ItemCategory,
            countries: Vec::new(),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            message: message.into(),
        }
    }

    /// Block shipments containing hazardous items.
    pub fn hazardous(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            restriction_type: RestrictionType::Hazardous,
            countries: Vec::new(),
            categories: Vec::new(),
            message: message.into(),
        }
    }
}

impl Rule for ShippingRestriction {
    const KIND: &'static str = "shipping restriction";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> RuleResult<()> {
        let (kind, id) = (Self::KIND, self.id.as_str());
        require(kind, id, "id", id)?;
        require(kind, id, "message", &self.message)
    }

    fn slot(set: &RuleSet) -> &Vec<Self> {
        &set.restrictions
    }

    fn slot_mut(set: &mut RuleSet) -> &mut Vec<Self> {
        &mut set.restrictions
    }
}

// ---------------------------------------------------------------------------
// FreeShippingRule
// ---------------------------------------------------------------------------

/// Qualifies an order for free shipping on its cheapest option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeShippingRule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub min_order_value: Option<f64>,
    #[serde(default)]
    pub min_weight: Option<Weight>,
    /// Empty allows every zone.
    #[serde(default)]
    pub zones: Vec<Zone>,
    /// Empty allows every category.
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub excluded_categories: Vec<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(flatten)]
    pub window: ValidityWindow,
}

impl FreeShippingRule {
    /// An active, unconditional rule.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            min_order_value: None,
            min_weight: None,
            zones: Vec::new(),
            categories: Vec::new(),
            excluded_categories: Vec::new(),
            active: true,
            window: ValidityWindow::always(),
        }
    }

    /// Builder: require a minimum order value.
    pub fn with_min_order_value(mut self, value: f64) -> Self {
        self.min_order_value = Some(value);
        self
    }

    /// Builder: restrict to zones.
    pub fn with_zones(mut self, zones: &[Zone]) -> Self {
        self.zones = zones.to_vec();
        self
    }

    /// Builder: exclude categories.
    pub fn excluding(mut self, categories: &[&str]) -> Self {
        self.excluded_categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Builder: limit the promotion to a validity window.
    pub fn with_window(mut self, window: ValidityWindow) -> Self {
        self.window = window;
        self
    }

    /// Whether the rule is switched on and `now` is inside its window.
    pub fn is_in_force(&self, now: DateTime<Utc>) -> bool {
        self.active && self.window.contains(now)
    }
}

impl Rule for FreeShippingRule {
    const KIND: &'static str = "free shipping rule";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> RuleResult<()> {
        let (kind, id) = (Self::KIND, self.id.as_str());
        require(kind, id, "id", id)?;
        require(kind, id, "name", &self.name)?;
        optional_non_negative(kind, id, "min_order_value", self.min_order_value)?;
        optional_weight(kind, id, "min_weight", &self.min_weight)?;
        window(kind, id, &self.window)
    }

    fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_in_force(now)
    }

    fn slot(set: &RuleSet) -> &Vec<Self> {
        &set.free_shipping_rules
    }

    fn slot_mut(set: &mut RuleSet) -> &mut Vec<Self> {
        &mut set.free_shipping_rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shiprate_core::{DimensionUnit, WeightUnit};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, day, 0, 0, 0).unwrap()
    }

    #[test]
    fn shipping_rule_requires_name() {
        let rule = ShippingRule::new("r1", "  ", ShippingMethod::Standard);
        let err = rule.validate().unwrap_err();
        assert!(matches!(err, RuleError::EmptyField { field: "name", .. }));
    }

    #[test]
    fn shipping_rule_rejects_negative_rate() {
        let rule = ShippingRule::new("r1", "Ground", ShippingMethod::Standard).with_pricing(5.0, -1.0);
        assert!(matches!(
            rule.validate(),
            Err(RuleError::InvalidValue { .. })
        ));
    }

    #[test]
    fn shipping_rule_rejects_inverted_window() {
        let rule = ShippingRule::new("r1", "Ground", ShippingMethod::Standard).with_window(
            ValidityWindow {
                valid_from: Some(at(20)),
                valid_until: Some(at(10)),
            },
        );
        assert!(matches!(
            rule.validate(),
            Err(RuleError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn shipping_rule_in_force_respects_active_flag() {
        let mut rule = ShippingRule::new("r1", "Ground", ShippingMethod::Standard);
        assert!(rule.is_in_force(at(1)));
        rule.active = false;
        assert!(!rule.is_in_force(at(1)));
    }

    #[test]
    fn shipping_rule_deserializes_flattened_window_and_defaults() {
        let yaml = r#"
id: ground
name: Ground
method: standard
zone: national
base_cost: 5.0
valid_from: 2026-01-01T00:00:00Z
surcharges:
  - type: fuel
    amount: 2.5
"#;
        let rule: ShippingRule = serde_yaml::from_str(yaml).unwrap();
        assert!(rule.active);
        assert_eq!(rule.zone, Some(Zone::National));
        assert_eq!(rule.window.valid_from, Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(rule.surcharges[0].kind, SurchargeKind::Fuel);
        assert!(!rule.surcharges[0].is_percentage);
        assert!(rule.validate().is_ok());
    }

    #[test]
    fn carrier_rule_zone_rates_serialize_with_zone_keys() {
        let rule = CarrierRule::new("ups-ground", "ups", "UPS", ShippingMethod::Standard)
            .with_zone_rate(Zone::International, 25.0);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["zone_rates"]["international"], 25.0);
    }

    #[test]
    fn carrier_rule_rejects_negative_dimension_limit() {
        let rule = CarrierRule::new("c", "x", "X", ShippingMethod::Express).with_limits(
            None,
            Some(Dimensions {
                length: 10.0,
                width: -1.0,
                height: 1.0,
                unit: DimensionUnit::Cm,
            }),
        );
        assert!(rule.validate().is_err());
    }

    #[test]
    fn carrier_rule_bounds_delivery_days() {
        let rule = CarrierRule::new("c", "ups", "UPS", ShippingMethod::Standard);
        assert!(rule.clone().with_delivery_days(MAX_TRANSIT_DAYS).validate().is_ok());
        let err = rule.with_delivery_days(u32::MAX).validate().unwrap_err();
        assert!(matches!(
            err,
            RuleError::InvalidValue {
                source: ValidationError::TooLarge { .. },
                ..
            }
        ));
        assert!(err.to_string().contains("delivery_days"));
    }

    #[test]
    fn carrier_display_name_falls_back() {
        let rule = CarrierRule::new("c", "fedex", "FedEx", ShippingMethod::Overnight);
        assert_eq!(rule.display_name(), "FedEx overnight");
    }

    #[test]
    fn postal_range_is_inclusive_and_lexicographic() {
        let range = PostalRange::new("90000", "90299");
        assert!(range.contains("90000"));
        assert!(range.contains("90299"));
        assert!(range.contains("901"));
        assert!(!range.contains("90300"));
    }

    #[test]
    fn zone_rule_specificity() {
        assert_eq!(ZoneRule::new("z", Zone::Local).specificity(), 0);
        assert_eq!(ZoneRule::new("z", Zone::Local).with_countries(&["US"]).specificity(), 1);
        assert_eq!(ZoneRule::new("z", Zone::Local).with_states(&["CA"]).specificity(), 2);
        assert_eq!(
            ZoneRule::new("z", Zone::Local)
                .with_countries(&["US"])
                .with_states(&["CA"])
                .specificity(),
            3
        );
    }

    #[test]
    fn delivery_time_rule_unique_key() {
        let rule = DeliveryTimeRule::new("d", ShippingMethod::Express, Zone::National, 2);
        assert_eq!(rule.unique_key().as_deref(), Some("express/national"));
    }

    #[test]
    fn delivery_time_rule_bounds_days_and_delays() {
        let ok = DeliveryTimeRule::new("d", ShippingMethod::Standard, Zone::Local, MAX_TRANSIT_DAYS)
            .with_weekend_delay(MAX_TRANSIT_DAYS);
        assert!(ok.validate().is_ok());

        let base = DeliveryTimeRule::new("d", ShippingMethod::Standard, Zone::Local, u32::MAX);
        assert!(base.validate().unwrap_err().to_string().contains("base_days"));

        let weekend = DeliveryTimeRule::new("d", ShippingMethod::Standard, Zone::Local, 2)
            .with_weekend_delay(u32::MAX);
        assert!(weekend.validate().unwrap_err().to_string().contains("weekend_delay_days"));

        let distance = DeliveryTimeRule::new("d", ShippingMethod::Standard, Zone::Local, 2)
            .with_distance_delay(500.0, MAX_TRANSIT_DAYS + 1);
        assert!(distance.validate().is_err());
    }

    #[test]
    fn delivery_time_rule_rejects_negative_threshold() {
        let rule = DeliveryTimeRule::new("d", ShippingMethod::Standard, Zone::Local, 1)
            .with_weight_delay(
                Weight {
                    value: -5.0,
                    unit: WeightUnit::Lb,
                },
                1,
            );
        assert!(rule.validate().is_err());
    }

    #[test]
    fn restriction_requires_message() {
        let r = ShippingRestriction::hazardous("h", "");
        assert!(matches!(
            r.validate(),
            Err(RuleError::EmptyField { field: "message", .. })
        ));
    }

    #[test]
    fn restriction_type_serializes_as_type() {
        let r = ShippingRestriction::item_category("c", &["batteries"], "no batteries");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["type"], "item_category");
    }

    #[test]
    fn free_shipping_rule_window() {
        let rule = FreeShippingRule::new("f", "Summer").with_min_order_value(50.0);
        assert!(rule.validate().is_ok());
        let expired = FreeShippingRule {
            window: ValidityWindow::between(at(1), at(2)).unwrap(),
            ..rule
        };
        assert!(!expired.is_in_force(at(3)));
    }

    #[test]
    fn surcharge_display_name_defaults_to_kind() {
        assert_eq!(Surcharge::fixed(SurchargeKind::Fragile, 3.0).display_name(), "fragile");
        assert_eq!(
            Surcharge::fixed(SurchargeKind::Fragile, 3.0)
                .named("Handle with care")
                .display_name(),
            "Handle with care"
        );
    }
}
