//! # Shipments
//!
//! Line items and their aggregation into the figures every downstream stage
//! prices against: total actual weight, total declared value, and total
//! dimensional (volumetric) weight.
//!
//! A line item with quantity 0 counts as quantity 1 in all three totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shiprate_core::{Address, Dimensions, ValidationError, Weight, Zone};

/// Cubic centimeters per kilogram of dimensional weight.
pub const DIMENSIONAL_DIVISOR_CM3_PER_KG: f64 = 5000.0;

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Units of this item; 0 is treated as 1.
    #[serde(default)]
    pub quantity: u32,
    /// Weight of a single unit.
    pub weight: Weight,
    /// Size of a single unit, if known.
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    /// Declared value of a single unit.
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub is_fragile: bool,
    #[serde(default)]
    pub is_hazardous: bool,
    #[serde(default)]
    pub requires_cold_chain: bool,
}

impl ShippingItem {
    /// A single unit with the given weight and value.
    pub fn new(id: impl Into<String>, weight: Weight, value: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            quantity: 1,
            weight,
            dimensions: None,
            value,
            category: String::new(),
            is_fragile: false,
            is_hazardous: false,
            requires_cold_chain: false,
        }
    }

    /// Builder: set quantity.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Builder: set dimensions.
    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Builder: set category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder: mark fragile.
    pub fn fragile(mut self) -> Self {
        self.is_fragile = true;
        self
    }

    /// Builder: mark hazardous.
    pub fn hazardous(mut self) -> Self {
        self.is_hazardous = true;
        self
    }

    /// Quantity with the zero-means-one default applied.
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.max(1)
    }

    /// Check weight, dimensions, and value are non-negative.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.weight.validate("weight")?;
        if let Some(dims) = &self.dimensions {
            dims.validate("dimensions")?;
        }
        ValidationError::check_non_negative("value", self.value)
    }
}

/// Total weight of all items, in kilograms.
pub fn total_weight_kg(items: &[ShippingItem]) -> f64 {
    items
        .iter()
        .map(|item| item.weight.in_kilograms() * f64::from(item.effective_quantity()))
        .sum()
}

/// Total declared value of all items.
pub fn total_value(items: &[ShippingItem]) -> f64 {
    items
        .iter()
        .map(|item| item.value * f64::from(item.effective_quantity()))
        .sum()
}

/// Total dimensional weight of all items, in kilograms. Items without
/// dimensions contribute nothing.
pub fn dimensional_weight_kg(items: &[ShippingItem]) -> f64 {
    items
        .iter()
        .filter_map(|item| {
            let dims = item.dimensions.as_ref()?;
            Some(dims.volume_cm3() / DIMENSIONAL_DIVISOR_CM3_PER_KG * f64::from(item.effective_quantity()))
        })
        .sum()
}

/// Whether `code` appears in `list`, ignoring ASCII case.
///
/// Country codes, state codes, and item categories are all compared this way.
pub fn code_listed(list: &[String], code: &str) -> bool {
    list.iter().any(|c| c.eq_ignore_ascii_case(code))
}

/// Whether the list contains an item in any of `categories`.
pub fn has_category(items: &[ShippingItem], categories: &[String]) -> bool {
    items.iter().any(|item| code_listed(categories, &item.category))
}

/// Everything a rule needs to know about the shipment being quoted.
///
/// Built once per calculation; all pricing stages read from it.
#[derive(Debug, Clone)]
pub struct Shipment<'a> {
    pub items: &'a [ShippingItem],
    pub origin: &'a Address,
    pub destination: &'a Address,
    pub zone: Zone,
    pub distance_km: Option<f64>,
    pub total_weight_kg: f64,
    pub total_value: f64,
    pub dimensional_weight_kg: f64,
    pub now: DateTime<Utc>,
}

impl<'a> Shipment<'a> {
    /// Aggregate `items` for a shipment already placed in `zone`.
    pub fn new(
        items: &'a [ShippingItem],
        origin: &'a Address,
        destination: &'a Address,
        zone: Zone,
        distance_km: Option<f64>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            items,
            origin,
            destination,
            zone,
            distance_km,
            total_weight_kg: total_weight_kg(items),
            total_value: total_value(items),
            dimensional_weight_kg: dimensional_weight_kg(items),
            now,
        }
    }

    /// Whether any item is fragile.
    pub fn has_fragile(&self) -> bool {
        self.items.iter().any(|i| i.is_fragile)
    }

    /// Whether any item is hazardous.
    pub fn has_hazardous(&self) -> bool {
        self.items.iter().any(|i| i.is_hazardous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiprate_core::{DimensionUnit, WeightUnit};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn total_weight_mixes_units_and_quantities() {
        let items = vec![
            ShippingItem::new("a", Weight::kg(1.0), 10.0).with_quantity(2),
            ShippingItem::new("b", Weight::new(500.0, WeightUnit::G).unwrap(), 5.0),
        ];
        assert!(close(total_weight_kg(&items), 2.5));
    }

    #[test]
    fn zero_quantity_counts_as_one_for_weight() {
        let items = vec![ShippingItem::new("a", Weight::kg(3.0), 0.0).with_quantity(0)];
        assert!(close(total_weight_kg(&items), 3.0));
    }

    #[test]
    fn zero_quantity_counts_as_one_for_value() {
        // Weight and value aggregation agree on the quantity default.
        let items = vec![ShippingItem::new("a", Weight::kg(1.0), 40.0).with_quantity(0)];
        assert!(close(total_value(&items), 40.0));
    }

    #[test]
    fn total_value_multiplies_quantity() {
        let items = vec![
            ShippingItem::new("a", Weight::kg(1.0), 19.99).with_quantity(3),
            ShippingItem::new("b", Weight::kg(1.0), 0.03),
        ];
        assert!(close(total_value(&items), 60.0));
    }

    #[test]
    fn dimensional_weight_of_single_box() {
        let items = vec![ShippingItem::new("a", Weight::kg(0.2), 0.0)
            .with_dimensions(Dimensions::cm(30.0, 20.0, 10.0))];
        assert!(close(dimensional_weight_kg(&items), 1.2));
    }

    #[test]
    fn dimensional_weight_converts_inches() {
        let dims = Dimensions::new(10.0, 10.0, 10.0, DimensionUnit::In).unwrap();
        let items = vec![ShippingItem::new("a", Weight::kg(0.2), 0.0)
            .with_dimensions(dims)
            .with_quantity(2)];
        let expected = 2.0 * (25.4f64.powi(3)) / 5000.0;
        assert!((dimensional_weight_kg(&items) - expected).abs() < 1e-6);
    }

    #[test]
    fn items_without_dimensions_have_no_dimensional_weight() {
        let items = vec![ShippingItem::new("a", Weight::kg(5.0), 0.0)];
        assert_eq!(dimensional_weight_kg(&items), 0.0);
    }

    #[test]
    fn has_category_is_case_insensitive() {
        let items = vec![ShippingItem::new("a", Weight::kg(1.0), 1.0).with_category("Books")];
        assert!(has_category(&items, &["books".to_string()]));
        assert!(!has_category(&items, &["toys".to_string()]));
        assert!(!has_category(&items, &[]));
    }

    #[test]
    fn validate_rejects_negative_value() {
        let item = ShippingItem::new("a", Weight::kg(1.0), -1.0);
        assert!(item.validate().is_err());
    }

    #[test]
    fn item_deserializes_with_defaults() {
        let item: ShippingItem = serde_json::from_str(
            r#"{"id": "sku-1", "weight": {"value": 2.0, "unit": "lb"}, "value": 12.5}"#,
        )
        .unwrap();
        assert_eq!(item.quantity, 0);
        assert_eq!(item.effective_quantity(), 1);
        assert!(item.dimensions.is_none());
        assert!(!item.is_hazardous);
    }
}
