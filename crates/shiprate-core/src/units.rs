//! # Units of Measure
//!
//! Weight and linear-dimension value objects with fixed-factor conversion.
//!
//! Weights pivot through grams and lengths pivot through centimeters: a
//! conversion from unit A to unit B first scales A into the pivot unit and
//! then divides by B's factor. Converting between equal units returns the
//! value untouched so that no floating-point drift is introduced.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Grams per pound.
pub const GRAMS_PER_POUND: f64 = 453.592;
/// Grams per ounce.
pub const GRAMS_PER_OUNCE: f64 = 28.3495;
/// Centimeters per inch.
pub const CM_PER_INCH: f64 = 2.54;
/// Centimeters per foot.
pub const CM_PER_FOOT: f64 = 30.48;

// ---------------------------------------------------------------------------
// Weight
// ---------------------------------------------------------------------------

/// A unit of mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    /// Kilograms.
    Kg,
    /// Pounds.
    Lb,
    /// Grams (pivot unit).
    G,
    /// Ounces.
    Oz,
}

impl WeightUnit {
    /// Return the string representation of this unit.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lb => "lb",
            Self::G => "g",
            Self::Oz => "oz",
        }
    }

    /// Return all weight unit variants.
    pub fn all() -> &'static [WeightUnit] {
        &[Self::Kg, Self::Lb, Self::G, Self::Oz]
    }

    /// Grams in one of this unit.
    pub fn grams_per_unit(&self) -> f64 {
        match self {
            Self::Kg => 1000.0,
            Self::Lb => GRAMS_PER_POUND,
            Self::G => 1.0,
            Self::Oz => GRAMS_PER_OUNCE,
        }
    }
}

impl std::fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a raw weight value between units.
pub fn convert_weight(value: f64, from: WeightUnit, to: WeightUnit) -> f64 {
    if from == to {
        return value;
    }
    value * from.grams_per_unit() / to.grams_per_unit()
}

/// An immutable weight: a non-negative magnitude with a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    /// Magnitude in `unit`.
    pub value: f64,
    /// Unit of `value`.
    pub unit: WeightUnit,
}

impl Weight {
    /// Create a weight, rejecting negative or non-finite magnitudes.
    pub fn new(value: f64, unit: WeightUnit) -> Result<Self, ValidationError> {
        ValidationError::check_non_negative("weight", value)?;
        Ok(Self { value, unit })
    }

    /// Shorthand for a weight in kilograms. Does not validate.
    pub fn kg(value: f64) -> Self {
        Self {
            value,
            unit: WeightUnit::Kg,
        }
    }

    /// Re-check the non-negativity invariant (e.g. after deserialization).
    pub fn validate(&self, field: &str) -> Result<(), ValidationError> {
        ValidationError::check_non_negative(field, self.value)
    }

    /// This weight's magnitude expressed in `unit`.
    pub fn convert_to(&self, unit: WeightUnit) -> f64 {
        convert_weight(self.value, self.unit, unit)
    }

    /// This weight's magnitude in kilograms.
    pub fn in_kilograms(&self) -> f64 {
        self.convert_to(WeightUnit::Kg)
    }
}

impl std::fmt::Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

// ---------------------------------------------------------------------------
// Dimensions
// ---------------------------------------------------------------------------

/// A unit of length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionUnit {
    /// Centimeters (pivot unit).
    Cm,
    /// Inches.
    In,
    /// Meters.
    M,
    /// Feet.
    Ft,
}

impl DimensionUnit {
    /// Return the string representation of this unit.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cm => "cm",
            Self::In => "in",
            Self::M => "m",
            Self::Ft => "ft",
        }
    }

    /// Return all dimension unit variants.
    pub fn all() -> &'static [DimensionUnit] {
        &[Self::Cm, Self::In, Self::M, Self::Ft]
    }

    /// Centimeters in one of this unit.
    pub fn cm_per_unit(&self) -> f64 {
        match self {
            Self::Cm => 1.0,
            Self::In => CM_PER_INCH,
            Self::M => 100.0,
            Self::Ft => CM_PER_FOOT,
        }
    }
}

impl std::fmt::Display for DimensionUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a raw length value between units.
pub fn convert_dimension(value: f64, from: DimensionUnit, to: DimensionUnit) -> f64 {
    if from == to {
        return value;
    }
    value * from.cm_per_unit() / to.cm_per_unit()
}

/// Package dimensions (length × width × height) in a single unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Length in `unit`.
    pub length: f64,
    /// Width in `unit`.
    pub width: f64,
    /// Height in `unit`.
    pub height: f64,
    /// Unit of all three measurements.
    pub unit: DimensionUnit,
}

impl Dimensions {
    /// Create dimensions, rejecting negative or non-finite measurements.
    pub fn new(
        length: f64,
        width: f64,
        height: f64,
        unit: DimensionUnit,
    ) -> Result<Self, ValidationError> {
        let dims = Self {
            length,
            width,
            height,
            unit,
        };
        dims.validate("dimensions")?;
        Ok(dims)
    }

    /// Shorthand for dimensions in centimeters. Does not validate.
    pub fn cm(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
            unit: DimensionUnit::Cm,
        }
    }

    /// Re-check the non-negativity invariant on all three axes.
    pub fn validate(&self, field: &str) -> Result<(), ValidationError> {
        ValidationError::check_non_negative(&format!("{field}.length"), self.length)?;
        ValidationError::check_non_negative(&format!("{field}.width"), self.width)?;
        ValidationError::check_non_negative(&format!("{field}.height"), self.height)
    }

    /// The same box expressed in `unit`.
    pub fn convert_to(&self, unit: DimensionUnit) -> Dimensions {
        Dimensions {
            length: convert_dimension(self.length, self.unit, unit),
            width: convert_dimension(self.width, self.unit, unit),
            height: convert_dimension(self.height, self.unit, unit),
            unit,
        }
    }

    /// The same box in centimeters.
    pub fn in_centimeters(&self) -> Dimensions {
        self.convert_to(DimensionUnit::Cm)
    }

    /// Volume in cubic centimeters.
    pub fn volume_cm3(&self) -> f64 {
        let cm = self.in_centimeters();
        cm.length * cm.width * cm.height
    }

    /// Whether every axis of `self` is within the matching axis of `limit`,
    /// compared in centimeters.
    pub fn fits_within(&self, limit: &Dimensions) -> bool {
        let own = self.in_centimeters();
        let max = limit.in_centimeters();
        own.length <= max.length && own.width <= max.width && own.height <= max.height
    }

    /// Whether any axis of `self` strictly exceeds the matching axis of
    /// `limit`, compared in centimeters.
    pub fn exceeds_any(&self, limit: &Dimensions) -> bool {
        let own = self.in_centimeters();
        let max = limit.in_centimeters();
        own.length > max.length || own.width > max.width || own.height > max.height
    }
}
