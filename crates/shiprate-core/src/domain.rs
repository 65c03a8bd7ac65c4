//! # Shipping Zones and Methods
//!
//! The two closed vocabularies every rule family keys on. Both are exhaustive
//! enums, so adding a zone or a method forces every `match` in the workspace
//! to handle it.

use serde::{Deserialize, Serialize};

/// A coarse geographic bucket driving shipping price tiers.
///
/// Variants are ordered from nearest to farthest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Same city (or no finer distinction available).
    Local,
    /// Same state, different city.
    Regional,
    /// Same country, different state.
    National,
    /// Different country.
    International,
}

impl Zone {
    /// Return the string representation of this zone.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Regional => "regional",
            Self::National => "national",
            Self::International => "international",
        }
    }

    /// Return all zones, nearest first.
    pub fn all() -> &'static [Zone] {
        &[
            Self::Local,
            Self::Regional,
            Self::National,
            Self::International,
        ]
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Zone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::all()
            .iter()
            .copied()
            .find(|z| z.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown zone: {s:?}"))
    }
}

/// A shipping service level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    /// Ground service.
    Standard,
    /// Expedited service.
    Express,
    /// Next-day service.
    Overnight,
    /// Delivered on the day of dispatch.
    #[serde(alias = "same-day")]
    SameDay,
    /// Customer collects from a pickup point.
    Pickup,
    /// Deferred, lowest-priority service.
    Economy,
    /// Palletised or bulk freight.
    Freight,
}

impl ShippingMethod {
    /// Return the string representation of this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Overnight => "overnight",
            Self::SameDay => "same_day",
            Self::Pickup => "pickup",
            Self::Economy => "economy",
            Self::Freight => "freight",
        }
    }

    /// Return all shipping methods.
    pub fn all() -> &'static [ShippingMethod] {
        &[
            Self::Standard,
            Self::Express,
            Self::Overnight,
            Self::SameDay,
            Self::Pickup,
            Self::Economy,
            Self::Freight,
        ]
    }
}

impl std::fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShippingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('-', "_");
        ShippingMethod::all()
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| format!("unknown shipping method: {s:?}"))
    }
}
