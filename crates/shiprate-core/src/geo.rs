//! # Addresses and Great-Circle Distance
//!
//! Postal addresses with optional decimal-degree coordinates, and the
//! Haversine distance between two of them on a spherical Earth.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the Haversine formula, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A postal address.
///
/// Coordinates are optional. An address whose latitude and longitude are
/// both exactly zero is treated as having no coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Street lines, first line first.
    #[serde(default)]
    pub street: Vec<String>,
    /// City or locality.
    #[serde(default)]
    pub city: String,
    /// State, province, or region.
    #[serde(default)]
    pub state: String,
    /// Postal or ZIP code.
    #[serde(default)]
    pub postal_code: String,
    /// Country code (e.g. ISO 3166-1 alpha-2).
    #[serde(default)]
    pub country: String,
    /// Latitude in decimal degrees.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Address {
    /// Create an address from its locality fields, without street lines or
    /// coordinates.
    pub fn new(
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: Vec::new(),
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
            country: country.into(),
            latitude: None,
            longitude: None,
        }
    }

    /// Builder: set coordinates.
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Builder: append a street line.
    pub fn with_street(mut self, line: impl Into<String>) -> Self {
        self.street.push(line.into());
        self
    }

    /// The address's `(latitude, longitude)`, if it carries usable coordinates.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.latitude.unwrap_or(0.0);
        let lon = self.longitude.unwrap_or(0.0);
        if lat == 0.0 && lon == 0.0 {
            return None;
        }
        Some((lat, lon))
    }
}

/// Haversine distance between two coordinate pairs, in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Great-circle distance between two addresses in kilometers, or `None` when
/// either address lacks coordinates.
pub fn distance_km(origin: &Address, destination: &Address) -> Option<f64> {
    Some(haversine_km(origin.coordinates()?, destination.coordinates()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn los_angeles() -> Address {
        Address::new("Los Angeles", "CA", "90001", "US").with_coordinates(34.0522, -118.2437)
    }

    fn new_york() -> Address {
        Address::new("New York", "NY", "10001", "US").with_coordinates(40.7128, -74.0060)
    }

    #[test]
    fn los_angeles_to_new_york() {
        let d = distance_km(&los_angeles(), &new_york()).unwrap();
        assert!((3935.0..=3945.0).contains(&d), "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = distance_km(&los_angeles(), &new_york()).unwrap();
        let b = distance_km(&new_york(), &los_angeles()).unwrap();
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn same_point_is_zero() {
        let d = distance_km(&new_york(), &new_york()).unwrap();
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn missing_coordinates_yield_none() {
        let bare = Address::new("Austin", "TX", "73301", "US");
        assert!(distance_km(&bare, &new_york()).is_none());
        assert!(distance_km(&new_york(), &bare).is_none());
    }

    #[test]
    fn zero_coordinates_mean_absent() {
        let null_island = Address::new("", "", "", "").with_coordinates(0.0, 0.0);
        assert!(null_island.coordinates().is_none());
        assert!(distance_km(&null_island, &new_york()).is_none());
    }

    #[test]
    fn single_zero_axis_is_still_a_coordinate() {
        let equator = Address::new("Quito", "", "", "EC").with_coordinates(0.0, -78.4678);
        assert_eq!(equator.coordinates(), Some((0.0, -78.4678)));
    }

    #[test]
    fn address_deserializes_with_missing_fields() {
        let addr: Address = serde_json::from_str(r#"{"country": "DE"}"#).unwrap();
        assert_eq!(addr.country, "DE");
        assert!(addr.street.is_empty());
        assert!(addr.coordinates().is_none());
    }
}
