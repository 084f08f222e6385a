//! Locations and great-circle distances.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mean Earth radius (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine distance to `other` in kilometres.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.lat.to_radians().cos()
                * other.lat.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }
}

/// Location id → coordinates lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationTable {
    locations: HashMap<String, Coordinates>,
}

impl LocationTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a location.
    pub fn insert(&mut self, id: impl Into<String>, coords: Coordinates) {
        self.locations.insert(id.into(), coords);
    }

    /// Builder: adds a location and returns self.
    pub fn with_location(mut self, id: impl Into<String>, lat: f64, lon: f64) -> Self {
        self.insert(id, Coordinates::new(lat, lon));
        self
    }

    /// Coordinates for a location id.
    pub fn get(&self, id: &str) -> Option<&Coordinates> {
        self.locations.get(id)
    }

    /// Whether the location is known.
    pub fn contains(&self, id: &str) -> bool {
        self.locations.contains_key(id)
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        let p = Coordinates::new(48.7233, 2.3794);
        assert!(p.distance_km(&p).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_latitude() {
        // 1 degree of latitude ≈ 111.19 km on a 6371 km sphere
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(1.0, 0.0);
        assert!((a.distance_km(&b) - 111.195).abs() < 0.01);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = Coordinates::new(49.0097, 2.5479);
        let b = Coordinates::new(48.7262, 2.3652);
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-9);
        // CDG ↔ ORY, roughly 35 km
        assert!((a.distance_km(&b) - 34.9).abs() < 1.0);
    }

    #[test]
    fn test_location_table() {
        let table = LocationTable::new()
            .with_location("GATE-1", 49.0, 2.5)
            .with_location("GATE-2", 49.001, 2.5);
        assert_eq!(table.len(), 2);
        assert!(table.contains("GATE-1"));
        assert!(table.get("GATE-3").is_none());
    }
}
