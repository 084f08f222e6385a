//! Symmetric travel matrix between task locations.

use std::collections::HashMap;

use crate::models::LocationTable;

/// Pairwise distances and travel times between a fixed set of locations.
///
/// Locations without coordinates are kept in the index but are treated as
/// zero distance from everything.
#[derive(Debug, Clone, Default)]
pub struct TravelMatrix {
    index: HashMap<String, usize>,
    distances_km: Vec<Vec<f64>>,
    minutes: Vec<Vec<i64>>,
}

impl TravelMatrix {
    /// Builds the matrix over the distinct ids in `location_ids`.
    pub fn build<'a, I>(location_ids: I, table: &LocationTable, minutes_per_km: f64) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index = HashMap::new();
        let mut coords = Vec::new();
        for id in location_ids {
            if !index.contains_key(id) {
                index.insert(id.to_string(), coords.len());
                coords.push(table.get(id).copied());
            }
        }

        let n = coords.len();
        let mut distances_km = vec![vec![0.0; n]; n];
        let mut minutes = vec![vec![0; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                if let (Some(a), Some(b)) = (coords[i], coords[j]) {
                    let km = a.distance_km(&b);
                    let min = (km * minutes_per_km).round() as i64;
                    distances_km[i][j] = km;
                    distances_km[j][i] = km;
                    minutes[i][j] = min;
                    minutes[j][i] = min;
                }
            }
        }

        Self {
            index,
            distances_km,
            minutes,
        }
    }

    /// Distance between two locations (km), 0 if either is unknown.
    pub fn distance_km(&self, from: &str, to: &str) -> f64 {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&i), Some(&j)) => self.distances_km[i][j],
            _ => 0.0,
        }
    }

    /// Travel time between two locations (minutes), 0 if either is unknown.
    pub fn travel_minutes(&self, from: &str, to: &str) -> i64 {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&i), Some(&j)) => self.minutes[i][j],
            _ => 0,
        }
    }

    /// Number of indexed locations.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether no location is indexed.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
