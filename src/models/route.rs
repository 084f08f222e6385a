//! Per-worker route model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One stop in a worker's route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteStop {
    /// Position in the route (1-based).
    pub sequence: u32,
    /// Task served at this stop.
    pub task_id: String,
    /// Location of the task.
    pub location_id: String,
    /// Travel from the previous stop (minutes, 0 for the first stop).
    pub travel_minutes: i64,
    /// Distance from the previous stop (km).
    pub distance_km: f64,
    /// Arrival at the stop.
    pub arrival: NaiveDateTime,
    /// Departure once the task is done.
    pub departure: NaiveDateTime,
}

/// An ordered route for one worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteOptimization {
    /// Worker the route belongs to.
    pub worker_id: String,
    /// Stops in visiting order.
    pub stops: Vec<RouteStop>,
    /// Sum of leg distances (km).
    pub total_distance_km: f64,
    /// Sum of leg travel times (minutes).
    pub total_travel_minutes: i64,
    /// Travel efficiency (0 to 100).
    pub efficiency: f64,
}

impl RouteOptimization {
    /// Task ids in visiting order.
    pub fn task_order(&self) -> Vec<&str> {
        self.stops.iter().map(|s| s.task_id.as_str()).collect()
    }

    /// Number of stops.
    pub fn stop_count(&self) -> usize {
        self.stops.len()
    }
}
