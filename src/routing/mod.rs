//! Per-worker route sequencing.
//!
//! Orders each worker's tasks to keep walking/driving between stands
//! short. The nearest-neighbor construction is O(n²) per worker and is an
//! approximation; an optional 2-opt pass tightens small routes.
//!
//! # Travel model
//! Distances are great-circle (haversine) kilometres between location
//! coordinates; travel minutes are `round(km × minutes_per_km)`.
//!
//! # References
//! - Rosenkrantz, Stearns & Lewis (1977), "An Analysis of Several
//!   Heuristics for the Traveling Salesman Problem"
//! - Croes (1958), "A Method for Solving Traveling-Salesman Problems"

mod matrix;
mod optimizer;
mod two_opt;

pub use matrix::TravelMatrix;
pub use optimizer::RouteOptimizer;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Route optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Travel minutes per kilometre.
    pub minutes_per_km: f64,
    /// Travel per task considered acceptable when rating efficiency.
    pub acceptable_travel_minutes_per_task: f64,
    /// Run a 2-opt improvement pass after nearest neighbor.
    pub two_opt: bool,
    /// Routes longer than this skip 2-opt.
    pub two_opt_max_stops: usize,
    /// Optimize workers' routes on the rayon pool.
    pub parallel: bool,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            minutes_per_km: 2.0,
            acceptable_travel_minutes_per_task: 30.0,
            two_opt: false,
            two_opt_max_stops: 50,
            parallel: true,
        }
    }
}

impl RouteConfig {
    /// Enables the 2-opt pass.
    pub fn with_two_opt(mut self, enabled: bool) -> Self {
        self.two_opt = enabled;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.minutes_per_km < 0.0 || !self.minutes_per_km.is_finite() {
            return Err(ScheduleError::InvalidConfig(
                "minutes_per_km must be a non-negative number".into(),
            ));
        }
        if self.acceptable_travel_minutes_per_task <= 0.0 {
            return Err(ScheduleError::InvalidConfig(
                "acceptable_travel_minutes_per_task must be positive".into(),
            ));
        }
        Ok(())
    }
}
