//! Duration prediction.
//!
//! Scales a task's planner estimate by four multiplicative factors:
//!
//! | Factor | Source | Neutral value |
//! |--------|--------|---------------|
//! | aircraft complexity | subject type lookup table | 1.0 (unknown type) |
//! | weather impact | weather snapshot + task sensitivity | 1.0 |
//! | team experience | worker experience score | 1.0 (no data) |
//! | historical average | mean of past durations / 90 min | 1.0 (no samples) |
//!
//! Missing inputs never fail a prediction; they lower its confidence.

mod history;
mod predictor;

pub use history::HistoricalDurations;
pub use predictor::{DurationPredictor, PredictionContext};

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Result, ScheduleError};

/// Reference duration the historical mean is normalized against (minutes).
pub const HISTORICAL_REFERENCE_MINUTES: f64 = 90.0;

/// Multiplier for weather-sensitive tasks in adverse conditions.
pub const ADVERSE_WEATHER_MULTIPLIER: f64 = 1.3;

/// Which factors are active and how they are parameterized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionConfig {
    /// Master switch. When off, predictions equal the baseline.
    pub enabled: bool,
    /// Apply the aircraft complexity factor.
    pub aircraft_complexity: bool,
    /// Apply the weather factor.
    pub weather: bool,
    /// Apply the team experience factor.
    pub team_experience: bool,
    /// Apply the historical average factor.
    pub historical: bool,
    /// Subject type → complexity multiplier.
    pub complexity: HashMap<String, f64>,
    /// Reference for the historical factor (minutes).
    pub historical_reference_minutes: f64,
    /// Weather factor for sensitive tasks in adverse conditions.
    pub adverse_weather_multiplier: f64,
    /// Run batch predictions on the rayon pool.
    pub parallel: bool,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            aircraft_complexity: true,
            weather: true,
            team_experience: true,
            historical: true,
            complexity: default_complexity_table(),
            historical_reference_minutes: HISTORICAL_REFERENCE_MINUTES,
            adverse_weather_multiplier: ADVERSE_WEATHER_MULTIPLIER,
            parallel: true,
        }
    }
}

impl PredictionConfig {
    /// Configuration with prediction switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Whether any factor would actually be applied.
    pub fn is_active(&self) -> bool {
        self.enabled
            && (self.aircraft_complexity || self.weather || self.team_experience || self.historical)
    }

    /// Adds or replaces a complexity multiplier.
    pub fn with_complexity(mut self, subject_type: impl Into<String>, multiplier: f64) -> Self {
        self.complexity.insert(subject_type.into(), multiplier);
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.historical_reference_minutes <= 0.0 {
            return Err(ScheduleError::InvalidConfig(
                "historical_reference_minutes must be positive".into(),
            ));
        }
        if self.adverse_weather_multiplier <= 0.0 {
            return Err(ScheduleError::InvalidConfig(
                "adverse_weather_multiplier must be positive".into(),
            ));
        }
        if let Some((name, value)) = self.complexity.iter().find(|(_, v)| **v <= 0.0) {
            return Err(ScheduleError::InvalidConfig(format!(
                "complexity multiplier for '{name}' must be positive, got {value}"
            )));
        }
        Ok(())
    }
}

/// Complexity multipliers for common airframes, narrow-body A320 = 1.0.
fn default_complexity_table() -> HashMap<String, f64> {
    [
        ("ATR72", 0.7),
        ("E190", 0.8),
        ("A220", 0.85),
        ("A319", 0.95),
        ("A320", 1.0),
        ("B737", 1.0),
        ("A321", 1.1),
        ("B757", 1.2),
        ("A330", 1.5),
        ("B787", 1.5),
        ("A350", 1.6),
        ("B777", 1.7),
        ("A380", 2.2),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}
