//! Duration prediction inputs and outputs.

use serde::{Deserialize, Serialize};

/// Observed or forecast weather condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Storm,
    Fog,
    HighWind,
}

impl WeatherCondition {
    /// Whether outdoor cleaning is slowed down by this condition.
    pub fn is_adverse(self) -> bool {
        matches!(
            self,
            WeatherCondition::Rain
                | WeatherCondition::Snow
                | WeatherCondition::Storm
                | WeatherCondition::Fog
                | WeatherCondition::HighWind
        )
    }
}

/// Weather at planning time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Condition.
    pub condition: WeatherCondition,
    /// Trust in the observation (0.0 to 1.0).
    pub reliability: f64,
}

impl WeatherSnapshot {
    /// Creates a snapshot, clamping reliability into [0, 1].
    pub fn new(condition: WeatherCondition, reliability: f64) -> Self {
        Self {
            condition,
            reliability: reliability.clamp(0.0, 1.0),
        }
    }
}

/// Multipliers applied to the baseline duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionFactors {
    pub aircraft_complexity: f64,
    pub weather_impact: f64,
    pub team_experience: f64,
    pub historical_average: f64,
}

impl PredictionFactors {
    /// All factors at 1.0.
    pub fn neutral() -> Self {
        Self {
            aircraft_complexity: 1.0,
            weather_impact: 1.0,
            team_experience: 1.0,
            historical_average: 1.0,
        }
    }

    /// Product of all factors.
    pub fn combined(&self) -> f64 {
        self.aircraft_complexity
            * self.weather_impact
            * self.team_experience
            * self.historical_average
    }
}

impl Default for PredictionFactors {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Predicted duration for one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePrediction {
    /// Task being predicted.
    pub task_id: String,
    /// Planner estimate (minutes).
    pub baseline_minutes: i64,
    /// Model output (minutes, >= 0).
    pub predicted_minutes: i64,
    /// Factor breakdown.
    pub factors: PredictionFactors,
    /// Trust in the prediction (0 to 100).
    pub confidence: u8,
}
