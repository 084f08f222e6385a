//! Engine configuration.
//!
//! All tunables are passed explicitly at engine construction. Every field
//! has a default, so a TOML document only needs the keys it overrides:
//!
//! ```
//! use crew_schedule::config::EngineConfig;
//! use crew_schedule::dispatching::Algorithm;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     algorithm = "efficiency"
//!     workday_start = "07:30:00"
//!
//!     [prediction]
//!     weather = false
//! "#).unwrap();
//! assert_eq!(config.algorithm, Algorithm::Efficiency);
//! assert!(!config.prediction.weather);
//! ```

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::dispatching::Algorithm;
use crate::error::{Result, ScheduleError};
use crate::prediction::PredictionConfig;
use crate::routing::RouteConfig;
use crate::scheduler::SelectionPolicy;

/// Default number of schedules kept in history.
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

/// Default longest accepted task estimate (minutes): one full day.
pub const DEFAULT_MAX_TASK_MINUTES: i64 = 24 * 60;

/// Default task count above which the engine degrades to pool-order assignment.
pub const DEFAULT_DEGRADE_THRESHOLD: usize = 2000;

/// Top-level configuration of a [`SchedulingEngine`](crate::scheduler::SchedulingEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Task ordering algorithm.
    pub algorithm: Algorithm,
    /// Earliest start of any task.
    pub workday_start: NaiveTime,
    /// Latest end of any task. `None` = open-ended day.
    pub workday_end: Option<NaiveTime>,
    /// How a worker is picked among eligible candidates.
    pub selection: SelectionPolicy,
    /// Task count above which assignment falls back to pool order and
    /// route improvement is skipped.
    pub degrade_threshold: usize,
    /// Longest accepted task estimate (minutes); longer tasks are rejected.
    pub max_task_minutes: i64,
    /// Number of schedules retained by [`ScheduleHistory`](crate::history::ScheduleHistory).
    pub history_limit: usize,
    /// Wall-clock budget for one run (ms).
    pub timeout_ms: Option<u64>,
    /// Re-sequence each worker's tasks along the optimized route.
    pub apply_routes: bool,
    /// Duration predictor settings.
    pub prediction: PredictionConfig,
    /// Route optimizer settings.
    pub route: RouteConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            workday_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or_default(),
            workday_end: None,
            selection: SelectionPolicy::default(),
            degrade_threshold: DEFAULT_DEGRADE_THRESHOLD,
            max_task_minutes: DEFAULT_MAX_TASK_MINUTES,
            history_limit: DEFAULT_HISTORY_LIMIT,
            timeout_ms: None,
            apply_routes: true,
            prediction: PredictionConfig::default(),
            route: RouteConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parses a TOML document and validates it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Sets the workday start.
    pub fn with_workday_start(mut self, start: NaiveTime) -> Self {
        self.workday_start = start;
        self
    }

    /// Sets the workday end.
    pub fn with_workday_end(mut self, end: NaiveTime) -> Self {
        self.workday_end = Some(end);
        self
    }

    /// Sets the worker selection policy.
    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the degrade threshold.
    pub fn with_degrade_threshold(mut self, threshold: usize) -> Self {
        self.degrade_threshold = threshold;
        self
    }

    /// Sets the longest accepted task estimate.
    pub fn with_max_task_minutes(mut self, minutes: i64) -> Self {
        self.max_task_minutes = minutes;
        self
    }

    /// Sets the run timeout.
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Enables or disables route re-sequencing.
    pub fn with_apply_routes(mut self, apply: bool) -> Self {
        self.apply_routes = apply;
        self
    }

    /// Sets predictor settings.
    pub fn with_prediction(mut self, prediction: PredictionConfig) -> Self {
        self.prediction = prediction;
        self
    }

    /// Sets route settings.
    pub fn with_route(mut self, route: RouteConfig) -> Self {
        self.route = route;
        self
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.history_limit == 0 {
            return Err(ScheduleError::InvalidConfig(
                "history_limit must be at least 1".into(),
            ));
        }
        if self.max_task_minutes <= 0 {
            return Err(ScheduleError::InvalidConfig(format!(
                "max_task_minutes must be positive, got {}",
                self.max_task_minutes
            )));
        }
        if let Some(end) = self.workday_end {
            if end <= self.workday_start {
                return Err(ScheduleError::InvalidConfig(format!(
                    "workday_end {end} must be after workday_start {}",
                    self.workday_start
                )));
            }
        }
        self.prediction.validate()?;
        self.route.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = EngineConfig::default();
        assert_eq!(c.algorithm, Algorithm::Balanced);
        assert_eq!(c.workday_start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(c.workday_end, None);
        assert_eq!(c.history_limit, 30);
        assert_eq!(c.max_task_minutes, 1440);
        assert!(c.apply_routes);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let c = EngineConfig::from_toml_str(
            r#"
            algorithm = "quality"
            workday_end = "18:00:00"
            selection = "earliest_available"

            [route]
            two_opt = true
            "#,
        )
        .unwrap();
        assert_eq!(c.algorithm, Algorithm::Quality);
        assert_eq!(c.workday_end, NaiveTime::from_hms_opt(18, 0, 0));
        assert_eq!(c.selection, SelectionPolicy::EarliestAvailable);
        assert!(c.route.two_opt);
        // Untouched sections keep defaults
        assert!(c.prediction.enabled);
        assert_eq!(c.degrade_threshold, DEFAULT_DEGRADE_THRESHOLD);
    }

    #[test]
    fn test_from_toml_parse_error() {
        let err = EngineConfig::from_toml_str("algorithm = 42").unwrap_err();
        assert!(matches!(err, ScheduleError::ConfigParse(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let c = EngineConfig {
            history_limit: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(c.validate(), Err(ScheduleError::InvalidConfig(_))));

        let c = EngineConfig::default()
            .with_workday_end(NaiveTime::from_hms_opt(7, 0, 0).unwrap());
        assert!(c.validate().is_err());

        let c = EngineConfig::default().with_max_task_minutes(0);
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_builder() {
        let c = EngineConfig::default()
            .with_algorithm(Algorithm::Efficiency)
            .with_timeout_ms(500)
            .with_apply_routes(false)
            .with_degrade_threshold(10);
        assert_eq!(c.algorithm, Algorithm::Efficiency);
        assert_eq!(c.timeout_ms, Some(500));
        assert!(!c.apply_routes);
        assert_eq!(c.degrade_threshold, 10);
    }
}
