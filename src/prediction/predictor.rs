//! Weighted multi-factor duration predictor.
//!
//! # Model
//!
//! ```text
//! predicted = round(baseline × complexity × weather × experience × historical)
//! confidence = round(mean(min(100, samples × 10), experience × 100, reliability × 100))
//! ```
//!
//! The experience factor maps a normalized score `e ∈ [0, 1]` to
//! `1.2 − 0.4·e`: an average crew (0.5) is neutral, an expert crew is 20%
//! faster, a novice crew 20% slower.

use log::debug;
use rayon::prelude::*;

use super::{HistoricalDurations, PredictionConfig};
use crate::models::{PredictionFactors, SchedulingTask, TimePrediction, WeatherSnapshot};

/// Confidence reported when prediction is switched off.
pub const NEUTRAL_CONFIDENCE: u8 = 50;

/// Signal value (0..1) used when experience or weather data is missing.
const MISSING_SIGNAL: f64 = 0.5;

/// Inputs for predicting one task, beyond the task itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictionContext<'a> {
    /// Past durations for this kind of task (minutes).
    pub samples: &'a [f64],
    /// Weather at planning time.
    pub weather: Option<&'a WeatherSnapshot>,
    /// Experience score of the assigned or candidate workers (0..1).
    pub experience: Option<f64>,
}

impl<'a> PredictionContext<'a> {
    /// Context with no data at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a context from a sample store.
    pub fn for_task(
        task: &SchedulingTask,
        history: &'a HistoricalDurations,
        weather: Option<&'a WeatherSnapshot>,
        experience: Option<f64>,
    ) -> Self {
        Self {
            samples: history.samples_for(task),
            weather,
            experience,
        }
    }
}

/// Duration predictor with an explicit configuration.
///
/// # Example
///
/// ```
/// use crew_schedule::models::{SchedulingTask, WeatherCondition, WeatherSnapshot};
/// use crew_schedule::prediction::{DurationPredictor, PredictionConfig, PredictionContext};
///
/// let predictor = DurationPredictor::new(PredictionConfig::default());
/// let task = SchedulingTask::new("T1", "GATE-4", 60).with_weather_sensitive(true);
/// let weather = WeatherSnapshot::new(WeatherCondition::Rain, 1.0);
/// let ctx = PredictionContext { weather: Some(&weather), ..PredictionContext::empty() };
///
/// let p = predictor.predict(&task, &ctx);
/// assert_eq!(p.predicted_minutes, 78); // 60 × 1.3
/// ```
#[derive(Debug, Clone, Default)]
pub struct DurationPredictor {
    config: PredictionConfig,
}

impl DurationPredictor {
    /// Creates a predictor.
    pub fn new(config: PredictionConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    /// Predicts the duration of one task.
    pub fn predict(&self, task: &SchedulingTask, ctx: &PredictionContext<'_>) -> TimePrediction {
        let baseline = task.estimated_duration_minutes;

        if !self.config.is_active() {
            return TimePrediction {
                task_id: task.id.clone(),
                baseline_minutes: baseline,
                predicted_minutes: baseline.max(0),
                factors: PredictionFactors::neutral(),
                confidence: NEUTRAL_CONFIDENCE,
            };
        }

        let factors = PredictionFactors {
            aircraft_complexity: self.complexity_factor(task),
            weather_impact: self.weather_factor(task, ctx.weather),
            team_experience: self.experience_factor(ctx.experience),
            historical_average: self.historical_factor(ctx.samples),
        };

        let predicted = (baseline as f64 * factors.combined()).round().max(0.0) as i64;
        let confidence = confidence_score(ctx);

        debug!(
            "Predicted task {}: {} -> {} min (confidence {})",
            task.id, baseline, predicted, confidence
        );

        TimePrediction {
            task_id: task.id.clone(),
            baseline_minutes: baseline,
            predicted_minutes: predicted,
            factors,
            confidence,
        }
    }

    /// Predicts many independent tasks.
    ///
    /// Runs on the rayon pool when `parallel` is set. Output order always
    /// matches input order.
    pub fn predict_batch(
        &self,
        items: &[(&SchedulingTask, PredictionContext<'_>)],
    ) -> Vec<TimePrediction> {
        if self.config.parallel {
            items
                .par_iter()
                .map(|(task, ctx)| self.predict(task, ctx))
                .collect()
        } else {
            items.iter().map(|(task, ctx)| self.predict(task, ctx)).collect()
        }
    }

    fn complexity_factor(&self, task: &SchedulingTask) -> f64 {
        if !self.config.aircraft_complexity {
            return 1.0;
        }
        task.subject_type
            .as_ref()
            .and_then(|t| self.config.complexity.get(t))
            .copied()
            .unwrap_or(1.0)
    }

    fn weather_factor(&self, task: &SchedulingTask, weather: Option<&WeatherSnapshot>) -> f64 {
        match weather {
            Some(w)
                if self.config.weather && task.weather_sensitive && w.condition.is_adverse() =>
            {
                self.config.adverse_weather_multiplier
            }
            _ => 1.0,
        }
    }

    fn experience_factor(&self, experience: Option<f64>) -> f64 {
        match experience {
            Some(e) if self.config.team_experience => 1.2 - 0.4 * e.clamp(0.0, 1.0),
            _ => 1.0,
        }
    }

    fn historical_factor(&self, samples: &[f64]) -> f64 {
        if !self.config.historical || samples.is_empty() {
            return 1.0;
        }
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        mean / self.config.historical_reference_minutes
    }
}

fn confidence_score(ctx: &PredictionContext<'_>) -> u8 {
    let history_signal = (ctx.samples.len() as f64 * 10.0).min(100.0);
    let experience_signal = ctx.experience.unwrap_or(MISSING_SIGNAL).clamp(0.0, 1.0) * 100.0;
    let weather_signal = ctx
        .weather
        .map(|w| w.reliability)
        .unwrap_or(MISSING_SIGNAL)
        .clamp(0.0, 1.0)
        * 100.0;
    let mean = (history_signal + experience_signal + weather_signal) / 3.0;
    mean.round().clamp(0.0, 100.0) as u8
}
