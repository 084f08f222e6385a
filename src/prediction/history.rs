//! Historical duration samples.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::SchedulingTask;

/// Past durations (minutes), keyed by task id or subject type.
///
/// Lookup prefers samples recorded for the exact task id, then falls back
/// to samples recorded for the task's subject type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDurations {
    samples: HashMap<String, Vec<f64>>,
}

impl HistoricalDurations {
    /// Creates an empty sample set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one sample under `key`. Non-positive values are ignored.
    pub fn record(&mut self, key: impl Into<String>, minutes: f64) {
        if minutes > 0.0 && minutes.is_finite() {
            self.samples.entry(key.into()).or_default().push(minutes);
        }
    }

    /// Builder: records samples under `key`.
    pub fn with_samples(mut self, key: impl Into<String>, minutes: &[f64]) -> Self {
        let key = key.into();
        for &m in minutes {
            self.record(key.clone(), m);
        }
        self
    }

    /// Samples relevant to a task.
    pub fn samples_for(&self, task: &SchedulingTask) -> &[f64] {
        if let Some(s) = self.samples.get(&task.id) {
            return s;
        }
        task.subject_type
            .as_ref()
            .and_then(|t| self.samples.get(t))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether no samples are recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
