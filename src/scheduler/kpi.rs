//! Schedule quality metrics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Efficiency | work / (work + travel) × 100 |
//! | Utilization | distinct assigned workers / active workers × 100 |
//! | Total travel | Sum of travel minutes |
//! | Worker load | Work + travel minutes per worker |
//!
//! Both percentages are 0 when their denominator is 0 and are clamped to
//! [0, 100].

use std::collections::{HashMap, HashSet};

use crate::models::{ConstraintViolation, ScheduledTask};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleMetrics {
    /// Work share of busy time (0 to 100).
    pub efficiency: f64,
    /// Share of active workers that received work (0 to 100).
    pub utilization: f64,
    /// Sum of scheduled work minutes.
    pub total_work_minutes: i64,
    /// Sum of travel minutes.
    pub total_travel_minutes: i64,
    /// Number of distinct workers with at least one task.
    pub assigned_workers: usize,
    /// Busy minutes (work + travel) per worker.
    pub load_by_worker: HashMap<String, i64>,
}

impl ScheduleMetrics {
    /// Computes metrics over final slots.
    ///
    /// # Arguments
    /// * `tasks` - Scheduled tasks with final times.
    /// * `active_workers` - Size of the active worker pool.
    pub fn calculate(tasks: &[ScheduledTask], active_workers: usize) -> Self {
        let mut total_work = 0i64;
        let mut total_travel = 0i64;
        let mut load_by_worker: HashMap<String, i64> = HashMap::new();
        let mut workers: HashSet<&str> = HashSet::new();

        for t in tasks {
            let work = t.duration_minutes().max(0);
            let travel = t.travel_minutes.max(0);
            total_work += work;
            total_travel += travel;
            for w in &t.worker_ids {
                workers.insert(w.as_str());
                *load_by_worker.entry(w.clone()).or_insert(0) += work + travel;
            }
        }

        let busy = total_work + total_travel;
        let efficiency = if tasks.is_empty() || busy == 0 {
            0.0
        } else {
            percentage(total_work as f64 / busy as f64)
        };

        let utilization = if active_workers == 0 {
            0.0
        } else {
            percentage(workers.len() as f64 / active_workers as f64)
        };

        Self {
            efficiency,
            utilization,
            total_work_minutes: total_work,
            total_travel_minutes: total_travel,
            assigned_workers: workers.len(),
            load_by_worker,
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_efficiency: f64, min_utilization: f64) -> bool {
        self.efficiency >= min_efficiency && self.utilization >= min_utilization
    }
}

/// Union of engine and externally supplied violations.
///
/// Keeps first-seen order and drops exact duplicates.
pub fn merge_violations(
    engine: Vec<ConstraintViolation>,
    external: &[ConstraintViolation],
) -> Vec<ConstraintViolation> {
    let mut seen = HashSet::new();
    engine
        .into_iter()
        .chain(external.iter().cloned())
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

fn percentage(ratio: f64) -> f64 {
    (ratio * 100.0).clamp(0.0, 100.0)
}
