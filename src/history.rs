//! Bounded history of produced schedules.
//!
//! Finished schedules are immutable and shared as `Arc`s, so readers can
//! hold on to one while new runs are recorded.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;

use crate::config::{EngineConfig, DEFAULT_HISTORY_LIMIT};
use crate::models::OptimizedSchedule;

/// The most recent schedules, oldest first.
#[derive(Debug, Clone)]
pub struct ScheduleHistory {
    runs: VecDeque<Arc<OptimizedSchedule>>,
    limit: usize,
}

impl Default for ScheduleHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl ScheduleHistory {
    /// Creates a history keeping at most `limit` schedules (at least 1).
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            runs: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Creates a history sized by `config.history_limit`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.history_limit)
    }

    /// Stores a schedule, evicting the oldest when full.
    pub fn record(&mut self, schedule: OptimizedSchedule) -> Arc<OptimizedSchedule> {
        let schedule = Arc::new(schedule);
        self.runs.push_back(Arc::clone(&schedule));
        while self.runs.len() > self.limit {
            if let Some(evicted) = self.runs.pop_front() {
                debug!("Evicted schedule for {} from history", evicted.date);
            }
        }
        schedule
    }

    /// Most recent schedule.
    pub fn latest(&self) -> Option<Arc<OptimizedSchedule>> {
        self.runs.back().cloned()
    }

    /// Most recent schedule for a planning date.
    pub fn latest_for(&self, date: NaiveDate) -> Option<Arc<OptimizedSchedule>> {
        self.runs.iter().rev().find(|s| s.date == date).cloned()
    }

    /// Schedules, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<OptimizedSchedule>> {
        self.runs.iter()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Maximum number of schedules kept.
    pub fn limit(&self) -> usize {
        self.limit
    }
}
