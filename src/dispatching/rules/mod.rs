//! Built-in dispatching rules.
//!
//! # Score Convention
//! All rules return lower scores for higher priority tasks.

use super::{DispatchingRule, RuleScore};
use crate::models::SchedulingTask;

/// Shortest estimated duration first.
///
/// Clears the most tasks per hour early in the day.
#[derive(Debug, Clone, Copy)]
pub struct ShortestDuration;

impl DispatchingRule for ShortestDuration {
    fn name(&self) -> &'static str {
        "SHORTEST_DURATION"
    }

    fn evaluate(&self, task: &SchedulingTask) -> RuleScore {
        task.estimated_duration_minutes as f64
    }
}

/// Highest priority rank first (urgent = 4 ... low = 1).
#[derive(Debug, Clone, Copy)]
pub struct HighestPriority;

impl DispatchingRule for HighestPriority {
    fn name(&self) -> &'static str {
        "HIGHEST_PRIORITY"
    }

    fn evaluate(&self, task: &SchedulingTask) -> RuleScore {
        -(task.priority.rank() as f64)
    }
}
