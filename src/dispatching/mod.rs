//! Task prioritization.
//!
//! Dispatching rules score tasks; a rule engine composes them into a
//! total order. The three planning algorithms are fixed rule chains:
//!
//! | Algorithm | Primary rule | Tie-breaker |
//! |-----------|--------------|-------------|
//! | `Efficiency` | shortest duration | none |
//! | `Quality` | highest priority | none |
//! | `Balanced` | highest priority | shortest duration |
//!
//! Sorting is stable: tasks with identical keys keep their input order.
//!
//! # Usage
//!
//! ```
//! use crew_schedule::dispatching::Algorithm;
//! use crew_schedule::models::{SchedulingTask, TaskPriority};
//!
//! let tasks = vec![
//!     SchedulingTask::new("A", "L1", 90),
//!     SchedulingTask::new("B", "L1", 30).with_priority(TaskPriority::Urgent),
//! ];
//! assert_eq!(Algorithm::Balanced.prioritize(&tasks), vec![1, 0]);
//! assert_eq!(Algorithm::Efficiency.prioritize(&tasks), vec![1, 0]);
//! ```

mod engine;
pub mod rules;

pub use engine::RuleEngine;

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::Debug;

use crate::models::SchedulingTask;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (scheduled first).
pub type RuleScore = f64;

/// A dispatching rule that evaluates task priority.
///
/// # Score Convention
/// **Lower score = higher priority.**
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "SHORTEST_DURATION").
    fn name(&self) -> &'static str;

    /// Evaluates a task. Lower = scheduled earlier.
    fn evaluate(&self, task: &SchedulingTask) -> RuleScore;
}

/// Planning algorithm selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Shortest tasks first, to clear volume.
    #[serde(alias = "EFFICIENCY")]
    Efficiency,
    /// Priority first, durations ignored.
    #[serde(alias = "QUALITY")]
    Quality,
    /// Priority first, shortest first within a priority.
    #[default]
    #[serde(alias = "BALANCED")]
    Balanced,
}

impl Algorithm {
    /// Rule chain implementing this algorithm.
    pub fn rule_engine(self) -> RuleEngine {
        match self {
            Algorithm::Efficiency => RuleEngine::new().with_rule(rules::ShortestDuration),
            Algorithm::Quality => RuleEngine::new().with_rule(rules::HighestPriority),
            Algorithm::Balanced => RuleEngine::new()
                .with_rule(rules::HighestPriority)
                .with_tie_breaker(rules::ShortestDuration),
        }
    }

    /// Indices of `tasks` in scheduling order.
    ///
    /// Accepts owned tasks or references.
    pub fn prioritize<T: Borrow<SchedulingTask>>(self, tasks: &[T]) -> Vec<usize> {
        self.rule_engine().sort_indices(tasks)
    }
}
