//! Schedule (solution) model.
//!
//! An optimized schedule is the immutable result of one scheduling run:
//! every task that could be placed, with its worker, time slot and
//! position in that worker's route, plus the violations raised for the
//! tasks that could not.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{RouteOptimization, SchedulingTask, TimePrediction};
use crate::dispatching::Algorithm;

/// A task placed on a worker's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// The task, with status `Scheduled`.
    pub task: SchedulingTask,
    /// Assigned workers; the first entry is the route owner.
    pub worker_ids: Vec<String>,
    /// Start of work.
    pub scheduled_start: NaiveDateTime,
    /// End of work.
    pub scheduled_end: NaiveDateTime,
    /// Travel from the worker's previous stop (minutes).
    pub travel_minutes: i64,
    /// Position in the worker's sequence (1-based, contiguous).
    pub sequence: u32,
    /// Duration used for the slot (minutes).
    pub predicted_minutes: i64,
}

impl ScheduledTask {
    /// Id of the underlying task.
    pub fn task_id(&self) -> &str {
        &self.task.id
    }

    /// Worker owning the slot.
    pub fn primary_worker(&self) -> &str {
        self.worker_ids.first().map(String::as_str).unwrap_or("")
    }

    /// Slot length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.scheduled_end - self.scheduled_start).num_minutes()
    }
}

/// `time` shifted by `minutes`, or `None` outside the calendar range.
pub(crate) fn add_minutes(time: NaiveDateTime, minutes: i64) -> Option<NaiveDateTime> {
    TimeDelta::try_minutes(minutes).and_then(|delta| time.checked_add_signed(delta))
}

/// Violation severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Warning,
    Error,
}

/// Classification of violations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Malformed task rejected before prioritization.
    Validation,
    /// No active, skilled worker had a feasible slot.
    NoEligibleWorker,
    /// A soft constraint overlaps the chosen slot.
    SoftConstraint,
    /// Task location has no known coordinates.
    UnknownLocation,
    /// The run was cancelled before the task was considered.
    Cancelled,
    /// Raised outside the engine and merged into the result.
    External,
}

/// A constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstraintViolation {
    /// Related constraint, if any.
    pub constraint_id: Option<String>,
    /// Related task, if any.
    pub task_id: Option<String>,
    /// Warning or error.
    pub severity: ViolationSeverity,
    /// Classification.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub description: String,
}

impl ConstraintViolation {
    fn for_task(
        kind: ViolationKind,
        severity: ViolationSeverity,
        task_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            constraint_id: None,
            task_id: Some(task_id.into()),
            severity,
            kind,
            description: description.into(),
        }
    }

    /// A task rejected by input validation.
    pub fn validation(task_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self::for_task(ViolationKind::Validation, ViolationSeverity::Error, task_id, description)
    }

    /// A task that could not be assigned.
    pub fn no_eligible_worker(task_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self::for_task(
            ViolationKind::NoEligibleWorker,
            ViolationSeverity::Error,
            task_id,
            description,
        )
    }

    /// A soft constraint breached by an assignment.
    pub fn soft_constraint(
        constraint_id: impl Into<String>,
        task_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            constraint_id: Some(constraint_id.into()),
            ..Self::for_task(
                ViolationKind::SoftConstraint,
                ViolationSeverity::Warning,
                task_id,
                description,
            )
        }
    }

    /// A task whose location has no coordinates.
    pub fn unknown_location(task_id: impl Into<String>, location_id: &str) -> Self {
        Self::for_task(
            ViolationKind::UnknownLocation,
            ViolationSeverity::Warning,
            task_id,
            format!("No coordinates for location '{location_id}'; travel assumed zero"),
        )
    }

    /// A task left unprocessed by cancellation.
    pub fn cancelled(task_id: impl Into<String>) -> Self {
        Self::for_task(
            ViolationKind::Cancelled,
            ViolationSeverity::Warning,
            task_id,
            "Scheduling run stopped before this task was considered",
        )
    }

    /// An externally flagged hard-constraint breach.
    pub fn external(
        constraint_id: Option<String>,
        task_id: Option<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            constraint_id,
            task_id,
            severity: ViolationSeverity::Error,
            kind: ViolationKind::External,
            description: description.into(),
        }
    }

    /// Whether this is an error.
    pub fn is_error(&self) -> bool {
        self.severity == ViolationSeverity::Error
    }
}

/// Result of one scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizedSchedule {
    /// Planning date.
    pub date: NaiveDate,
    /// Scheduled tasks grouped by worker, each group in sequence order.
    pub tasks: Vec<ScheduledTask>,
    /// Work share of busy time (0 to 100).
    pub efficiency: f64,
    /// Share of active workers that received work (0 to 100).
    pub utilization: f64,
    /// Sum of travel minutes.
    pub total_travel_minutes: i64,
    /// Everything that went wrong or deserves attention.
    pub violations: Vec<ConstraintViolation>,
    /// Prioritization algorithm used.
    pub algorithm: Algorithm,
    /// When the run finished.
    pub generated_at: DateTime<Utc>,
    /// One route per worker with work.
    pub routes: Vec<RouteOptimization>,
    /// Predictions for scheduled tasks.
    pub predictions: Vec<TimePrediction>,
    /// Valid tasks that were not scheduled.
    pub unscheduled_task_ids: Vec<String>,
    /// Set when the run was cancelled or hit its deadline.
    pub incomplete: bool,
    /// Set when the input was large enough to force the fallback policy.
    pub degraded: bool,
}

impl OptimizedSchedule {
    /// Number of scheduled tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Finds the slot for a task.
    pub fn scheduled_task(&self, task_id: &str) -> Option<&ScheduledTask> {
        self.tasks.iter().find(|t| t.task.id == task_id)
    }

    /// Slots of one worker, in sequence order.
    pub fn tasks_for_worker(&self, worker_id: &str) -> Vec<&ScheduledTask> {
        let mut slots: Vec<&ScheduledTask> = self
            .tasks
            .iter()
            .filter(|t| t.primary_worker() == worker_id)
            .collect();
        slots.sort_by_key(|t| t.sequence);
        slots
    }

    /// Route of one worker.
    pub fn route_for_worker(&self, worker_id: &str) -> Option<&RouteOptimization> {
        self.routes.iter().find(|r| r.worker_id == worker_id)
    }

    /// Distinct workers that received at least one task.
    pub fn assigned_workers(&self) -> HashSet<&str> {
        self.tasks.iter().map(|t| t.primary_worker()).collect()
    }

    /// Violations with error severity.
    pub fn errors(&self) -> Vec<&ConstraintViolation> {
        self.violations.iter().filter(|v| v.is_error()).collect()
    }

    /// Violations of one kind.
    pub fn violations_of(&self, kind: &ViolationKind) -> Vec<&ConstraintViolation> {
        self.violations.iter().filter(|v| &v.kind == kind).collect()
    }

    /// Whether the schedule carries no error-level violations.
    pub fn is_valid(&self) -> bool {
        !self.violations.iter().any(|v| v.is_error())
    }

    /// Latest end time across all slots.
    pub fn makespan_end(&self) -> Option<NaiveDateTime> {
        self.tasks.iter().map(|t| t.scheduled_end).max()
    }

    /// Per-worker sequence numbers, for invariant checks.
    pub fn sequences_by_worker(&self) -> BTreeMap<&str, Vec<u32>> {
        let mut map: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
        for t in &self.tasks {
            map.entry(t.primary_worker()).or_default().push(t.sequence);
        }
        for seqs in map.values_mut() {
            seqs.sort_unstable();
        }
        map
    }
}
