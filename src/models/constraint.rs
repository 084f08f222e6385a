//! Scheduling constraints and time windows.
//!
//! A constraint blocks (hard) or discourages (soft) work on a target
//! entity during a time window. The target is either a worker id (the
//! worker is unavailable, busy with equipment, on maintenance duty...) or a
//! task id (the aircraft cannot be worked on, e.g. during a weather hold).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Length of the window in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whether a timestamp falls within this window.
    #[inline]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at < self.end
    }

    /// Whether the interval [start, end) overlaps this window.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && start < self.end
    }
}

/// Constraint category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// Worker or aircraft not available.
    Availability,
    /// Capacity limit (e.g. stand occupied by another crew).
    Capacity,
    /// Required equipment unavailable.
    Equipment,
    /// Weather hold.
    Weather,
    /// Maintenance slot occupying the aircraft or worker.
    Maintenance,
}

/// Whether a constraint must hold or is advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintSeverity {
    /// Never violated by the scheduler.
    Hard,
    /// Reported as a warning when violated.
    Soft,
}

/// A scheduling constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingConstraint {
    /// Constraint identifier.
    pub id: String,
    /// Category.
    pub kind: ConstraintKind,
    /// Worker id or task id the constraint applies to.
    pub target_id: String,
    /// Blocked interval.
    pub window: TimeWindow,
    /// Hard or soft.
    pub severity: ConstraintSeverity,
    /// Human-readable reason.
    pub description: String,
}

impl SchedulingConstraint {
    /// Creates a hard constraint.
    pub fn hard(
        id: impl Into<String>,
        kind: ConstraintKind,
        target_id: impl Into<String>,
        window: TimeWindow,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            target_id: target_id.into(),
            window,
            severity: ConstraintSeverity::Hard,
            description: String::new(),
        }
    }

    /// Creates a soft constraint.
    pub fn soft(
        id: impl Into<String>,
        kind: ConstraintKind,
        target_id: impl Into<String>,
        window: TimeWindow,
    ) -> Self {
        Self {
            severity: ConstraintSeverity::Soft,
            ..Self::hard(id, kind, target_id, window)
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether this is a hard constraint.
    pub fn is_hard(&self) -> bool {
        self.severity == ConstraintSeverity::Hard
    }

    /// Whether the constraint targets the given worker or task.
    pub fn applies_to(&self, worker_id: &str, task_id: &str) -> bool {
        self.target_id == worker_id || self.target_id == task_id
    }
}
