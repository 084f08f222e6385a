//! Input validation for scheduling runs.
//!
//! Checks each task before prioritization. Detects:
//! - Duplicate task IDs (the first occurrence is kept)
//! - Missing location
//! - Estimated duration that is non-positive or above the configured maximum
//! - Tasks that are not pending
//! - Locations without coordinates (warning only; travel counts as zero)
//! - Duplicate worker IDs (warning only; the first occurrence is used)
//!
//! Rejected tasks never reach the assignment engine. Every finding is also
//! reported as a [`ConstraintViolation`] on the schedule.

use std::collections::HashSet;

use crate::models::{
    ConstraintViolation, LocationTable, SchedulingTask, TaskStatus, ViolationKind,
    ViolationSeverity, Worker,
};

/// A validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending entity ID.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Location the finding is about, if any.
    pub location_id: Option<String>,
}

/// Categories of validation findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two tasks share the same ID.
    DuplicateId,
    /// A task has an empty location.
    MissingLocation,
    /// A task's estimated duration is zero, negative or above the maximum.
    InvalidDuration,
    /// A task is not in pending status.
    NotPending,
    /// A task's location has no coordinates.
    UnknownLocation,
    /// Two workers share the same ID.
    DuplicateWorker,
}

impl ValidationErrorKind {
    /// Whether the finding rejects the task.
    pub fn rejects(self) -> bool {
        !matches!(self, Self::UnknownLocation | Self::DuplicateWorker)
    }
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, entity_id: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            entity_id: entity_id.to_string(),
            message: message.into(),
            location_id: None,
        }
    }

    fn at_location(mut self, location_id: &str) -> Self {
        self.location_id = Some(location_id.to_string());
        self
    }

    /// Converts the finding into a schedule violation.
    pub fn to_violation(&self) -> ConstraintViolation {
        match self.kind {
            ValidationErrorKind::UnknownLocation => ConstraintViolation::unknown_location(
                &self.entity_id,
                self.location_id.as_deref().unwrap_or_default(),
            ),
            ValidationErrorKind::DuplicateWorker => ConstraintViolation {
                constraint_id: None,
                task_id: None,
                severity: ViolationSeverity::Warning,
                kind: ViolationKind::Validation,
                description: self.message.clone(),
            },
            _ => ConstraintViolation::validation(&self.entity_id, self.message.clone()),
        }
    }
}

/// Outcome of validating one run's input.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Indices of tasks that may be scheduled, in input order.
    pub accepted: Vec<usize>,
    /// Every finding, in detection order.
    pub findings: Vec<ValidationError>,
}

impl ValidationReport {
    /// Findings that rejected a task.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.findings.iter().filter(|f| f.kind.rejects())
    }

    /// Whether any task was rejected.
    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Findings as schedule violations.
    pub fn violations(&self) -> Vec<ConstraintViolation> {
        self.findings.iter().map(ValidationError::to_violation).collect()
    }
}

/// Validates the tasks and workers of one run.
///
/// Estimates above `max_task_minutes` are rejected so slot arithmetic
/// stays within calendar range.
///
/// # Returns
/// The accepted task indices and all findings. Never fails: invalid
/// tasks are dropped and reported.
pub fn validate_input(
    tasks: &[SchedulingTask],
    workers: &[Worker],
    locations: &LocationTable,
    max_task_minutes: i64,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut worker_ids = HashSet::new();
    for w in workers {
        if !worker_ids.insert(w.id.as_str()) {
            report.findings.push(ValidationError::new(
                ValidationErrorKind::DuplicateWorker,
                &w.id,
                format!("Duplicate worker ID: {}", w.id),
            ));
        }
    }

    let mut task_ids = HashSet::new();
    for (idx, task) in tasks.iter().enumerate() {
        let before = report.findings.len();

        if !task_ids.insert(task.id.as_str()) {
            report.findings.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                &task.id,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
        if task.location_id.trim().is_empty() {
            report.findings.push(ValidationError::new(
                ValidationErrorKind::MissingLocation,
                &task.id,
                format!("Task '{}' has no location", task.id),
            ));
        }
        let minutes = task.estimated_duration_minutes;
        if minutes <= 0 || minutes > max_task_minutes {
            report.findings.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                &task.id,
                format!(
                    "Task '{}' has duration {} min, expected 1..={}",
                    task.id, minutes, max_task_minutes
                ),
            ));
        }
        if task.status != TaskStatus::Pending {
            report.findings.push(ValidationError::new(
                ValidationErrorKind::NotPending,
                &task.id,
                format!("Task '{}' is {:?}, expected Pending", task.id, task.status),
            ));
        }

        let rejected = report.findings[before..].iter().any(|f| f.kind.rejects());
        if rejected {
            continue;
        }

        if !locations.contains(&task.location_id) {
            report.findings.push(
                ValidationError::new(
                    ValidationErrorKind::UnknownLocation,
                    &task.id,
                    format!("No coordinates for location '{}'", task.location_id),
                )
                .at_location(&task.location_id),
            );
        }
        report.accepted.push(idx);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: i64 = 1440;

    fn locations() -> LocationTable {
        LocationTable::new().with_location("G1", 49.0, 2.5)
    }

    #[test]
    fn test_valid_input() {
        let tasks = vec![SchedulingTask::new("T1", "G1", 60)];
        let report = validate_input(&tasks, &[Worker::new("W1")], &locations(), MAX);
        assert_eq!(report.accepted, vec![0]);
        assert!(report.findings.is_empty());
        assert!(!report.has_errors());
    }

    #[test]
    fn test_duplicate_task_id() {
        let tasks = vec![
            SchedulingTask::new("T1", "G1", 60),
            SchedulingTask::new("T1", "G1", 30),
        ];
        let report = validate_input(&tasks, &[], &locations(), MAX);
        assert_eq!(report.accepted, vec![0]);
        assert!(report
            .errors()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_missing_location_and_duration() {
        let tasks = vec![
            SchedulingTask::new("T1", "", 60),
            SchedulingTask::new("T2", "G1", 0),
            SchedulingTask::new("T3", "G1", -5),
        ];
        let report = validate_input(&tasks, &[], &locations(), MAX);
        assert!(report.accepted.is_empty());
        assert_eq!(report.errors().count(), 3);
        assert_eq!(report.findings[0].kind, ValidationErrorKind::MissingLocation);
        assert_eq!(report.findings[1].kind, ValidationErrorKind::InvalidDuration);
    }

    #[test]
    fn test_duration_above_maximum_rejected() {
        let tasks = vec![
            SchedulingTask::new("T1", "G1", MAX),
            SchedulingTask::new("T2", "G1", MAX + 1),
            SchedulingTask::new("T3", "G1", i64::MAX),
        ];
        let report = validate_input(&tasks, &[], &locations(), MAX);
        assert_eq!(report.accepted, vec![0]);
        assert_eq!(report.errors().count(), 2);
        assert!(report
            .errors()
            .all(|e| e.kind == ValidationErrorKind::InvalidDuration));
    }

    #[test]
    fn test_not_pending_rejected() {
        let tasks = vec![SchedulingTask::new("T1", "G1", 60).with_status(TaskStatus::Completed)];
        let report = validate_input(&tasks, &[], &locations(), MAX);
        assert!(report.accepted.is_empty());
        assert_eq!(report.findings[0].kind, ValidationErrorKind::NotPending);
    }

    #[test]
    fn test_unknown_location_is_warning() {
        let tasks = vec![SchedulingTask::new("T1", "REMOTE-9", 60)];
        let report = validate_input(&tasks, &[], &locations(), MAX);
        assert_eq!(report.accepted, vec![0]);
        assert!(!report.has_errors());

        let violations = report.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::UnknownLocation);
        assert!(!violations[0].is_error());
        assert!(violations[0].description.contains("REMOTE-9"));
    }

    #[test]
    fn test_duplicate_worker_warning() {
        let workers = vec![Worker::new("W1"), Worker::new("W1")];
        let report = validate_input(&[], &workers, &locations(), MAX);
        assert_eq!(report.findings.len(), 1);
        assert!(!report.has_errors());
        assert!(!report.violations()[0].is_error());
    }

    #[test]
    fn test_multiple_errors_one_task() {
        let tasks = vec![SchedulingTask::new("T1", "", 0).with_status(TaskStatus::Scheduled)];
        let report = validate_input(&tasks, &[], &locations(), MAX);
        assert_eq!(report.errors().count(), 3);
        assert_eq!(report.violations().len(), 3);
    }
}
