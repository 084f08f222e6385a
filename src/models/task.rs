//! Cleaning task model.
//!
//! A task is one unit of cleaning work tied to a single subject (an
//! aircraft) parked at a single location. Durations are whole minutes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// A cleaning task waiting to be (or already) scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulingTask {
    /// Unique task identifier.
    pub id: String,
    /// Subject being serviced (e.g. aircraft registration).
    pub subject_id: String,
    /// Subject type used for complexity lookups (e.g. "A320").
    pub subject_type: Option<String>,
    /// Kinds of intervention requested. Kept unique, in insertion order.
    pub interventions: Vec<InterventionKind>,
    /// Planner estimate in minutes (must be > 0).
    pub estimated_duration_minutes: i64,
    /// Business priority.
    pub priority: TaskPriority,
    /// Workers the planner would like to see on this task.
    pub preferred_workers: Vec<String>,
    /// Skills a worker must hold to be eligible.
    pub required_skills: Vec<String>,
    /// Location identifier (stand, gate, hangar bay).
    pub location_id: String,
    /// Whether adverse weather slows this task down.
    pub weather_sensitive: bool,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Numeric rank: urgent = 4 ... low = 1.
    pub fn rank(self) -> i32 {
        match self {
            TaskPriority::Low => 1,
            TaskPriority::Medium => 2,
            TaskPriority::High => 3,
            TaskPriority::Urgent => 4,
        }
    }
}

/// Task lifecycle status.
///
/// ```text
/// pending -> scheduled -> in_progress -> completed
///    \___________\______________\_____-> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Whether the status is final.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Cancelled)
    }

    /// Whether moving from `self` to `next` is a legal forward step.
    ///
    /// Steps are one at a time along pending → scheduled → in_progress →
    /// completed. Cancellation is allowed from any non-terminal state.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        match (self, next) {
            (Pending, Scheduled) | (Scheduled, InProgress) | (InProgress, Completed) => true,
            (from, Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }
}

/// Kind of cleaning intervention.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionKind {
    InteriorCleaning,
    ExteriorWash,
    CabinDeepClean,
    LavatoryService,
    GalleyService,
    WasteRemoval,
    Disinfection,
    Custom(String),
}

impl SchedulingTask {
    /// Creates a pending, medium-priority task.
    pub fn new(
        id: impl Into<String>,
        location_id: impl Into<String>,
        estimated_duration_minutes: i64,
    ) -> Self {
        Self {
            id: id.into(),
            subject_id: String::new(),
            subject_type: None,
            interventions: Vec::new(),
            estimated_duration_minutes,
            priority: TaskPriority::Medium,
            preferred_workers: Vec::new(),
            required_skills: Vec::new(),
            location_id: location_id.into(),
            weather_sensitive: false,
            status: TaskStatus::Pending,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }

    /// Sets the serviced subject.
    pub fn with_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = subject_id.into();
        self
    }

    /// Sets the subject type (aircraft type).
    pub fn with_subject_type(mut self, subject_type: impl Into<String>) -> Self {
        self.subject_type = Some(subject_type.into());
        self
    }

    /// Adds an intervention kind (ignored if already present).
    pub fn with_intervention(mut self, kind: InterventionKind) -> Self {
        if !self.interventions.contains(&kind) {
            self.interventions.push(kind);
        }
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Adds a preferred worker.
    pub fn with_preferred_worker(mut self, worker_id: impl Into<String>) -> Self {
        self.preferred_workers.push(worker_id.into());
        self
    }

    /// Adds a required skill.
    pub fn with_required_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skills.push(skill.into());
        self
    }

    /// Marks the task as weather sensitive.
    pub fn with_weather_sensitive(mut self, sensitive: bool) -> Self {
        self.weather_sensitive = sensitive;
        self
    }

    /// Sets the status directly (for loading persisted tasks).
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets creation and update timestamps.
    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// Moves the task to `next`, stamping `updated_at`.
    pub fn transition_to(&mut self, next: TaskStatus, at: DateTime<Utc>) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(ScheduleError::InvalidTransition {
                task_id: self.id.clone(),
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = at;
        Ok(())
    }
}
