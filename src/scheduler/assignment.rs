//! Greedy worker assignment.
//!
//! # Algorithm
//!
//! For each task, in priority order:
//! 1. Collect candidate workers: active, holding every required skill,
//!    and with a feasible slot after their previous task plus travel.
//! 2. Hard constraints on the worker or the task push the slot past the
//!    blocked window; a slot ending after the workday end is infeasible.
//! 3. Prefer the task's preferred workers among the candidates, then pick
//!    by [`SelectionPolicy`].
//! 4. Predict the duration for the chosen worker and append the slot.
//!    Soft constraints overlapping the slot add a warning.
//!
//! A task without candidates stays pending and yields an error violation;
//! the run always continues.
//!
//! # Complexity
//! O(n · w · c) where n = tasks, w = workers, c = constraints per target.

use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::cancel::CancellationToken;
use crate::models::{
    add_minutes, ConstraintViolation, ScheduledTask, SchedulingConstraint, SchedulingTask,
    TaskStatus, TimePrediction, WeatherSnapshot, Worker,
};
use crate::prediction::{DurationPredictor, HistoricalDurations, PredictionContext};
use crate::routing::TravelMatrix;

/// How a worker is picked among eligible candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// First candidate in pool order.
    #[default]
    PoolOrder,
    /// Candidate with the earliest feasible start; ties in pool order.
    EarliestAvailable,
}

/// Hard and soft constraints indexed by target id.
#[derive(Debug, Default)]
pub(crate) struct ConstraintIndex<'a> {
    by_target: HashMap<&'a str, Vec<&'a SchedulingConstraint>>,
}

impl<'a> ConstraintIndex<'a> {
    pub(crate) fn new(constraints: &'a [SchedulingConstraint]) -> Self {
        let mut by_target: HashMap<&str, Vec<&SchedulingConstraint>> = HashMap::new();
        for c in constraints {
            by_target.entry(c.target_id.as_str()).or_default().push(c);
        }
        Self { by_target }
    }

    fn for_pair(
        &self,
        worker_id: &str,
        task_id: &str,
    ) -> impl Iterator<Item = &'a SchedulingConstraint> + '_ {
        let worker = self.by_target.get(worker_id).into_iter().flatten();
        let task = self
            .by_target
            .get(task_id)
            .filter(|_| task_id != worker_id)
            .into_iter()
            .flatten();
        worker.chain(task).copied()
    }

    /// Latest end among hard windows overlapping [start, end), if any.
    pub(crate) fn hard_conflict(
        &self,
        worker_id: &str,
        task_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Option<NaiveDateTime> {
        self.for_pair(worker_id, task_id)
            .filter(|c| c.is_hard() && c.window.overlaps(start, end))
            .map(|c| c.window.end)
            .max()
    }

    /// Soft constraints overlapping [start, end).
    pub(crate) fn soft_conflicts(
        &self,
        worker_id: &str,
        task_id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Vec<&'a SchedulingConstraint> {
        self.for_pair(worker_id, task_id)
            .filter(|c| !c.is_hard() && c.window.overlaps(start, end))
            .collect()
    }
}

/// Where a worker stands after their latest assignment.
#[derive(Debug, Clone)]
struct WorkerTail {
    end: NaiveDateTime,
    location_id: String,
    count: u32,
}

/// Running result of the assignment loop.
///
/// Owned by a single writer: each decision depends on every earlier one.
#[derive(Debug, Clone, Default)]
pub struct AssignmentState {
    /// Slots in assignment order.
    pub scheduled: Vec<ScheduledTask>,
    /// Predictions for the scheduled tasks, same order.
    pub predictions: Vec<TimePrediction>,
    /// Assignment failures and soft-constraint warnings.
    pub violations: Vec<ConstraintViolation>,
    /// Tasks that could not be placed.
    pub unassigned: Vec<String>,
    /// Tasks never considered because the run was cancelled.
    pub unprocessed: Vec<String>,
    /// Sum of travel minutes over `scheduled`.
    pub total_travel_minutes: i64,
    tails: HashMap<String, WorkerTail>,
}

/// A feasible placement of a task on one worker.
#[derive(Debug, Clone)]
struct Candidate<'w> {
    worker: &'w Worker,
    start: NaiveDateTime,
    end: NaiveDateTime,
    travel_minutes: i64,
    prediction: TimePrediction,
}

/// Greedy assignment of prioritized tasks to workers.
#[derive(Debug)]
pub struct AssignmentEngine<'a> {
    predictor: &'a DurationPredictor,
    matrix: &'a TravelMatrix,
    constraints: ConstraintIndex<'a>,
    workers: &'a [Worker],
    history: &'a HistoricalDurations,
    weather: Option<&'a WeatherSnapshot>,
    day_start: NaiveDateTime,
    day_end: Option<NaiveDateTime>,
    policy: SelectionPolicy,
    stamp: DateTime<Utc>,
}

impl<'a> AssignmentEngine<'a> {
    /// Creates an engine over a worker pool and shared inputs.
    pub fn new(
        predictor: &'a DurationPredictor,
        matrix: &'a TravelMatrix,
        constraints: &'a [SchedulingConstraint],
        workers: &'a [Worker],
        day_start: NaiveDateTime,
    ) -> Self {
        Self {
            predictor,
            matrix,
            constraints: ConstraintIndex::new(constraints),
            workers,
            history: empty_history(),
            weather: None,
            day_start,
            day_end: None,
            policy: SelectionPolicy::PoolOrder,
            stamp: DateTime::<Utc>::default(),
        }
    }

    /// Sets the latest allowed end of any slot.
    pub fn with_day_end(mut self, day_end: Option<NaiveDateTime>) -> Self {
        self.day_end = day_end;
        self
    }

    /// Sets the selection policy.
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets historical samples used by the predictor.
    pub fn with_history(mut self, history: &'a HistoricalDurations) -> Self {
        self.history = history;
        self
    }

    /// Sets the weather snapshot used by the predictor.
    pub fn with_weather(mut self, weather: Option<&'a WeatherSnapshot>) -> Self {
        self.weather = weather;
        self
    }

    /// Sets the timestamp written to `updated_at` of scheduled tasks.
    pub fn with_stamp(mut self, stamp: DateTime<Utc>) -> Self {
        self.stamp = stamp;
        self
    }

    /// Assigns all tasks in the given order.
    ///
    /// Stops early when `cancel` fires; the remaining task ids land in
    /// [`AssignmentState::unprocessed`].
    pub fn assign_all(
        &self,
        tasks: &[&SchedulingTask],
        cancel: &CancellationToken,
    ) -> AssignmentState {
        let mut state = AssignmentState::default();
        for (i, task) in tasks.iter().enumerate() {
            if cancel.is_cancelled() {
                state.unprocessed = tasks[i..].iter().map(|t| t.id.clone()).collect();
                break;
            }
            self.assign(&mut state, task);
        }
        state
    }

    /// Assigns one task, updating the accumulator.
    ///
    /// Returns `true` when the task was scheduled.
    pub fn assign(&self, state: &mut AssignmentState, task: &SchedulingTask) -> bool {
        let candidates: Vec<Candidate<'a>> = self
            .workers
            .iter()
            .filter(|w| w.active && w.has_all_skills(&task.required_skills))
            .filter_map(|w| self.place(state, task, w))
            .collect();

        let Some(chosen) = self.select(task, candidates) else {
            let reason = self.failure_reason(task);
            debug!("Task {} unassigned: {}", task.id, reason);
            state
                .violations
                .push(ConstraintViolation::no_eligible_worker(&task.id, reason));
            state.unassigned.push(task.id.clone());
            return false;
        };

        let mut scheduled_task = task.clone();
        if let Err(err) = scheduled_task.transition_to(TaskStatus::Scheduled, self.stamp) {
            state
                .violations
                .push(ConstraintViolation::validation(&task.id, err.to_string()));
            state.unassigned.push(task.id.clone());
            return false;
        }

        let tail = state.tails.entry(chosen.worker.id.clone()).or_insert(WorkerTail {
            end: self.day_start,
            location_id: task.location_id.clone(),
            count: 0,
        });
        tail.end = chosen.end;
        tail.location_id = task.location_id.clone();
        tail.count += 1;
        let sequence = tail.count;

        state.violations.extend(
            self.constraints
                .soft_conflicts(&chosen.worker.id, &task.id, chosen.start, chosen.end)
                .into_iter()
                .map(|c| soft_warning(c, &task.id)),
        );

        state.total_travel_minutes += chosen.travel_minutes;
        state.scheduled.push(ScheduledTask {
            task: scheduled_task,
            worker_ids: vec![chosen.worker.id.clone()],
            scheduled_start: chosen.start,
            scheduled_end: chosen.end,
            travel_minutes: chosen.travel_minutes,
            sequence,
            predicted_minutes: chosen.prediction.predicted_minutes,
        });
        state.predictions.push(chosen.prediction);
        true
    }

    /// Earliest feasible slot for `task` on `worker`, if any.
    ///
    /// A slot that would leave the calendar range is infeasible.
    fn place(
        &self,
        state: &AssignmentState,
        task: &SchedulingTask,
        worker: &'a Worker,
    ) -> Option<Candidate<'a>> {
        let tail = state.tails.get(&worker.id);
        let travel_minutes = tail
            .map(|t| self.matrix.travel_minutes(&t.location_id, &task.location_id))
            .unwrap_or(0);
        let ready = add_minutes(tail.map(|t| t.end).unwrap_or(self.day_start), travel_minutes)?;

        let ctx = PredictionContext::for_task(
            task,
            self.history,
            self.weather,
            worker.experience_score(&task.required_skills),
        );
        let prediction = self.predictor.predict(task, &ctx);
        let minutes = prediction.predicted_minutes;

        let mut start = ready.max(self.day_start);
        let mut end = add_minutes(start, minutes)?;
        // Each push moves past at least one window, so this terminates.
        while let Some(blocked_until) =
            self.constraints
                .hard_conflict(&worker.id, &task.id, start, end)
        {
            if blocked_until <= start {
                break;
            }
            start = blocked_until;
            end = add_minutes(start, minutes)?;
        }

        if self.day_end.is_some_and(|limit| end > limit) {
            return None;
        }

        Some(Candidate {
            worker,
            start,
            end,
            travel_minutes,
            prediction,
        })
    }

    fn select(
        &self,
        task: &SchedulingTask,
        candidates: Vec<Candidate<'a>>,
    ) -> Option<Candidate<'a>> {
        let (preferred, others): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|c| task.preferred_workers.contains(&c.worker.id));
        let pool = if preferred.is_empty() { others } else { preferred };

        match self.policy {
            SelectionPolicy::PoolOrder => pool.into_iter().next(),
            // min_by_key keeps the first of equal keys
            SelectionPolicy::EarliestAvailable => pool.into_iter().min_by_key(|c| c.start),
        }
    }

    fn failure_reason(&self, task: &SchedulingTask) -> String {
        let skilled = self
            .workers
            .iter()
            .filter(|w| w.active && w.has_all_skills(&task.required_skills))
            .count();
        if skilled == 0 {
            if task.required_skills.is_empty() {
                "No active worker available".to_string()
            } else {
                format!(
                    "No active worker holds required skills [{}]",
                    task.required_skills.join(", ")
                )
            }
        } else {
            format!("None of {skilled} eligible workers has a feasible time slot")
        }
    }
}

/// Soft-constraint warnings for final slots.
pub fn soft_constraint_warnings(
    tasks: &[ScheduledTask],
    constraints: &[SchedulingConstraint],
) -> Vec<ConstraintViolation> {
    let index = ConstraintIndex::new(constraints);
    tasks
        .iter()
        .flat_map(|t| {
            index
                .soft_conflicts(
                    t.primary_worker(),
                    t.task_id(),
                    t.scheduled_start,
                    t.scheduled_end,
                )
                .into_iter()
                .map(move |c| soft_warning(c, t.task_id()))
        })
        .collect()
}

fn soft_warning(constraint: &SchedulingConstraint, task_id: &str) -> ConstraintViolation {
    let reason = if constraint.description.is_empty() {
        format!("{:?} constraint", constraint.kind)
    } else {
        constraint.description.clone()
    };
    ConstraintViolation::soft_constraint(
        &constraint.id,
        task_id,
        format!("Slot overlaps soft constraint '{}': {}", constraint.id, reason),
    )
}

fn empty_history() -> &'static HistoricalDurations {
    static EMPTY: std::sync::OnceLock<HistoricalDurations> = std::sync::OnceLock::new();
    EMPTY.get_or_init(HistoricalDurations::new)
}
