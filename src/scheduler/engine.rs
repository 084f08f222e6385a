//! End-to-end scheduling pipeline.
//!
//! # Algorithm
//!
//! 1. Validate tasks; rejected tasks become violations.
//! 2. Prioritize the rest with the selected [`Algorithm`].
//! 3. Assign sequentially ([`AssignmentEngine`]).
//! 4. Sequence each worker's tasks by nearest neighbor, then re-time them
//!    along the route when the result stays feasible.
//! 5. Compute metrics and merge violations.
//!
//! Above `degrade_threshold` valid tasks the run switches to pool-order
//! selection and skips 2-opt.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info, warn};

use super::assignment::{
    soft_constraint_warnings, AssignmentEngine, AssignmentState, ConstraintIndex,
};
use super::kpi::{merge_violations, ScheduleMetrics};
use super::SelectionPolicy;
use crate::cancel::CancellationToken;
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::dispatching::Algorithm;
use crate::error::Result;
use crate::models::{
    add_minutes, ConstraintViolation, LocationTable, OptimizedSchedule, RouteOptimization,
    ScheduledTask, SchedulingConstraint, SchedulingTask, TimePrediction, ViolationKind,
    WeatherSnapshot, Worker, WorkerPool,
};
use crate::prediction::{DurationPredictor, HistoricalDurations, PredictionContext};
use crate::routing::{RouteOptimizer, TravelMatrix};
use crate::validation::validate_input;

/// Input of one scheduling run.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Planning date.
    pub date: NaiveDate,
    /// Tasks to schedule.
    pub tasks: Vec<SchedulingTask>,
    /// Availability and other time-window constraints.
    pub constraints: Vec<SchedulingConstraint>,
    /// Coordinates per location id.
    pub locations: LocationTable,
    /// Weather at planning time.
    pub weather: Option<WeatherSnapshot>,
    /// Past durations for prediction.
    pub history: HistoricalDurations,
    /// Hard-constraint breaches flagged outside the engine.
    pub external_violations: Vec<ConstraintViolation>,
    /// Overrides the configured algorithm for this run.
    pub algorithm: Option<Algorithm>,
}

impl ScheduleRequest {
    /// Creates a request with no constraints, locations or history.
    pub fn new(date: NaiveDate, tasks: Vec<SchedulingTask>) -> Self {
        Self {
            date,
            tasks,
            constraints: Vec::new(),
            locations: LocationTable::new(),
            weather: None,
            history: HistoricalDurations::new(),
            external_violations: Vec::new(),
            algorithm: None,
        }
    }

    /// Sets the constraints.
    pub fn with_constraints(mut self, constraints: Vec<SchedulingConstraint>) -> Self {
        self.constraints = constraints;
        self
    }

    /// Adds one constraint.
    pub fn with_constraint(mut self, constraint: SchedulingConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Sets the location table.
    pub fn with_locations(mut self, locations: LocationTable) -> Self {
        self.locations = locations;
        self
    }

    /// Sets the weather snapshot.
    pub fn with_weather(mut self, weather: WeatherSnapshot) -> Self {
        self.weather = Some(weather);
        self
    }

    /// Sets historical durations.
    pub fn with_history(mut self, history: HistoricalDurations) -> Self {
        self.history = history;
        self
    }

    /// Adds an externally flagged violation.
    pub fn with_external_violation(mut self, violation: ConstraintViolation) -> Self {
        self.external_violations.push(violation);
        self
    }

    /// Overrides the algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }
}

/// Scheduling engine with injected configuration, predictor, clock and
/// worker pool.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use chrono::NaiveDate;
/// use crew_schedule::config::EngineConfig;
/// use crew_schedule::models::{LocationTable, SchedulingTask, Worker};
/// use crew_schedule::scheduler::{ScheduleRequest, SchedulingEngine};
///
/// let workers = vec![Worker::new("W1")];
/// let engine = SchedulingEngine::new(EngineConfig::default(), Arc::new(workers)).unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
/// let request = ScheduleRequest::new(date, vec![
///     SchedulingTask::new("T1", "GATE-4", 60),
///     SchedulingTask::new("T2", "GATE-4", 60),
/// ])
/// .with_locations(LocationTable::new().with_location("GATE-4", 49.0, 2.55));
///
/// let schedule = engine.schedule(&request);
/// assert_eq!(schedule.task_count(), 2);
/// assert_eq!(schedule.efficiency, 100.0);
/// ```
pub struct SchedulingEngine {
    config: EngineConfig,
    predictor: DurationPredictor,
    clock: Arc<dyn Clock>,
    workers: Arc<dyn WorkerPool>,
}

impl fmt::Debug for SchedulingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulingEngine")
            .field("config", &self.config)
            .field("predictor", &self.predictor)
            .finish_non_exhaustive()
    }
}

impl SchedulingEngine {
    /// Creates an engine after validating `config`.
    pub fn new(config: EngineConfig, workers: Arc<dyn WorkerPool>) -> Result<Self> {
        config.validate()?;
        let predictor = DurationPredictor::new(config.prediction.clone());
        Ok(Self {
            config,
            predictor,
            clock: Arc::new(SystemClock),
            workers,
        })
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the predictor.
    pub fn with_predictor(mut self, predictor: DurationPredictor) -> Self {
        self.predictor = predictor;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn predictor(&self) -> &DurationPredictor {
        &self.predictor
    }

    /// Runs the pipeline with the configured timeout.
    pub fn schedule(&self, request: &ScheduleRequest) -> OptimizedSchedule {
        let token = CancellationToken::from_timeout_ms(self.config.timeout_ms);
        self.schedule_with_cancel(request, &token)
    }

    /// Runs the pipeline, stopping early when `cancel` fires.
    pub fn schedule_with_cancel(
        &self,
        request: &ScheduleRequest,
        cancel: &CancellationToken,
    ) -> OptimizedSchedule {
        let roster = self.workers.workers();
        let report = validate_input(
            &request.tasks,
            &roster,
            &request.locations,
            self.config.max_task_minutes,
        );
        let workers = dedup_workers(roster);
        let active_workers = workers.iter().filter(|w| w.active).count();
        let algorithm = request.algorithm.unwrap_or(self.config.algorithm);

        let valid: Vec<&SchedulingTask> = report
            .accepted
            .iter()
            .map(|&i| &request.tasks[i])
            .collect();
        info!(
            "Scheduling {} of {} tasks for {} on {} active workers ({:?})",
            valid.len(),
            request.tasks.len(),
            request.date,
            active_workers,
            algorithm
        );

        let degraded = valid.len() > self.config.degrade_threshold;
        let policy = if degraded {
            warn!(
                "{} tasks exceed degrade threshold {}; using pool order without 2-opt",
                valid.len(),
                self.config.degrade_threshold
            );
            SelectionPolicy::PoolOrder
        } else {
            self.config.selection
        };

        let ordered: Vec<&SchedulingTask> = algorithm
            .prioritize(&valid)
            .into_iter()
            .map(|i| valid[i])
            .collect();

        let matrix = TravelMatrix::build(
            valid.iter().map(|t| t.location_id.as_str()),
            &request.locations,
            self.config.route.minutes_per_km,
        );
        let stamp = self.clock.now();
        let day_start = request.date.and_time(self.config.workday_start);
        let day_end = self.config.workday_end.map(|t| request.date.and_time(t));

        let state = AssignmentEngine::new(
            &self.predictor,
            &matrix,
            &request.constraints,
            &workers,
            day_start,
        )
        .with_day_end(day_end)
        .with_policy(policy)
        .with_history(&request.history)
        .with_weather(request.weather.as_ref())
        .with_stamp(stamp)
        .assign_all(&ordered, cancel);

        let AssignmentState {
            scheduled,
            predictions,
            violations: mut assignment_violations,
            unassigned,
            unprocessed,
            ..
        } = state;

        if !unprocessed.is_empty() {
            warn!(
                "Scheduling cancelled with {} tasks unprocessed",
                unprocessed.len()
            );
        }

        let groups = group_by_worker(&workers, scheduled);
        let optimizer = RouteOptimizer::new(&matrix, &self.config.route);
        let routes = optimizer.optimize_all(&groups, !degraded, cancel);
        let incomplete = !unprocessed.is_empty() || cancel.is_cancelled();

        let index = ConstraintIndex::new(&request.constraints);
        let (tasks, routes) =
            self.apply_routes(groups, routes, &optimizer, &index, day_start, day_end);

        let metrics = ScheduleMetrics::calculate(&tasks, active_workers);

        // Soft warnings are re-derived from the final slots.
        assignment_violations.retain(|v| v.kind != ViolationKind::SoftConstraint);
        let mut violations = report.violations();
        violations.extend(assignment_violations);
        violations.extend(unprocessed.iter().map(ConstraintViolation::cancelled));
        violations.extend(soft_constraint_warnings(&tasks, &request.constraints));
        let violations = merge_violations(violations, &request.external_violations);

        let predictions = order_predictions(predictions, &tasks);
        let mut unscheduled_task_ids = unassigned;
        unscheduled_task_ids.extend(unprocessed);

        info!(
            "Scheduled {} tasks: efficiency {:.1}%, utilization {:.1}%, travel {} min, {} violations",
            tasks.len(),
            metrics.efficiency,
            metrics.utilization,
            metrics.total_travel_minutes,
            violations.len()
        );

        OptimizedSchedule {
            date: request.date,
            tasks,
            efficiency: metrics.efficiency,
            utilization: metrics.utilization,
            total_travel_minutes: metrics.total_travel_minutes,
            violations,
            algorithm,
            generated_at: self.clock.now(),
            routes,
            predictions,
            unscheduled_task_ids,
            incomplete,
            degraded,
        }
    }

    /// Predicts every valid task of a request without assigning.
    ///
    /// Experience is the mean score over active workers holding the
    /// task's required skills. Output order follows the request.
    pub fn predict(&self, request: &ScheduleRequest) -> Vec<TimePrediction> {
        let workers = dedup_workers(self.workers.workers());
        let report = validate_input(
            &request.tasks,
            &workers,
            &request.locations,
            self.config.max_task_minutes,
        );

        let items: Vec<(&SchedulingTask, PredictionContext<'_>)> = report
            .accepted
            .iter()
            .map(|&i| {
                let task = &request.tasks[i];
                let ctx = PredictionContext::for_task(
                    task,
                    &request.history,
                    request.weather.as_ref(),
                    mean_experience(&workers, task),
                );
                (task, ctx)
            })
            .collect();

        self.predictor.predict_batch(&items)
    }

    /// Re-times each worker's tasks along its route when feasible.
    ///
    /// Published routes take their stop times from the final slots.
    fn apply_routes(
        &self,
        groups: Vec<(String, Vec<ScheduledTask>)>,
        routes: Vec<RouteOptimization>,
        optimizer: &RouteOptimizer<'_>,
        index: &ConstraintIndex<'_>,
        day_start: NaiveDateTime,
        day_end: Option<NaiveDateTime>,
    ) -> (Vec<ScheduledTask>, Vec<RouteOptimization>) {
        let mut tasks = Vec::new();
        let mut final_routes = Vec::with_capacity(routes.len());

        for ((worker_id, assigned), route) in groups.into_iter().zip(routes) {
            let resequenced = if self.config.apply_routes {
                resequence(&assigned, &route, index, day_start, day_end)
            } else {
                None
            };

            let slots = match resequenced {
                Some(retimed) => {
                    debug!("Applied route order for {worker_id}");
                    retimed
                }
                None => {
                    if self.config.apply_routes {
                        debug!("Route for {worker_id} infeasible; keeping assignment order");
                    }
                    assigned
                }
            };
            final_routes.push(optimizer.along_slots(&worker_id, &slots));
            tasks.extend(slots);
        }

        (tasks, final_routes)
    }
}

/// Re-times `tasks` in route order.
///
/// The first stop keeps its start; later stops start after travel,
/// waiting out hard constraints. Returns `None` when a task would end
/// after the workday or outside the calendar range.
fn resequence(
    tasks: &[ScheduledTask],
    route: &RouteOptimization,
    index: &ConstraintIndex<'_>,
    day_start: NaiveDateTime,
    day_end: Option<NaiveDateTime>,
) -> Option<Vec<ScheduledTask>> {
    let by_id: HashMap<&str, &ScheduledTask> =
        tasks.iter().map(|t| (t.task_id(), t)).collect();
    let mut out = Vec::with_capacity(tasks.len());
    let mut previous_end: Option<NaiveDateTime> = None;

    for stop in &route.stops {
        let original = by_id.get(stop.task_id.as_str())?;
        let minutes = original.duration_minutes();

        let mut start = match previous_end {
            None => original.scheduled_start,
            Some(end) => add_minutes(end, stop.travel_minutes)?.max(day_start),
        };
        let mut end = add_minutes(start, minutes)?;
        while let Some(blocked_until) =
            index.hard_conflict(original.primary_worker(), original.task_id(), start, end)
        {
            if blocked_until <= start {
                break;
            }
            start = blocked_until;
            end = add_minutes(start, minutes)?;
        }
        if day_end.is_some_and(|limit| end > limit) {
            return None;
        }

        let mut task = (*original).clone();
        task.scheduled_start = start;
        task.scheduled_end = end;
        task.travel_minutes = stop.travel_minutes;
        task.sequence = stop.sequence;
        out.push(task);
        previous_end = Some(end);
    }

    Some(out)
}

/// Keeps the first worker per id.
fn dedup_workers(workers: Vec<Worker>) -> Vec<Worker> {
    let mut seen = std::collections::HashSet::new();
    workers
        .into_iter()
        .filter(|w| seen.insert(w.id.clone()))
        .collect()
}

/// Groups slots by primary worker, in pool order.
fn group_by_worker(
    workers: &[Worker],
    scheduled: Vec<ScheduledTask>,
) -> Vec<(String, Vec<ScheduledTask>)> {
    let mut by_worker: HashMap<String, Vec<ScheduledTask>> = HashMap::new();
    for task in scheduled {
        by_worker
            .entry(task.primary_worker().to_string())
            .or_default()
            .push(task);
    }
    workers
        .iter()
        .filter_map(|w| by_worker.remove(&w.id).map(|mut tasks| {
            tasks.sort_by_key(|t| t.sequence);
            (w.id.clone(), tasks)
        }))
        .collect()
}

/// Reorders predictions to follow the final task list.
fn order_predictions(
    predictions: Vec<TimePrediction>,
    tasks: &[ScheduledTask],
) -> Vec<TimePrediction> {
    let mut by_task: HashMap<String, TimePrediction> = predictions
        .into_iter()
        .map(|p| (p.task_id.clone(), p))
        .collect();
    tasks
        .iter()
        .filter_map(|t| by_task.remove(t.task_id()))
        .collect()
}

fn mean_experience(workers: &[Worker], task: &SchedulingTask) -> Option<f64> {
    let scores: Vec<f64> = workers
        .iter()
        .filter(|w| w.active && w.has_all_skills(&task.required_skills))
        .filter_map(|w| w.experience_score(&task.required_skills))
        .collect();
    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::models::{ConstraintKind, TaskPriority, TimeWindow, WeatherCondition};
    use chrono::{DateTime, NaiveTime, TimeZone, Utc};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        date().and_hms_opt(h, m, 0).unwrap()
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 28, 18, 0, 0).unwrap()
    }

    fn stands() -> LocationTable {
        LocationTable::new()
            .with_location("S1", 49.000, 2.500)
            .with_location("S2", 49.010, 2.500)
            .with_location("S3", 49.002, 2.520)
            .with_location("S4", 49.001, 2.500)
    }

    fn engine_with(config: EngineConfig, workers: Vec<Worker>) -> SchedulingEngine {
        SchedulingEngine::new(config, Arc::new(workers))
            .unwrap()
            .with_clock(Arc::new(FixedClock(stamp())))
    }

    fn engine(workers: Vec<Worker>) -> SchedulingEngine {
        engine_with(EngineConfig::default(), workers)
    }

    fn error_count(schedule: &OptimizedSchedule, kind: ViolationKind) -> usize {
        schedule
            .violations_of(&kind)
            .iter()
            .filter(|v| v.is_error())
            .count()
    }

    #[test]
    fn test_two_tasks_one_worker_same_location() {
        let engine = engine(vec![Worker::new("W1")]);
        let request = ScheduleRequest::new(
            date(),
            vec![
                SchedulingTask::new("T1", "S1", 60),
                SchedulingTask::new("T2", "S1", 60),
            ],
        )
        .with_locations(stands());

        let s = engine.schedule(&request);
        assert_eq!(s.task_count(), 2);
        assert_eq!(s.tasks[0].scheduled_start, at(8, 0));
        assert_eq!(s.tasks[1].scheduled_start, at(9, 0));
        assert_eq!(s.total_travel_minutes, 0);
        assert_eq!(s.efficiency, 100.0);
        assert_eq!(s.utilization, 100.0);
        assert!(s.violations.is_empty());
        assert_eq!(s.generated_at, stamp());
        assert_eq!(s.routes.len(), 1);
        assert_eq!(s.predictions.len(), 2);
        assert!(!s.incomplete);
        assert!(!s.degraded);
    }

    #[test]
    fn test_zero_eligible_workers() {
        let engine = engine(vec![Worker::new("W1").with_active(false)]);
        let request = ScheduleRequest::new(
            date(),
            vec![
                SchedulingTask::new("T1", "S1", 60),
                SchedulingTask::new("T2", "S2", 45),
            ],
        )
        .with_locations(stands());

        let s = engine.schedule(&request);
        assert_eq!(s.task_count(), 0);
        assert_eq!(error_count(&s, ViolationKind::NoEligibleWorker), 2);
        // Listed in attempt order: Balanced puts the shorter T2 first
        assert_eq!(s.unscheduled_task_ids, vec!["T2".to_string(), "T1".to_string()]);
        assert_eq!(s.efficiency, 0.0);
        assert_eq!(s.utilization, 0.0);
        assert!(s.routes.is_empty());
        assert!(!s.is_valid());
    }

    #[test]
    fn test_invalid_tasks_rejected_before_assignment() {
        let engine = engine(vec![Worker::new("W1")]);
        let request = ScheduleRequest::new(
            date(),
            vec![
                SchedulingTask::new("T1", "S1", 60),
                SchedulingTask::new("T2", "", 60),
                SchedulingTask::new("T3", "S1", 0),
                SchedulingTask::new("T1", "S1", 30),
            ],
        )
        .with_locations(stands());

        let s = engine.schedule(&request);
        assert_eq!(s.task_count(), 1);
        assert_eq!(error_count(&s, ViolationKind::Validation), 3);
        assert!(s.unscheduled_task_ids.is_empty());
    }

    #[test]
    fn test_unknown_location_warns_and_counts_zero_travel() {
        let engine = engine(vec![Worker::new("W1")]);
        let request = ScheduleRequest::new(
            date(),
            vec![
                SchedulingTask::new("T1", "S1", 30),
                SchedulingTask::new("T2", "HANGAR-X", 30),
            ],
        )
        .with_locations(stands());

        let s = engine.schedule(&request);
        assert_eq!(s.task_count(), 2);
        assert_eq!(s.total_travel_minutes, 0);
        assert_eq!(s.violations_of(&ViolationKind::UnknownLocation).len(), 1);
        assert!(s.is_valid());
    }

    #[test]
    fn test_route_order_applied() {
        // Assignment order S1, S2, S4; nearest neighbor visits S1, S4, S2
        let engine = engine(vec![Worker::new("W1")]);
        let request = ScheduleRequest::new(
            date(),
            vec![
                SchedulingTask::new("T1", "S1", 30),
                SchedulingTask::new("T2", "S2", 30),
                SchedulingTask::new("T3", "S4", 30),
            ],
        )
        .with_locations(stands());

        let s = engine.schedule(&request);
        let ids: Vec<&str> = s.tasks_for_worker("W1").iter().map(|t| t.task_id()).collect();
        assert_eq!(ids, vec!["T1", "T3", "T2"]);
        assert_eq!(s.sequences_by_worker()["W1"], vec![1, 2, 3]);
        assert_eq!(s.route_for_worker("W1").unwrap().task_order(), ids);
        assert_eq!(s.total_travel_minutes, s.route_for_worker("W1").unwrap().total_travel_minutes);

        let unrouted = engine_with(
            EngineConfig::default().with_apply_routes(false),
            vec![Worker::new("W1")],
        )
        .schedule(&request);
        assert!(s.total_travel_minutes <= unrouted.total_travel_minutes);
        let ids: Vec<&str> = unrouted.tasks_for_worker("W1").iter().map(|t| t.task_id()).collect();
        assert_eq!(ids, vec!["T1", "T2", "T3"]);
    }

    #[test]
    fn test_infeasible_route_keeps_assignment_order() {
        // T3 is blocked until 09:30. In route order T2 would end 10:32.
        let config = EngineConfig::default()
            .with_workday_end(NaiveTime::from_hms_opt(10, 15, 0).unwrap());
        let engine = engine_with(config, vec![Worker::new("W1")]);
        let request = ScheduleRequest::new(
            date(),
            vec![
                SchedulingTask::new("T1", "S1", 30),
                SchedulingTask::new("T2", "S2", 30),
                SchedulingTask::new("T3", "S4", 30),
            ],
        )
        .with_locations(stands())
        .with_constraint(SchedulingConstraint::hard(
            "HOLD",
            ConstraintKind::Maintenance,
            "T3",
            TimeWindow::new(at(8, 0), at(9, 30)),
        ));

        let s = engine.schedule(&request);
        let ids: Vec<&str> = s.tasks_for_worker("W1").iter().map(|t| t.task_id()).collect();
        assert_eq!(ids, vec!["T1", "T2", "T3"]);
        assert_eq!(s.scheduled_task("T3").unwrap().scheduled_start, at(9, 30));
        let route = s.route_for_worker("W1").unwrap();
        assert_eq!(route.task_order(), ids);
        for stop in &route.stops {
            assert_eq!(stop.arrival, s.scheduled_task(&stop.task_id).unwrap().scheduled_start);
        }
    }

    #[test]
    fn test_route_stops_match_retimed_slots() {
        // Route order T1, T3, T2 is applied; T3 waits for its hold to lift
        let engine = engine(vec![Worker::new("W1")]);
        let request = ScheduleRequest::new(
            date(),
            vec![
                SchedulingTask::new("T1", "S1", 30),
                SchedulingTask::new("T2", "S2", 30),
                SchedulingTask::new("T3", "S4", 30),
            ],
        )
        .with_locations(stands())
        .with_constraint(SchedulingConstraint::hard(
            "HOLD",
            ConstraintKind::Maintenance,
            "T3",
            TimeWindow::new(at(8, 0), at(9, 30)),
        ));

        let s = engine.schedule(&request);
        let ids: Vec<&str> = s.tasks_for_worker("W1").iter().map(|t| t.task_id()).collect();
        assert_eq!(ids, vec!["T1", "T3", "T2"]);
        assert_eq!(s.scheduled_task("T3").unwrap().scheduled_start, at(9, 30));
        assert_eq!(s.scheduled_task("T2").unwrap().scheduled_start, at(10, 2));

        let route = s.route_for_worker("W1").unwrap();
        assert_eq!(route.task_order(), ids);
        for stop in &route.stops {
            let slot = s.scheduled_task(&stop.task_id).unwrap();
            assert_eq!(stop.arrival, slot.scheduled_start);
            assert_eq!(stop.departure, slot.scheduled_end);
            assert_eq!(stop.travel_minutes, slot.travel_minutes);
        }
        assert_eq!(route.total_travel_minutes, s.total_travel_minutes);
    }

    #[test]
    fn test_out_of_range_duration_is_reported() {
        let engine = engine(vec![Worker::new("W1")]);
        let request = ScheduleRequest::new(
            date(),
            vec![
                SchedulingTask::new("HUGE", "S1", 1_000_000_000_000),
                SchedulingTask::new("T2", "S1", 60),
            ],
        )
        .with_locations(stands());

        let s = engine.schedule(&request);
        assert_eq!(s.task_count(), 1);
        assert_eq!(error_count(&s, ViolationKind::Validation), 1);

        // Without the bound the slot leaves the calendar and the task is unassigned
        let unbounded = engine_with(
            EngineConfig::default().with_max_task_minutes(i64::MAX),
            vec![Worker::new("W1")],
        )
        .schedule(&request);
        assert_eq!(unbounded.task_count(), 1);
        assert_eq!(unbounded.unscheduled_task_ids, vec!["HUGE".to_string()]);
        assert_eq!(error_count(&unbounded, ViolationKind::NoEligibleWorker), 1);
    }

    #[test]
    fn test_soft_constraint_warning() {
        let engine = engine(vec![Worker::new("W1")]);
        let request = ScheduleRequest::new(date(), vec![SchedulingTask::new("T1", "S1", 60)])
            .with_locations(stands())
            .with_constraint(SchedulingConstraint::soft(
                "BREAK",
                ConstraintKind::Availability,
                "W1",
                TimeWindow::new(at(8, 30), at(8, 45)),
            ));

        let s = engine.schedule(&request);
        assert_eq!(s.task_count(), 1);
        let soft = s.violations_of(&ViolationKind::SoftConstraint);
        assert_eq!(soft.len(), 1);
        assert_eq!(soft[0].constraint_id.as_deref(), Some("BREAK"));
        assert!(s.is_valid());
    }

    #[test]
    fn test_cancelled_run_is_incomplete() {
        let engine = engine(vec![Worker::new("W1")]);
        let request = ScheduleRequest::new(
            date(),
            vec![
                SchedulingTask::new("T1", "S1", 60),
                SchedulingTask::new("T2", "S1", 60),
            ],
        )
        .with_locations(stands());
        let token = CancellationToken::new();
        token.cancel();

        let s = engine.schedule_with_cancel(&request, &token);
        assert!(s.incomplete);
        assert_eq!(s.task_count(), 0);
        assert_eq!(s.unscheduled_task_ids.len(), 2);
        assert_eq!(s.violations_of(&ViolationKind::Cancelled).len(), 2);
        assert!(s.is_valid());
    }

    #[test]
    fn test_timeout_zero_is_incomplete() {
        let engine = engine_with(
            EngineConfig::default().with_timeout_ms(0),
            vec![Worker::new("W1")],
        );
        let request = ScheduleRequest::new(date(), vec![SchedulingTask::new("T1", "S1", 60)])
            .with_locations(stands());
        assert!(engine.schedule(&request).incomplete);
    }

    #[test]
    fn test_degraded_forces_pool_order() {
        let config = EngineConfig::default()
            .with_degrade_threshold(1)
            .with_selection(SelectionPolicy::EarliestAvailable);
        let engine = engine_with(config, vec![Worker::new("W1"), Worker::new("W2")]);
        let request = ScheduleRequest::new(
            date(),
            vec![
                SchedulingTask::new("T1", "S1", 60),
                SchedulingTask::new("T2", "S1", 60),
            ],
        )
        .with_locations(stands());

        let s = engine.schedule(&request);
        assert!(s.degraded);
        assert_eq!(s.assigned_workers().len(), 1);
        assert_eq!(s.utilization, 50.0);

        let normal = engine_with(
            EngineConfig::default().with_selection(SelectionPolicy::EarliestAvailable),
            vec![Worker::new("W1"), Worker::new("W2")],
        )
        .schedule(&request);
        assert!(!normal.degraded);
        assert_eq!(normal.assigned_workers().len(), 2);
    }

    #[test]
    fn test_external_violations_merged() {
        let external =
            ConstraintViolation::external(Some("GATE-CLOSED".into()), None, "Gate 4 closed");
        let engine = engine(vec![Worker::new("W1")]);
        let request = ScheduleRequest::new(date(), vec![SchedulingTask::new("T1", "S1", 60)])
            .with_locations(stands())
            .with_external_violation(external.clone())
            .with_external_violation(external.clone());

        let s = engine.schedule(&request);
        assert_eq!(s.violations, vec![external]);
        assert!(!s.is_valid());
    }

    #[test]
    fn test_algorithm_override_and_priority_order() {
        let engine = engine(vec![Worker::new("W1")]);
        let request = ScheduleRequest::new(
            date(),
            vec![
                SchedulingTask::new("LONG", "S1", 90).with_priority(TaskPriority::Urgent),
                SchedulingTask::new("SHORT", "S1", 20),
            ],
        )
        .with_locations(stands());

        let quality = engine.schedule(&request.clone().with_algorithm(Algorithm::Quality));
        assert_eq!(quality.algorithm, Algorithm::Quality);
        assert_eq!(quality.scheduled_task("LONG").unwrap().sequence, 1);

        let efficiency = engine.schedule(&request.with_algorithm(Algorithm::Efficiency));
        assert_eq!(efficiency.scheduled_task("SHORT").unwrap().sequence, 1);
    }

    #[test]
    fn test_weather_applied_in_run() {
        let engine = engine(vec![Worker::new("W1")]);
        let request = ScheduleRequest::new(
            date(),
            vec![SchedulingTask::new("T1", "S1", 60).with_weather_sensitive(true)],
        )
        .with_locations(stands())
        .with_weather(WeatherSnapshot::new(WeatherCondition::Snow, 0.9));

        let s = engine.schedule(&request);
        assert_eq!(s.tasks[0].predicted_minutes, 78);
        assert_eq!(s.tasks[0].scheduled_end, at(9, 18));
        assert_eq!(s.predictions[0].factors.weather_impact, 1.3);
    }

    #[test]
    fn test_predict_uses_pool_experience() {
        let engine = engine(vec![
            Worker::new("W1").with_experience(1.0),
            Worker::new("W2").with_experience(0.0),
        ]);
        let request = ScheduleRequest::new(date(), vec![SchedulingTask::new("T1", "S1", 100)]);
        let predictions = engine.predict(&request);
        assert_eq!(predictions.len(), 1);
        // Mean experience 0.5 is neutral
        assert_eq!(predictions[0].predicted_minutes, 100);
    }

    #[test]
    fn test_random_inputs_hold_invariants() {
        let mut rng = SmallRng::seed_from_u64(11);
        let skills = ["cabin", "exterior", "lavatory"];
        let spots = ["S1", "S2", "S3", "S4"];

        for _ in 0..20 {
            let workers: Vec<Worker> = (0..rng.random_range(1..5))
                .map(|i| {
                    Worker::new(format!("W{i}"))
                        .with_skill(skills[rng.random_range(0..3)], rng.random_range(0.0..1.0))
                        .with_active(rng.random_bool(0.8))
                })
                .collect();
            let tasks: Vec<SchedulingTask> = (0..rng.random_range(0..25))
                .map(|i| {
                    let mut t = SchedulingTask::new(
                        format!("T{i}"),
                        spots[rng.random_range(0..4)],
                        rng.random_range(10..120),
                    );
                    if rng.random_bool(0.5) {
                        t = t.with_required_skill(skills[rng.random_range(0..3)]);
                    }
                    t
                })
                .collect();
            let n = tasks.len();

            let request = ScheduleRequest::new(date(), tasks).with_locations(stands());
            let s = engine(workers).schedule(&request);

            assert!((0.0..=100.0).contains(&s.efficiency));
            assert!((0.0..=100.0).contains(&s.utilization));
            assert_eq!(
                s.task_count() + error_count(&s, ViolationKind::NoEligibleWorker),
                n
            );
            for seqs in s.sequences_by_worker().values() {
                let expected: Vec<u32> = (1..=seqs.len() as u32).collect();
                assert_eq!(seqs, &expected);
            }
            let ids: HashSet<&str> = s.tasks.iter().map(|t| t.task_id()).collect();
            assert_eq!(ids.len(), s.task_count());
            assert_eq!(
                s.total_travel_minutes,
                s.tasks.iter().map(|t| t.travel_minutes).sum::<i64>()
            );
        }
    }
}
