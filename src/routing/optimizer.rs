//! Nearest-neighbor route construction.
//!
//! # Algorithm
//!
//! 1. Start at the worker's first task by assignment order.
//! 2. Repeatedly move to the closest unvisited task location (ties go to
//!    the earlier assignment).
//! 3. Optionally improve the path with 2-opt (first stop fixed).
//! 4. Walk the order: arrival = previous departure + travel,
//!    departure = arrival + task duration.
//!
//! Once slots have been re-timed, [`RouteOptimizer::along_slots`] reports
//! the route with stop times taken from the slots themselves.
//!
//! # Complexity
//! O(n²) per worker for construction, O(n²) per 2-opt sweep.

use chrono::NaiveDateTime;
use log::debug;
use rayon::prelude::*;

use super::{two_opt, RouteConfig, TravelMatrix};
use crate::cancel::CancellationToken;
use crate::models::{add_minutes, RouteOptimization, RouteStop, ScheduledTask};

/// Source of stop arrival and departure times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopTimes {
    /// Walked from the first slot's start along the route.
    Projected,
    /// Copied from each slot.
    FromSlots,
}

/// Sequences one worker's tasks over a shared, read-only travel matrix.
#[derive(Debug, Clone, Copy)]
pub struct RouteOptimizer<'a> {
    matrix: &'a TravelMatrix,
    config: &'a RouteConfig,
}

impl<'a> RouteOptimizer<'a> {
    /// Creates an optimizer.
    pub fn new(matrix: &'a TravelMatrix, config: &'a RouteConfig) -> Self {
        Self { matrix, config }
    }

    /// Builds the route for one worker.
    ///
    /// `tasks` must be in assignment order. `allow_two_opt` lets the
    /// caller veto the improvement pass (e.g. under load).
    pub fn optimize(
        &self,
        worker_id: &str,
        tasks: &[ScheduledTask],
        allow_two_opt: bool,
    ) -> RouteOptimization {
        let mut order = self.nearest_neighbor_order(tasks);

        if allow_two_opt && self.config.two_opt && tasks.len() <= self.config.two_opt_max_stops {
            let moves = two_opt::improve(&mut order, |a, b| {
                self.matrix
                    .distance_km(&tasks[a].task.location_id, &tasks[b].task.location_id)
            });
            debug!("2-opt applied {moves} moves to route of {worker_id}");
        }

        self.build_route(worker_id, tasks, &order, StopTimes::Projected)
    }

    /// Route visiting `tasks` in the given order, without optimization.
    pub fn in_given_order(&self, worker_id: &str, tasks: &[ScheduledTask]) -> RouteOptimization {
        let order: Vec<usize> = (0..tasks.len()).collect();
        self.build_route(worker_id, tasks, &order, StopTimes::Projected)
    }

    /// Route visiting `tasks` in the given order, each stop arriving at
    /// its slot start and departing at its slot end.
    pub fn along_slots(&self, worker_id: &str, tasks: &[ScheduledTask]) -> RouteOptimization {
        let order: Vec<usize> = (0..tasks.len()).collect();
        self.build_route(worker_id, tasks, &order, StopTimes::FromSlots)
    }

    /// Builds routes for many workers, in parallel when configured.
    ///
    /// Output order matches input order. Once `cancel` fires, remaining
    /// workers get their tasks in the given order.
    pub fn optimize_all(
        &self,
        groups: &[(String, Vec<ScheduledTask>)],
        allow_two_opt: bool,
        cancel: &CancellationToken,
    ) -> Vec<RouteOptimization> {
        let route = |(worker, tasks): &(String, Vec<ScheduledTask>)| {
            if cancel.is_cancelled() {
                self.in_given_order(worker, tasks)
            } else {
                self.optimize(worker, tasks, allow_two_opt)
            }
        };
        if self.config.parallel {
            groups.par_iter().map(route).collect()
        } else {
            groups.iter().map(route).collect()
        }
    }

    /// Visiting order as indices into `tasks`.
    pub fn nearest_neighbor_order(&self, tasks: &[ScheduledTask]) -> Vec<usize> {
        let n = tasks.len();
        if n == 0 {
            return Vec::new();
        }

        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);
        let mut current = 0;
        visited[0] = true;
        order.push(0);

        while order.len() < n {
            let from = &tasks[current].task.location_id;
            let mut best: Option<(usize, f64)> = None;
            for (j, task) in tasks.iter().enumerate() {
                if visited[j] {
                    continue;
                }
                let d = self.matrix.distance_km(from, &task.task.location_id);
                if best.map_or(true, |(_, bd)| d < bd) {
                    best = Some((j, d));
                }
            }
            // Loop condition guarantees an unvisited task remains.
            let Some((next, _)) = best else { break };
            visited[next] = true;
            order.push(next);
            current = next;
        }

        order
    }

    fn build_route(
        &self,
        worker_id: &str,
        tasks: &[ScheduledTask],
        order: &[usize],
        times: StopTimes,
    ) -> RouteOptimization {
        let mut stops = Vec::with_capacity(order.len());
        let mut total_distance_km = 0.0;
        let mut total_travel_minutes = 0;
        let mut previous: Option<&ScheduledTask> = None;
        let mut clock = order.first().map(|&i| tasks[i].scheduled_start);

        for (pos, &idx) in order.iter().enumerate() {
            let task = &tasks[idx];
            let (distance_km, travel_minutes) = match previous {
                Some(prev) => (
                    self.matrix
                        .distance_km(&prev.task.location_id, &task.task.location_id),
                    self.matrix
                        .travel_minutes(&prev.task.location_id, &task.task.location_id),
                ),
                None => (0.0, 0),
            };

            let (arrival, departure) = match times {
                StopTimes::FromSlots => (task.scheduled_start, task.scheduled_end),
                StopTimes::Projected => {
                    let from = clock.unwrap_or(task.scheduled_start);
                    let arrival = saturating_add(from, travel_minutes);
                    (arrival, saturating_add(arrival, task.duration_minutes()))
                }
            };

            stops.push(RouteStop {
                sequence: pos as u32 + 1,
                task_id: task.task.id.clone(),
                location_id: task.task.location_id.clone(),
                travel_minutes,
                distance_km,
                arrival,
                departure,
            });

            total_distance_km += distance_km;
            total_travel_minutes += travel_minutes;
            clock = Some(departure);
            previous = Some(task);
        }

        let efficiency = route_efficiency(
            total_travel_minutes,
            stops.len(),
            self.config.acceptable_travel_minutes_per_task,
        );

        RouteOptimization {
            worker_id: worker_id.to_string(),
            stops,
            total_distance_km,
            total_travel_minutes,
            efficiency,
        }
    }
}

fn saturating_add(time: NaiveDateTime, minutes: i64) -> NaiveDateTime {
    add_minutes(time, minutes).unwrap_or(NaiveDateTime::MAX)
}

/// `100 − travel / (stops × acceptable) × 100`, clamped to [0, 100].
pub(crate) fn route_efficiency(travel_minutes: i64, stops: usize, acceptable_per_stop: f64) -> f64 {
    if stops == 0 {
        return 100.0;
    }
    let ceiling = stops as f64 * acceptable_per_stop;
    (100.0 - travel_minutes as f64 / ceiling * 100.0).clamp(0.0, 100.0)
}
