//! Greedy assignment, the scheduling pipeline and schedule metrics.
//!
//! # Algorithm
//!
//! `AssignmentEngine` uses a greedy, priority-driven, first-fit heuristic:
//! each task goes to the first eligible worker (or the earliest available
//! one) with no backtracking. It is not optimal, but it is fast and
//! deterministic. `SchedulingEngine` wraps it with validation,
//! prioritization, route sequencing and metrics.
//!
//! # Metrics
//!
//! `ScheduleMetrics` computes efficiency (work share of busy time) and
//! utilization (share of active workers with work).
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod assignment;
mod engine;
mod kpi;

pub use assignment::{soft_constraint_warnings, AssignmentEngine, AssignmentState, SelectionPolicy};
pub use engine::{ScheduleRequest, SchedulingEngine};
pub use kpi::{merge_violations, ScheduleMetrics};
