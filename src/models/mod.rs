//! Scheduling domain models.
//!
//! Data types consumed and produced by the scheduling pipeline. All of
//! them serialize with serde so persistence and UI layers can store or
//! render them without the engine knowing about either.
//!
//! # Domain Mappings
//!
//! | crew-schedule | Airport operations |
//! |---------------|--------------------|
//! | SchedulingTask | Cleaning job on one aircraft |
//! | Worker | Cleaning crew member |
//! | SchedulingConstraint | Break, stand closure, weather hold |
//! | RouteOptimization | A crew member's walk/drive between stands |
//! | OptimizedSchedule | The day plan |

mod constraint;
mod location;
mod prediction;
mod route;
mod schedule;
mod task;
mod worker;

pub use constraint::{ConstraintKind, ConstraintSeverity, SchedulingConstraint, TimeWindow};
pub use location::{Coordinates, LocationTable, EARTH_RADIUS_KM};
pub use prediction::{PredictionFactors, TimePrediction, WeatherCondition, WeatherSnapshot};
pub use route::{RouteOptimization, RouteStop};
pub(crate) use schedule::add_minutes;
pub use schedule::{
    ConstraintViolation, OptimizedSchedule, ScheduledTask, ViolationKind, ViolationSeverity,
};
pub use task::{InterventionKind, SchedulingTask, TaskPriority, TaskStatus};
pub use worker::{Skill, Worker, WorkerPool};
