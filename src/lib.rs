//! Scheduling engine for aircraft cleaning crews.
//!
//! Turns a day's cleaning tasks, a worker pool and time-window constraints
//! into an optimized schedule: who does what, when, in which order, and
//! how much walking between stands that costs.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `SchedulingTask`, `Worker`,
//!   `SchedulingConstraint`, `ScheduledTask`, `OptimizedSchedule`,
//!   `RouteOptimization`, `TimePrediction`
//! - **`prediction`**: Multi-factor duration predictor
//! - **`dispatching`**: Task prioritization (`Efficiency`, `Quality`, `Balanced`)
//! - **`scheduler`**: Greedy assignment, the end-to-end pipeline, metrics
//! - **`routing`**: Haversine travel matrix and nearest-neighbor sequencing
//! - **`validation`**: Input checks before scheduling
//! - **`config`**: Engine configuration (TOML-loadable)
//! - **`cancel`**, **`clock`**, **`history`**: Run control and bookkeeping
//!
//! # Pipeline
//!
//! ```text
//! validate → prioritize → assign → route → metrics → OptimizedSchedule
//! ```
//!
//! The core is pure: no storage, no network. Persistence and presentation
//! layers consume the serde-serializable models.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Toth & Vigo (2014), "Vehicle Routing: Problems, Methods, and Applications"

pub mod cancel;
pub mod clock;
pub mod config;
pub mod dispatching;
pub mod error;
pub mod history;
pub mod models;
pub mod prediction;
pub mod routing;
pub mod scheduler;
pub mod validation;

pub use error::{Result, ScheduleError};
