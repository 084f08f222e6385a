//! Error types for the crew scheduler.
//!
//! Problems found while building a schedule (unassignable tasks, malformed
//! input rows, soft-constraint breaches) are reported as
//! [`ConstraintViolation`](crate::models::ConstraintViolation) values inside
//! the resulting schedule. `ScheduleError` covers the API calls that can
//! genuinely fail: loading configuration and driving task status.

use thiserror::Error;

use crate::models::TaskStatus;

/// Result type for crew-schedule operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors returned by the fallible parts of the public API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed.
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    /// A task status change would move backwards or skip a state.
    #[error("Invalid status transition for task '{task_id}': {from:?} -> {to:?}")]
    InvalidTransition {
        task_id: String,
        from: TaskStatus,
        to: TaskStatus,
    },
}

impl From<toml::de::Error> for ScheduleError {
    fn from(err: toml::de::Error) -> Self {
        ScheduleError::ConfigParse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScheduleError::InvalidConfig("history_limit must be > 0".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: history_limit must be > 0"
        );

        let err = ScheduleError::InvalidTransition {
            task_id: "T1".into(),
            from: TaskStatus::Completed,
            to: TaskStatus::Pending,
        };
        assert!(err.to_string().contains("'T1'"));
        assert!(err.to_string().contains("Completed -> Pending"));
    }
}
