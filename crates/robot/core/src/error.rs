//! Configuration errors reported at behavior construction time.
//!
//! These are the only errors the orchestration layer surfaces to callers.
//! A rejected configuration never reaches the scheduler.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("{field} must be a finite, non-negative number of seconds (got {value})")]
    InvalidDuration { field: &'static str, value: f64 },

    #[error("{field} must be a positive speed no greater than {max} rpm (got {value})")]
    InvalidRpm {
        field: &'static str,
        value: f64,
        max: f64,
    },

    #[error("{field} = {value} is outside the climber range [{min}, {max}]")]
    SetpointOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be a positive, finite limit (got {value})")]
    InvalidLimit { field: &'static str, value: f64 },

    #[error("climber range is empty: min_height {min} is not below max_height {max}")]
    EmptyRange { min: f64, max: f64 },
}
