//! Core error types for calgo-core.
//!
//! `CoreError` is what every public operation returns. Planning distinguishes
//! recoverable failures (`NoSlotAvailable`, logged per iteration) from fatal
//! ones (`EventSource`, `Insertion`).

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

/// Core error type for calgo-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Day or range expression that does not match the grammar
    #[error("Invalid date expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    /// The target day cannot fit a slot of the requested length
    #[error("No slot of {minutes} minutes available on {date}")]
    NoSlotAvailable { date: NaiveDate, minutes: i64 },

    /// Loading the baseline schedule failed
    #[error("Failed to load events from calendar '{calendar_id}': {source}")]
    EventSource {
        calendar_id: String,
        #[source]
        source: Box<CoreError>,
    },

    /// Persisting a planned event failed part way through a commit
    #[error("{committed} of {total} events committed: {source}")]
    Insertion {
        committed: usize,
        total: usize,
        #[source]
        source: Box<CoreError>,
    },

    /// Operation is not allowed in the planner's current state
    #[error("Cannot {operation} while the plan is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// Remote calendar service errors
    #[error("Integration error for '{service}': {message}")]
    Integration {
        service: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn invalid_expression(expression: &str, reason: impl Into<String>) -> Self {
        CoreError::InvalidExpression {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn integration(service: &str, message: impl Into<String>) -> Self {
        CoreError::Integration {
            service: service.to_string(),
            message: message.into(),
            source: None,
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end_time ({end}) must be greater than start_time ({start})")]
    InvalidTimeRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        CoreError::Integration {
            service: "google".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_error_reports_progress() {
        let err = CoreError::Insertion {
            committed: 1,
            total: 3,
            source: Box::new(CoreError::integration("memory", "rejected")),
        };
        assert_eq!(
            err.to_string(),
            "1 of 3 events committed: Integration error for 'memory': rejected"
        );
    }

    #[test]
    fn invalid_expression_mentions_input() {
        let err = CoreError::invalid_expression("xx", "unsupported token");
        assert!(err.to_string().contains("'xx'"));
    }
}
