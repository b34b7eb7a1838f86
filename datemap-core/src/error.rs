//! Error types for datemap.

use thiserror::Error;

use crate::date_key::DateKey;

/// Input problems caught before the store is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Event name is required")]
    MissingName,

    #[error("Start time is required")]
    MissingStartTime,

    #[error("End time is required")]
    MissingEndTime,

    #[error("Invalid time '{0}'. Expected HH:MM or YYYY-MM-DDTHH:MM")]
    InvalidTime(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month {0}. Expected 1-12")]
    InvalidMonth(u32),

    #[error("Year {0} is out of range")]
    InvalidYear(i32),

    #[error("End time must be after start time")]
    EndNotAfterStart,

    #[error("Event starts on {actual}, not on {expected}")]
    DateMismatch { expected: DateKey, actual: DateKey },
}

/// Errors that can occur in datemap operations.
#[derive(Error, Debug)]
pub enum DateMapError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The candidate clashes with `conflicts` (event names) on `date`.
    #[error("This event overlaps with an existing event.")]
    Overlap { date: DateKey, conflicts: Vec<String> },

    #[error("Event '{id}' not found on {date}")]
    NotFound { date: DateKey, id: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for datemap operations.
pub type DateMapResult<T> = Result<T, DateMapError>;
