//! Error types for timelex operations.

use chrono::Weekday;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimelexError {
    #[error("Invalid syntax: {0}")]
    InvalidSyntax(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Unrecognized time unit: {0}")]
    UnknownUnit(String),

    #[error("Unrecognized timestamp format: {0}")]
    UnknownFormat(String),

    #[error("Calendar rejected the time: {0}")]
    Calendar(String),

    #[error("Date falls on {actual}, expected {expected}")]
    WeekdayMismatch { expected: Weekday, actual: Weekday },

    #[error("Output buffer too small")]
    BufferTooSmall,
}

pub type Result<T> = std::result::Result<T, TimelexError>;
