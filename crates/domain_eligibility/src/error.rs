//! Eligibility domain errors
//!
//! Evaluation itself never fails. These errors only arise when a
//! compensation schedule is built or loaded.

use thiserror::Error;

/// Errors raised while constructing a compensation schedule
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Schedule must contain at least one distance band")]
    EmptySchedule,

    #[error("Band {index} has no upper bound but is not the last band")]
    UnboundedBandNotLast { index: usize },

    #[error("Last band must be open-ended (no upper distance bound)")]
    MissingOpenBand,

    #[error("Band {index} upper bound {current} km must exceed previous bound {previous} km")]
    NonIncreasingBound { index: usize, previous: u32, current: u32 },

    #[error("Band {index} has a zero upper bound")]
    ZeroUpperBound { index: usize },

    #[error("Band {index} has negative delay threshold {minutes}")]
    NegativeDelayThreshold { index: usize, minutes: i64 },

    #[error("Unsupported compensation amount: {0} EUR")]
    UnsupportedAmount(u32),

    #[error("Failed to parse schedule: {0}")]
    Parse(String),

    #[error("Failed to read schedule file: {0}")]
    Io(String),
}
