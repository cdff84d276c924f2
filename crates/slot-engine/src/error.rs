//! Error types for engine operations.
//!
//! Only caller misconfiguration is fatal. Data-quality defects in upstream
//! calendar data never surface here; they are reported on the
//! [`Diagnostic`](crate::normalize::Diagnostic) side channel instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The zone argument passed to a zone-aware operation is not a
    /// recognized IANA zone identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The working-hours window is not a valid hours-of-day range.
    #[error("Invalid working hours: {0}")]
    InvalidWorkingHours(String),

    /// The inter-meeting buffer is negative.
    #[error("Invalid buffer: {0}")]
    InvalidBuffer(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
