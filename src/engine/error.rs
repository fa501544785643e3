use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

/// Error taxonomy of the attendance engine.
///
/// "No shift assigned" and "no data" are expected states, not errors; only
/// bad input and genuine storage failures surface here. An out-of-scope
/// report filter yields an empty result set, never an error.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Dangling shift reference. Callers fall back to no-schedule semantics
    /// instead of failing the classification.
    #[error("shift not found: shift_id={0}")]
    ShiftNotFound(u64),

    /// Check-out precedes check-in on a window that does not cross midnight.
    /// Rejected outright; corrections go through regularization.
    #[error("check-out {check_out} precedes check-in {check_in}")]
    InvalidPunchOrder {
        check_in: NaiveTime,
        check_out: NaiveTime,
    },

    /// Concurrent write collision on (employee, date) that survived a retry.
    #[error("attendance record conflict for employee_id={employee_id} on {date}")]
    DuplicateRecordConflict {
        employee_id: u64,
        date: NaiveDate,
    },

    #[error("invalid date range: {start} > {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl EngineError {
    /// Bad-input errors are the caller's to fix; everything else is a 500.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidPunchOrder { .. } | EngineError::InvalidDateRange { .. }
        )
    }
}
