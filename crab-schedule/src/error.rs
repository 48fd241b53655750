//! Error types for the schedule library

use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Schedule input errors
///
/// Raised before any grid is built, so a malformed request never degrades
/// into an empty board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Date is not `YYYY-MM-DD`
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Wall-clock time is not strict `HH:MM`
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// Slot step outside `1..=1440` minutes
    #[error("Invalid slot step: {0} minutes")]
    InvalidStep(u32),

    /// Unknown IANA time zone name
    #[error("Invalid time zone: {0}")]
    InvalidZone(String),
}

/// Result type for schedule operations
pub type ScheduleResult<T> = Result<T, ScheduleError>;

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        let code = match &err {
            ScheduleError::InvalidDate(_) => ErrorCode::ScheduleDateInvalid,
            ScheduleError::InvalidTime(_) => ErrorCode::ScheduleHoursInvalid,
            ScheduleError::InvalidStep(_) => ErrorCode::ScheduleStepInvalid,
            ScheduleError::InvalidZone(_) => ErrorCode::ConfigError,
        };
        AppError::with_message(code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_app_error() {
        let err: AppError = ScheduleError::InvalidDate("2024-02-30".into()).into();
        assert_eq!(err.code, ErrorCode::ScheduleDateInvalid);
        assert_eq!(err.message, "Invalid date: 2024-02-30");

        let err: AppError = ScheduleError::InvalidStep(0).into();
        assert_eq!(err.code, ErrorCode::ScheduleStepInvalid);
    }
}
