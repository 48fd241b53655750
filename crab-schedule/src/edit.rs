//! Reservation time-edit validation
//!
//! Rules are checked in order and the first failure is reported:
//!
//! | # | Rule | Error |
//! |---|------|-------|
//! | 1 | start and end are strict `HH:MM` | [`TimeEditError::InvalidFormat`] |
//! | 2 | start ≥ opening time | [`TimeEditError::StartBeforeOpen`] |
//! | 3 | end ≤ closing time | [`TimeEditError::EndAfterClose`] |
//! | 4 | end > start | [`TimeEditError::EndNotAfterStart`] |
//!
//! Validation happens before anything is written, so an edit is applied
//! whole or not at all.

use chrono::NaiveDate;
use shared::{AppError, ErrorCode};
use thiserror::Error;

use crate::time::{format_minutes, parse_hhmm};
use crate::window::HoursWindow;
use crate::zone::ScheduleZone;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeEditError {
    #[error("{field} time must be in HH:MM format (got '{value}')")]
    InvalidFormat { field: &'static str, value: String },

    #[error("Start time must be at or after opening time {open}")]
    StartBeforeOpen { open: String },

    #[error("End time must be at or before closing time {close}")]
    EndAfterClose { close: String },

    #[error("End time must be after start time")]
    EndNotAfterStart,
}

impl From<TimeEditError> for AppError {
    fn from(err: TimeEditError) -> Self {
        let code = match &err {
            TimeEditError::InvalidFormat { .. } => ErrorCode::ReservationTimeInvalid,
            TimeEditError::StartBeforeOpen { .. } => ErrorCode::ReservationStartsBeforeOpen,
            TimeEditError::EndAfterClose { .. } => ErrorCode::ReservationEndsAfterClose,
            TimeEditError::EndNotAfterStart => ErrorCode::ReservationEndBeforeStart,
        };
        let app = AppError::with_message(code, err.to_string());
        match err {
            TimeEditError::InvalidFormat { field, value } => {
                app.with_detail("field", field).with_detail("value", value)
            }
            _ => app,
        }
    }
}

/// A validated start/end pair in minutes since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeEdit {
    pub start_minute: u32,
    pub end_minute: u32,
}

impl TimeEdit {
    /// Absolute `(start, end)` Unix millis on `date` in `zone`
    pub fn resolve(&self, date: NaiveDate, zone: &ScheduleZone) -> (i64, i64) {
        (
            zone.instant(date, self.start_minute),
            zone.instant(date, self.end_minute),
        )
    }

    pub fn start_label(&self) -> String {
        format_minutes(self.start_minute)
    }

    pub fn end_label(&self) -> String {
        format_minutes(self.end_minute)
    }
}

/// Validate an edited start/end against the configured window
pub fn validate_time_edit(
    start: &str,
    end: &str,
    window: &HoursWindow,
) -> Result<TimeEdit, TimeEditError> {
    let start_minute = parse_hhmm(start).ok_or_else(|| TimeEditError::InvalidFormat {
        field: "start",
        value: start.to_string(),
    })?;
    let end_minute = parse_hhmm(end).ok_or_else(|| TimeEditError::InvalidFormat {
        field: "end",
        value: end.to_string(),
    })?;

    if start_minute < window.open() {
        return Err(TimeEditError::StartBeforeOpen {
            open: window.open_label(),
        });
    }
    if end_minute > window.close() {
        return Err(TimeEditError::EndAfterClose {
            close: window.close_label(),
        });
    }
    if end_minute <= start_minute {
        return Err(TimeEditError::EndNotAfterStart);
    }

    Ok(TimeEdit {
        start_minute,
        end_minute,
    })
}
