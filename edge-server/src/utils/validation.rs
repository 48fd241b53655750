//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crab_schedule::ScheduleZone;
use shared::models::{DEFAULT_RESERVATION_MINUTES, MAX_RESERVATION_MINUTES};
use shared::{AppError, ErrorCode};

const MILLIS_PER_MINUTE: i64 = 60_000;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: table, guest
pub const MAX_NAME_LEN: usize = 200;

/// Reservation notes
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone, status labels
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional number, if present, is positive.
pub fn validate_optional_positive(value: Option<i32>, field: &str) -> Result<(), AppError> {
    if let Some(v) = value
        && v <= 0
    {
        return Err(
            AppError::with_message(ErrorCode::ValueOutOfRange, format!("{field} must be positive"))
                .with_detail("field", field),
        );
    }
    Ok(())
}

/// Validate reservation times before they reach the store
///
/// Both instants must be representable as local times in `zone`, the end must
/// be after the start, and the stay may not exceed
/// [`MAX_RESERVATION_MINUTES`]. A missing end uses the default length.
pub fn validate_reservation_times(
    start_at: i64,
    end_at: Option<i64>,
    zone: &ScheduleZone,
) -> Result<(), AppError> {
    for (field, value) in [("start_at", Some(start_at)), ("end_at", end_at)] {
        if let Some(millis) = value
            && zone.local(millis).is_none()
        {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("{field} is not a representable time"),
            )
            .with_detail("field", field)
            .with_detail("value", millis));
        }
    }

    let end = end_at.unwrap_or_else(|| {
        start_at.saturating_add(DEFAULT_RESERVATION_MINUTES * MILLIS_PER_MINUTE)
    });
    if end <= start_at {
        return Err(AppError::new(ErrorCode::ReservationEndBeforeStart));
    }
    if zone.local(end).is_none() {
        return Err(
            AppError::with_message(ErrorCode::ValueOutOfRange, "end_at is not a representable time")
                .with_detail("field", "end_at"),
        );
    }
    if end - start_at > MAX_RESERVATION_MINUTES * MILLIS_PER_MINUTE {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("reservation may not last longer than {MAX_RESERVATION_MINUTES} minutes"),
        )
        .with_detail("field", "end_at"));
    }
    Ok(())
}
