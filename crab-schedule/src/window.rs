//! Displayed opening-hours window

use serde::{Deserialize, Serialize};

use crate::error::{ScheduleError, ScheduleResult};
use crate::time::{MINUTES_PER_DAY, format_minutes, parse_time};

pub const DEFAULT_OPEN_TIME: &str = "09:00";
pub const DEFAULT_CLOSE_TIME: &str = "22:00";
pub const DEFAULT_STEP_MINUTES: u32 = 30;

/// `[open, close)` in minutes since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoursWindow {
    open: u32,
    close: u32,
}

impl HoursWindow {
    /// Both bounds are clamped to `24:00`
    pub fn new(open: u32, close: u32) -> Self {
        Self {
            open: open.min(MINUTES_PER_DAY),
            close: close.min(MINUTES_PER_DAY),
        }
    }

    /// Parse strict `HH:MM` bounds
    ///
    /// `open >= close` is accepted and yields an empty window.
    pub fn parse(open: &str, close: &str) -> ScheduleResult<Self> {
        Ok(Self::new(parse_time(open)?, parse_time(close)?))
    }

    pub fn open(&self) -> u32 {
        self.open
    }

    pub fn close(&self) -> u32 {
        self.close
    }

    pub fn is_empty(&self) -> bool {
        self.open >= self.close
    }

    pub fn open_label(&self) -> String {
        format_minutes(self.open)
    }

    pub fn close_label(&self) -> String {
        format_minutes(self.close)
    }

    /// Smallest window covering both
    pub fn union(&self, other: &HoursWindow) -> HoursWindow {
        HoursWindow::new(self.open.min(other.open), self.close.max(other.close))
    }
}

impl Default for HoursWindow {
    fn default() -> Self {
        // 09:00 - 22:00
        Self::new(9 * 60, 22 * 60)
    }
}

/// Validate a slot step in minutes
pub fn check_step(step_minutes: u32) -> ScheduleResult<u32> {
    if step_minutes == 0 || step_minutes > MINUTES_PER_DAY {
        return Err(ScheduleError::InvalidStep(step_minutes));
    }
    Ok(step_minutes)
}
