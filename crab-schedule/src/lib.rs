//! # crab-schedule
//!
//! Reservation day-schedule core - pure, synchronous computations only.
//!
//! ## Scope
//!
//! This crate answers WHAT the schedule board shows:
//! - Slot grid: fixed-width time slots and per-table occupancy
//! - Window expansion: widen the displayed hours to fit the day's bookings
//! - Time-edit validation: ordered `HH:MM` rules before a reservation moves
//! - Board merge: known tables + occupancy + unassigned reservations
//!
//! Fetching reservations, caching boards and pushing updates stay in
//! edge-server.
//!
//! ## Example
//!
//! ```
//! use crab_schedule::build_day_slots;
//! use shared::models::Reservation;
//!
//! // 09:45 - 10:15 on 2024-01-15 in Asia/Bangkok
//! let start = 1_705_286_700_000;
//! let end = start + 30 * 60_000;
//! let reservations = [Reservation::new(1, Some(5), start, Some(end), "CONFIRMED")];
//!
//! let grid = build_day_slots(&reservations, "2024-01-15", "09:00", "11:00", 30)?;
//! assert_eq!(grid.slots.len(), 4);
//!
//! let occupied: Vec<usize> = grid.tables[0].occupied_slot_indices.iter().copied().collect();
//! assert_eq!(occupied, vec![1, 2]);
//! # Ok::<(), crab_schedule::ScheduleError>(())
//! ```

mod board;
mod edit;
mod error;
mod expand;
mod slots;
mod time;
mod window;
mod zone;

// Re-exports
pub use board::{build_day_board, merge_board};
pub use edit::{TimeEdit, TimeEditError, validate_time_edit};
pub use error::{ScheduleError, ScheduleResult};
pub use expand::{Expansion, expand_window};
pub use slots::{OverlapPolicy, SlotGridBuilder, build_day_slots};
pub use time::{MINUTES_PER_DAY, format_minutes, parse_date, parse_hhmm, parse_time};
pub use window::{
    DEFAULT_CLOSE_TIME, DEFAULT_OPEN_TIME, DEFAULT_STEP_MINUTES, HoursWindow, check_step,
};
pub use zone::{DEFAULT_ZONE, ScheduleZone};
