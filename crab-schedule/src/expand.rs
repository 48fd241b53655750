//! Window auto-expansion
//!
//! A reservation outside the configured hours would otherwise be invisible on
//! the board. Before building the grid the window is widened to cover every
//! reservation of the day. The earliest start is floored to a whole step
//! counted from midnight; the latest end is ceiled to a whole step counted
//! from the (possibly widened) open, so the last generated slot reaches it.

use chrono::NaiveDate;
use shared::models::Reservation;

use crate::time::MINUTES_PER_DAY;
use crate::window::HoursWindow;
use crate::zone::ScheduleZone;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Outcome of [`expand_window`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expansion {
    pub configured: HoursWindow,
    /// Window to display
    pub window: HoursWindow,
}

impl Expansion {
    pub fn unchanged(configured: HoursWindow) -> Self {
        Self {
            configured,
            window: configured,
        }
    }

    pub fn expanded(&self) -> bool {
        self.window != self.configured
    }
}

/// Widen `configured` so every reservation touching `date` is visible
///
/// Reservations are clamped to the calendar day first, so an overnight
/// booking can at most push the window to `00:00` / `24:00`.
pub fn expand_window(
    configured: HoursWindow,
    date: NaiveDate,
    reservations: &[Reservation],
    zone: &ScheduleZone,
    step_minutes: u32,
) -> Expansion {
    let (midnight, next_midnight) = zone.day_bounds(date);
    let step = step_minutes.max(1);

    let mut earliest: Option<i64> = None;
    let mut latest: Option<i64> = None;
    for reservation in reservations {
        let start = reservation.start_at.max(midnight);
        let end = reservation.effective_end().min(next_midnight);
        if start >= end {
            continue;
        }
        earliest = Some(earliest.map_or(start, |e| e.min(start)));
        latest = Some(latest.map_or(end, |l| l.max(end)));
    }

    let (Some(earliest), Some(latest)) = (earliest, latest) else {
        return Expansion::unchanged(configured);
    };

    let first_minute = minutes_floor(earliest - midnight);
    let last_minute = minutes_ceil(latest - midnight);

    let mut window = configured;
    if first_minute < configured.open() {
        let open = first_minute / step * step;
        window = HoursWindow::new(open, window.close());
    }
    if last_minute > configured.close() {
        window = close_on_slot_boundary(window.open(), last_minute, step);
    }

    if window != configured {
        tracing::debug!(
            %date,
            configured_open = %configured.open_label(),
            configured_close = %configured.close_label(),
            open = %window.open_label(),
            close = %window.close_label(),
            "Schedule window widened to fit reservations"
        );
    }

    Expansion { configured, window }
}

/// Window from `open` whose last full slot ends at or after `last_minute`
///
/// Slots run from `open`, so the close is `open + k * step`. When that would
/// pass `24:00` the open is pulled back until the slots end exactly at midnight.
fn close_on_slot_boundary(open: u32, last_minute: u32, step: u32) -> HoursWindow {
    let close = open + last_minute.saturating_sub(open).div_ceil(step) * step;
    if close <= MINUTES_PER_DAY {
        return HoursWindow::new(open, close);
    }
    let remainder = (MINUTES_PER_DAY - open) % step;
    let open = if remainder == 0 {
        open
    } else {
        open.saturating_sub(step - remainder)
    };
    HoursWindow::new(open, MINUTES_PER_DAY)
}

fn minutes_floor(offset_millis: i64) -> u32 {
    (offset_millis.max(0) / MILLIS_PER_MINUTE) as u32
}

fn minutes_ceil(offset_millis: i64) -> u32 {
    let minutes = (offset_millis.max(0) + MILLIS_PER_MINUTE - 1) / MILLIS_PER_MINUTE;
    (minutes as u32).min(MINUTES_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{parse_date, parse_hhmm};
    use shared::models::status;

    fn date() -> NaiveDate {
        parse_date("2024-01-15").unwrap()
    }

    fn at(hhmm: &str) -> i64 {
        ScheduleZone::default().instant(date(), parse_hhmm(hhmm).unwrap())
    }

    fn booking(from: &str, to: &str) -> Reservation {
        Reservation::new(1, Some(1), at(from), Some(at(to)), status::CONFIRMED)
    }

    fn configured() -> HoursWindow {
        HoursWindow::parse("09:00", "22:00").unwrap()
    }

    fn expand(reservations: &[Reservation]) -> Expansion {
        expand_window(configured(), date(), reservations, &ScheduleZone::default(), 30)
    }

    #[test]
    fn test_reservations_inside_window_keep_it() {
        let result = expand(&[booking("10:00", "12:00")]);
        assert!(!result.expanded());
        assert_eq!(result.window, configured());
    }

    #[test]
    fn test_no_reservations_keep_window() {
        assert_eq!(expand(&[]), Expansion::unchanged(configured()));
    }

    #[test]
    fn test_early_start_floors_to_step() {
        let result = expand(&[booking("08:10", "09:30")]);
        assert!(result.expanded());
        assert_eq!(result.window.open_label(), "08:00");
        assert_eq!(result.window.close_label(), "22:00");
    }

    #[test]
    fn test_late_end_ceils_to_step() {
        let result = expand(&[booking("21:00", "22:40")]);
        assert_eq!(result.window.open_label(), "09:00");
        assert_eq!(result.window.close_label(), "23:00");
    }

    #[test]
    fn test_overnight_booking_is_clamped_to_day() {
        let next_day = parse_date("2024-01-16").unwrap();
        let end = ScheduleZone::default().instant(next_day, 2 * 60);
        let reservation = Reservation::new(1, Some(1), at("23:15"), Some(end), status::SEATED);

        let result = expand(&[reservation]);
        assert_eq!(result.window.close(), MINUTES_PER_DAY);
        assert_eq!(result.window.close_label(), "24:00");
    }

    #[test]
    fn test_other_days_are_ignored() {
        let previous_day = parse_date("2024-01-14").unwrap();
        let zone = ScheduleZone::default();
        let reservation = Reservation::new(
            1,
            Some(1),
            zone.instant(previous_day, 6 * 60),
            Some(zone.instant(previous_day, 7 * 60)),
            status::CONFIRMED,
        );
        assert!(!expand(&[reservation]).expanded());
    }

    #[test]
    fn test_unassigned_reservations_also_widen() {
        let reservation = Reservation::new(1, None, at("07:45"), Some(at("08:15")), status::PENDING);
        assert_eq!(expand(&[reservation]).window.open_label(), "07:30");
    }

    #[test]
    fn test_close_follows_unaligned_open() {
        let configured = HoursWindow::parse("09:10", "22:00").unwrap();
        let zone = ScheduleZone::default();
        let late = booking("22:00", "22:50");
        let result = expand_window(configured, date(), std::slice::from_ref(&late), &zone, 30);
        assert_eq!(result.window.open_label(), "09:10");
        assert_eq!(result.window.close_label(), "23:10");

        let grid = crate::slots::SlotGridBuilder::new(zone)
            .with_window(result.window)
            .build(date(), std::slice::from_ref(&late));
        let last = grid.slots.last().unwrap();
        assert!(last.end >= late.effective_end());
        assert!(grid.tables[0].status_by_slot_index.contains_key(&last.index));
    }

    #[test]
    fn test_close_capped_at_midnight_realigns_open() {
        let configured = HoursWindow::parse("09:10", "22:00").unwrap();
        let result = expand_window(
            configured,
            date(),
            &[booking("23:45", "23:55")],
            &ScheduleZone::default(),
            30,
        );
        assert_eq!(result.window.close_label(), "24:00");
        assert_eq!(result.window.open_label(), "09:00");
        assert_eq!((result.window.close() - result.window.open()) % 30, 0);
    }

    #[test]
    fn test_expansion_on_both_sides() {
        let result = expand(&[booking("07:05", "08:00"), booking("22:00", "22:01")]);
        assert_eq!(result.window.open_label(), "07:00");
        assert_eq!(result.window.close_label(), "22:30");
    }
}
