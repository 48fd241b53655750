//! Day slot grid builder
//!
//! Partitions the displayed window of one day into fixed-width slots and
//! works out, per table, which slots are occupied and by which status.
//!
//! ```text
//!            09:00  09:30  10:00  10:30
//! table 5    [    ][ ## ][ ## ][    ]     reservation 09:45 - 10:15
//! ```
//!
//! Reservations are clipped to the window before use; a reservation that
//! only partly overlaps the window still marks its in-window slots.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::models::{DaySlots, Reservation, Slot, TableOccupancy};

use crate::error::ScheduleResult;
use crate::time::parse_date;
use crate::window::{DEFAULT_STEP_MINUTES, HoursWindow, check_step};
use crate::zone::ScheduleZone;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Which reservation's status a slot shows when several on the same table
/// cover it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Last reservation in input order wins
    #[default]
    InputOrder,
    /// Reservation with the latest start wins (ties fall back to input order)
    LatestStart,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input_order" => Ok(Self::InputOrder),
            "latest_start" => Ok(Self::LatestStart),
            other => Err(format!("unknown overlap policy: {}", other)),
        }
    }
}

/// Slot grid builder for one business zone
#[derive(Debug, Clone)]
pub struct SlotGridBuilder {
    zone: ScheduleZone,
    window: HoursWindow,
    step_minutes: u32,
    policy: OverlapPolicy,
}

impl SlotGridBuilder {
    /// 09:00 - 22:00 window, 30 minute slots, input-order overlap policy
    pub fn new(zone: ScheduleZone) -> Self {
        Self {
            zone,
            window: HoursWindow::default(),
            step_minutes: DEFAULT_STEP_MINUTES,
            policy: OverlapPolicy::default(),
        }
    }

    pub fn with_window(mut self, window: HoursWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_step(mut self, step_minutes: u32) -> ScheduleResult<Self> {
        self.step_minutes = check_step(step_minutes)?;
        Ok(self)
    }

    pub fn with_policy(mut self, policy: OverlapPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn zone(&self) -> &ScheduleZone {
        &self.zone
    }

    pub fn window(&self) -> HoursWindow {
        self.window
    }

    pub fn step_minutes(&self) -> u32 {
        self.step_minutes
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Build the grid for `date`
    ///
    /// Pure: identical inputs always produce an identical result.
    pub fn build(&self, date: NaiveDate, reservations: &[Reservation]) -> DaySlots {
        let day_start = self.zone.instant(date, self.window.open());
        let day_end = self.zone.instant(date, self.window.close());
        let slots = self.generate_slots(day_start, day_end);

        let mut tables: Vec<TableOccupancy> = Vec::new();
        let mut position: HashMap<i64, usize> = HashMap::new();

        for reservation in self.processing_order(reservations) {
            let Some(table_id) = reservation.table_id else {
                continue;
            };

            let clipped_start = reservation.start_at.max(day_start);
            let clipped_end = reservation.effective_end().min(day_end);
            if clipped_start >= clipped_end {
                continue;
            }

            let pos = *position.entry(table_id).or_insert_with(|| {
                let label = reservation
                    .table_label
                    .clone()
                    .unwrap_or_else(|| format!("#{}", table_id));
                tables.push(TableOccupancy::new(table_id, label));
                tables.len() - 1
            });
            let table = &mut tables[pos];

            // 标签以首次出现为准
            if let Some(label) = &reservation.table_label
                && *label != table.label
            {
                tracing::debug!(
                    table_id,
                    kept = %table.label,
                    ignored = %label,
                    "Conflicting table label in one batch, keeping the first"
                );
            }

            for slot in slots
                .iter()
                .filter(|s| s.start < clipped_end && s.end > clipped_start)
            {
                table.mark(slot.index, &reservation.status);
            }
        }

        DaySlots { slots, tables }
    }

    /// Contiguous full-width slots; a trailing partial slot is not generated
    fn generate_slots(&self, day_start: i64, day_end: i64) -> Vec<Slot> {
        let step = i64::from(self.step_minutes) * MILLIS_PER_MINUTE;
        let mut slots = Vec::new();
        let mut start = day_start;
        while start + step <= day_end {
            slots.push(Slot {
                index: slots.len(),
                start,
                end: start + step,
                label: self.zone.label(start),
            });
            start += step;
        }
        slots
    }

    fn processing_order<'a>(&self, reservations: &'a [Reservation]) -> Vec<&'a Reservation> {
        let mut ordered: Vec<&Reservation> = reservations.iter().collect();
        if self.policy == OverlapPolicy::LatestStart {
            ordered.sort_by_key(|r| r.start_at);
        }
        ordered
    }
}

impl Default for SlotGridBuilder {
    fn default() -> Self {
        Self::new(ScheduleZone::default())
    }
}

/// Build a day grid in the default zone from string inputs
///
/// Fails fast on a malformed date, malformed `HH:MM` bounds or a zero step.
pub fn build_day_slots(
    reservations: &[Reservation],
    date: &str,
    open_time: &str,
    close_time: &str,
    step_minutes: u32,
) -> ScheduleResult<DaySlots> {
    let date = parse_date(date)?;
    let builder = SlotGridBuilder::default()
        .with_window(HoursWindow::parse(open_time, close_time)?)
        .with_step(step_minutes)?;
    Ok(builder.build(date, reservations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScheduleError;
    use crate::time::parse_hhmm;
    use shared::models::status;
    use std::collections::BTreeSet;

    const DATE: &str = "2024-01-15";

    fn at(hhmm: &str) -> i64 {
        let date = parse_date(DATE).unwrap();
        ScheduleZone::default().instant(date, parse_hhmm(hhmm).unwrap())
    }

    fn booking(id: i64, table: Option<i64>, from: &str, to: &str, status: &str) -> Reservation {
        Reservation::new(id, table, at(from), Some(at(to)), status)
    }

    fn occupied(grid: &DaySlots, table_id: i64) -> Vec<usize> {
        grid.table(table_id)
            .map(|t| t.occupied_slot_indices.iter().copied().collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_four_slots_for_two_hours() {
        let grid = build_day_slots(&[], DATE, "09:00", "11:00", 30).unwrap();

        let labels: Vec<&str> = grid.slots.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["09:00", "09:30", "10:00", "10:30"]);
        assert!(grid.tables.is_empty());
    }

    #[test]
    fn test_slots_are_contiguous_and_full_width() {
        let grid = build_day_slots(&[], DATE, "09:00", "22:00", 15).unwrap();
        assert_eq!(grid.slots.len(), 13 * 4);

        for (i, slot) in grid.slots.iter().enumerate() {
            assert_eq!(slot.index, i);
            assert_eq!(slot.end - slot.start, 15 * 60_000);
        }
        for pair in grid.slots.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(grid.slots[0].start, at("09:00"));
    }

    #[test]
    fn test_partial_trailing_slot_is_dropped() {
        let grid = build_day_slots(&[], DATE, "09:00", "10:45", 30).unwrap();
        assert_eq!(grid.slots.len(), 3);
        assert_eq!(grid.slots.last().unwrap().end, at("10:30"));
    }

    #[test]
    fn test_reservation_marks_overlapping_slots() {
        let reservations = [booking(1, Some(5), "09:45", "10:15", status::CONFIRMED)];
        let grid = build_day_slots(&reservations, DATE, "09:00", "11:00", 30).unwrap();

        assert_eq!(occupied(&grid, 5), vec![1, 2]);
        let table = grid.table(5).unwrap();
        assert_eq!(table.label, "#5");
        assert_eq!(table.status_at(1), Some(status::CONFIRMED));
        assert_eq!(table.status_at(2), Some(status::CONFIRMED));
    }

    #[test]
    fn test_half_open_boundaries() {
        let reservations = [booking(1, Some(5), "09:00", "09:30", status::CONFIRMED)];
        let grid = build_day_slots(&reservations, DATE, "09:00", "11:00", 30).unwrap();
        assert_eq!(occupied(&grid, 5), vec![0]);
    }

    #[test]
    fn test_reservation_starting_before_window_is_clipped() {
        let reservations = [booking(1, Some(5), "08:00", "09:15", status::CONFIRMED)];
        let grid = build_day_slots(&reservations, DATE, "09:00", "11:00", 30).unwrap();
        assert_eq!(occupied(&grid, 5), vec![0]);
    }

    #[test]
    fn test_reservation_ending_after_window_is_clipped() {
        let reservations = [booking(1, Some(5), "10:20", "13:00", status::SEATED)];
        let grid = build_day_slots(&reservations, DATE, "09:00", "11:00", 30).unwrap();
        assert_eq!(occupied(&grid, 5), vec![2, 3]);
    }

    #[test]
    fn test_missing_end_defaults_to_thirty_minutes() {
        let reservations = [Reservation::new(1, Some(5), at("10:00"), None, status::PENDING)];
        let grid = build_day_slots(&reservations, DATE, "09:00", "11:00", 30).unwrap();
        assert_eq!(occupied(&grid, 5), vec![2]);
    }

    #[test]
    fn test_unassigned_reservation_has_no_row() {
        let reservations = [booking(1, None, "09:00", "10:00", status::CONFIRMED)];
        let grid = build_day_slots(&reservations, DATE, "09:00", "11:00", 30).unwrap();
        assert!(grid.tables.is_empty());
    }

    #[test]
    fn test_reservation_outside_window_has_no_row() {
        let reservations = [
            booking(1, Some(5), "07:00", "08:30", status::CONFIRMED),
            booking(2, Some(6), "11:00", "12:00", status::CONFIRMED),
        ];
        let grid = build_day_slots(&reservations, DATE, "09:00", "11:00", 30).unwrap();
        assert!(grid.tables.is_empty());
    }

    #[test]
    fn test_last_write_wins_in_input_order() {
        let reservations = [
            booking(1, Some(5), "09:30", "10:00", status::CONFIRMED),
            booking(2, Some(5), "09:15", "09:45", status::CANCELED),
        ];
        let grid = build_day_slots(&reservations, DATE, "09:00", "11:00", 30).unwrap();

        let table = grid.table(5).unwrap();
        assert_eq!(table.status_at(1), Some(status::CANCELED));
        assert_eq!(table.status_at(0), Some(status::CANCELED));
        assert_eq!(occupied(&grid, 5), vec![0, 1]);
    }

    #[test]
    fn test_latest_start_policy_ignores_input_order() {
        let reservations = [
            booking(1, Some(5), "09:40", "10:00", status::CANCELED),
            booking(2, Some(5), "09:30", "10:00", status::CONFIRMED),
        ];
        let date = parse_date(DATE).unwrap();
        let window = HoursWindow::parse("09:00", "11:00").unwrap();

        let input_order = SlotGridBuilder::default().with_window(window).build(date, &reservations);
        assert_eq!(input_order.table(5).unwrap().status_at(1), Some(status::CONFIRMED));

        let latest = SlotGridBuilder::default()
            .with_window(window)
            .with_policy(OverlapPolicy::LatestStart)
            .build(date, &reservations);
        assert_eq!(latest.table(5).unwrap().status_at(1), Some(status::CANCELED));
    }

    #[test]
    fn test_first_label_wins() {
        let reservations = [
            booking(1, Some(5), "09:00", "09:30", status::CONFIRMED).with_table_label("Patio 5"),
            booking(2, Some(5), "10:00", "10:30", status::CONFIRMED).with_table_label("Bar 5"),
        ];
        let grid = build_day_slots(&reservations, DATE, "09:00", "11:00", 30).unwrap();
        assert_eq!(grid.tables.len(), 1);
        assert_eq!(grid.table(5).unwrap().label, "Patio 5");
    }

    #[test]
    fn test_tables_keep_first_encounter_order() {
        let reservations = [
            booking(1, Some(9), "09:00", "09:30", status::CONFIRMED),
            booking(2, Some(3), "09:00", "09:30", status::CONFIRMED),
            booking(3, Some(9), "10:00", "10:30", status::CONFIRMED),
        ];
        let grid = build_day_slots(&reservations, DATE, "09:00", "11:00", 30).unwrap();
        let ids: Vec<i64> = grid.tables.iter().map(|t| t.table_id).collect();
        assert_eq!(ids, vec![9, 3]);
    }

    #[test]
    fn test_occupied_set_matches_status_keys() {
        let reservations = [
            booking(1, Some(5), "09:10", "10:50", status::CONFIRMED),
            booking(2, Some(5), "09:50", "10:10", status::SEATED),
        ];
        let grid = build_day_slots(&reservations, DATE, "09:00", "11:00", 30).unwrap();
        let table = grid.table(5).unwrap();
        let keys: BTreeSet<usize> = table.status_by_slot_index.keys().copied().collect();
        assert_eq!(keys, table.occupied_slot_indices);
    }

    #[test]
    fn test_clipped_into_dropped_partial_slot_keeps_empty_row() {
        let reservations = [booking(1, Some(5), "10:35", "10:40", status::CONFIRMED)];
        let grid = build_day_slots(&reservations, DATE, "09:00", "10:45", 30).unwrap();
        let table = grid.table(5).unwrap();
        assert!(table.occupied_slot_indices.is_empty());
    }

    #[test]
    fn test_inverted_window_yields_empty_grid() {
        let reservations = [booking(1, Some(5), "09:00", "23:00", status::CONFIRMED)];
        let grid = build_day_slots(&reservations, DATE, "22:00", "09:00", 30).unwrap();
        assert!(grid.slots.is_empty());
        assert!(grid.tables.is_empty());
    }

    #[test]
    fn test_identical_inputs_give_identical_grids() {
        let reservations = [
            booking(1, Some(5), "09:45", "10:15", status::CONFIRMED),
            booking(2, Some(7), "08:00", "21:00", status::PENDING),
        ];
        let a = build_day_slots(&reservations, DATE, "09:00", "22:00", 30).unwrap();
        let b = build_day_slots(&reservations, DATE, "09:00", "22:00", 30).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_malformed_inputs_fail_fast() {
        assert_eq!(
            build_day_slots(&[], "2024-13-01", "09:00", "22:00", 30),
            Err(ScheduleError::InvalidDate("2024-13-01".into()))
        );
        assert_eq!(
            build_day_slots(&[], DATE, "9am", "22:00", 30),
            Err(ScheduleError::InvalidTime("9am".into()))
        );
        assert_eq!(
            build_day_slots(&[], DATE, "09:00", "22:00", 0),
            Err(ScheduleError::InvalidStep(0))
        );
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("latest_start".parse::<OverlapPolicy>(), Ok(OverlapPolicy::LatestStart));
        assert_eq!("input_order".parse::<OverlapPolicy>(), Ok(OverlapPolicy::InputOrder));
        assert!("newest".parse::<OverlapPolicy>().is_err());
    }

    #[test]
    fn test_policy_wire_names_match_from_str() {
        let json = serde_json::to_string(&OverlapPolicy::LatestStart).unwrap();
        assert_eq!(json, "\"latest_start\"");
        let back: OverlapPolicy = serde_json::from_str("\"input_order\"").unwrap();
        assert_eq!(back, OverlapPolicy::InputOrder);
    }
}
