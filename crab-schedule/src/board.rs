//! Day board assembly
//!
//! The grid builder only reports tables that have reservations in range.
//! The board adds every known table (empty rows included), widens the window
//! when asked to, and lists the day's unassigned reservations.

use std::collections::HashSet;

use chrono::NaiveDate;
use shared::models::{BoardRow, DayBoard, DiningTable, Reservation, TableOccupancy};

use crate::expand::{Expansion, expand_window};
use crate::slots::SlotGridBuilder;

/// Merge known tables with grid occupancy
///
/// Known tables keep their given order and name; tables that only appear in
/// the occupancy are appended in occupancy order.
pub fn merge_board(known_tables: &[DiningTable], occupancy: &[TableOccupancy]) -> Vec<BoardRow> {
    let mut rows: Vec<BoardRow> = known_tables
        .iter()
        .map(|table| BoardRow {
            table_id: table.id,
            label: table.name.clone(),
            known: true,
            status_by_slot_index: occupancy
                .iter()
                .find(|o| o.table_id == table.id)
                .map(|o| o.status_by_slot_index.clone())
                .unwrap_or_default(),
        })
        .collect();

    let known: HashSet<i64> = known_tables.iter().map(|t| t.id).collect();
    rows.extend(
        occupancy
            .iter()
            .filter(|o| !known.contains(&o.table_id))
            .map(|o| BoardRow {
                table_id: o.table_id,
                label: o.label.clone(),
                known: false,
                status_by_slot_index: o.status_by_slot_index.clone(),
            }),
    );
    rows
}

/// Build the full board for `date`
///
/// `reservations` may include other days; only those touching `date` count.
/// Inactive tables are left out unless booked that day; a booked one keeps
/// its stored name.
pub fn build_day_board(
    grid: &SlotGridBuilder,
    date: NaiveDate,
    reservations: &[Reservation],
    known_tables: &[DiningTable],
    expand: bool,
) -> DayBoard {
    let zone = grid.zone();
    let (midnight, next_midnight) = zone.day_bounds(date);
    let todays: Vec<Reservation> = reservations
        .iter()
        .filter(|r| r.start_at < next_midnight && r.effective_end() > midnight)
        .cloned()
        .collect();

    let expansion = if expand {
        expand_window(grid.window(), date, &todays, zone, grid.step_minutes())
    } else {
        Expansion::unchanged(grid.window())
    };

    let day_slots = grid
        .clone()
        .with_window(expansion.window)
        .build(date, &todays);

    let booked: HashSet<i64> = day_slots.tables.iter().map(|o| o.table_id).collect();
    let shown: Vec<DiningTable> = known_tables
        .iter()
        .filter(|t| t.is_active || booked.contains(&t.id))
        .cloned()
        .collect();

    let unassigned = todays
        .iter()
        .filter(|r| r.table_id.is_none())
        .map(|r| r.id)
        .collect();

    DayBoard {
        date: date.format("%Y-%m-%d").to_string(),
        timezone: zone.name().to_string(),
        step_minutes: grid.step_minutes(),
        configured_open: expansion.configured.open_label(),
        configured_close: expansion.configured.close_label(),
        open: expansion.window.open_label(),
        close: expansion.window.close_label(),
        expanded: expansion.expanded(),
        rows: merge_board(&shown, &day_slots.tables),
        slots: day_slots.slots,
        unassigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{parse_date, parse_hhmm};
    use crate::window::HoursWindow;
    use crate::zone::ScheduleZone;
    use shared::models::status;

    fn table(id: i64, name: &str, is_active: bool) -> DiningTable {
        DiningTable {
            id,
            name: name.to_string(),
            zone_id: 1,
            capacity: 4,
            is_active,
        }
    }

    fn date() -> NaiveDate {
        parse_date("2024-01-15").unwrap()
    }

    fn at(hhmm: &str) -> i64 {
        ScheduleZone::default().instant(date(), parse_hhmm(hhmm).unwrap())
    }

    fn grid() -> SlotGridBuilder {
        SlotGridBuilder::default().with_window(HoursWindow::parse("09:00", "11:00").unwrap())
    }

    #[test]
    fn test_merge_keeps_known_order_and_appends_unknown() {
        let mut occ = TableOccupancy::new(9, "#9");
        occ.mark(0, status::CONFIRMED);
        let mut known_occ = TableOccupancy::new(2, "ignored");
        known_occ.mark(1, status::SEATED);

        let rows = merge_board(
            &[table(1, "T1", true), table(2, "T2", true)],
            &[occ, known_occ],
        );

        let ids: Vec<i64> = rows.iter().map(|r| r.table_id).collect();
        assert_eq!(ids, vec![1, 2, 9]);
        assert!(rows[0].status_by_slot_index.is_empty());
        assert_eq!(rows[1].label, "T2");
        assert_eq!(rows[1].status_by_slot_index.get(&1).map(String::as_str), Some(status::SEATED));
        assert!(!rows[2].known);
        assert_eq!(rows[2].label, "#9");
    }

    #[test]
    fn test_board_expands_and_lists_unassigned() {
        let reservations = [
            Reservation::new(1, Some(1), at("08:10"), Some(at("09:30")), status::CONFIRMED),
            Reservation::new(2, None, at("10:00"), None, status::PENDING),
        ];
        let board = build_day_board(&grid(), date(), &reservations, &[table(1, "T1", true)], true);

        assert!(board.expanded);
        assert_eq!(board.configured_open, "09:00");
        assert_eq!(board.open, "08:00");
        assert_eq!(board.close, "11:00");
        assert_eq!(board.slots.len(), 6);
        assert_eq!(board.slots[0].label, "08:00");
        assert_eq!(board.unassigned, vec![2]);

        let row = &board.rows[0];
        let occupied: Vec<usize> = row.status_by_slot_index.keys().copied().collect();
        assert_eq!(occupied, vec![0, 1, 2]);
    }

    #[test]
    fn test_board_without_expansion_clips() {
        let reservations = [Reservation::new(
            1,
            Some(1),
            at("08:10"),
            Some(at("09:30")),
            status::CONFIRMED,
        )];
        let board = build_day_board(&grid(), date(), &reservations, &[], false);

        assert!(!board.expanded);
        assert_eq!(board.open, "09:00");
        assert_eq!(board.slots.len(), 4);
        assert_eq!(board.rows.len(), 1);
        assert!(!board.rows[0].known);
        assert_eq!(board.rows[0].status_by_slot_index.len(), 1);
    }

    #[test]
    fn test_inactive_tables_hidden_unless_booked() {
        let reservations = [Reservation::new(
            1,
            Some(3),
            at("09:00"),
            None,
            status::CONFIRMED,
        )];
        let board = build_day_board(
            &grid(),
            date(),
            &reservations,
            &[table(2, "Closed", false), table(3, "Old", false)],
            true,
        );
        let ids: Vec<i64> = board.rows.iter().map(|r| r.table_id).collect();
        assert_eq!(ids, vec![3]);
        assert!(board.rows[0].known);
        assert_eq!(board.rows[0].label, "Old");
        assert_eq!(board.timezone, "Asia/Bangkok");
        assert_eq!(board.date, "2024-01-15");
    }

    #[test]
    fn test_other_days_are_ignored() {
        let next_day = parse_date("2024-01-16").unwrap();
        let zone = ScheduleZone::default();
        let reservations = [Reservation::new(
            1,
            None,
            zone.instant(next_day, 600),
            None,
            status::CONFIRMED,
        )];
        let board = build_day_board(&grid(), date(), &reservations, &[], true);
        assert!(board.unassigned.is_empty());
        assert!(!board.expanded);
    }
}
