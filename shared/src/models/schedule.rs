//! Day schedule grid models
//!
//! Produced by `crab-schedule` and rendered by the backoffice schedule page
//! as a color-coded table × time-slot grid.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A fixed-width time slot within the displayed window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// 0-based, chronological
    pub index: usize,
    /// Unix millis
    pub start: i64,
    /// Unix millis, equal to the next slot's start
    pub end: i64,
    /// `HH:MM` wall clock of `start` in the business zone
    pub label: String,
}

/// Per-table slot occupancy for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOccupancy {
    pub table_id: i64,
    pub label: String,
    pub occupied_slot_indices: BTreeSet<usize>,
    pub status_by_slot_index: BTreeMap<usize, String>,
}

impl TableOccupancy {
    pub fn new(table_id: i64, label: impl Into<String>) -> Self {
        Self {
            table_id,
            label: label.into(),
            occupied_slot_indices: BTreeSet::new(),
            status_by_slot_index: BTreeMap::new(),
        }
    }

    /// Occupy a slot, overwriting any status already recorded for it
    pub fn mark(&mut self, slot_index: usize, status: &str) {
        self.occupied_slot_indices.insert(slot_index);
        self.status_by_slot_index
            .insert(slot_index, status.to_string());
    }

    pub fn is_occupied(&self, slot_index: usize) -> bool {
        self.occupied_slot_indices.contains(&slot_index)
    }

    pub fn status_at(&self, slot_index: usize) -> Option<&str> {
        self.status_by_slot_index.get(&slot_index).map(String::as_str)
    }
}

/// Result of the slot grid builder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlots {
    pub slots: Vec<Slot>,
    /// One entry per referenced table, in first-encounter order
    pub tables: Vec<TableOccupancy>,
}

impl DaySlots {
    pub fn table(&self, table_id: i64) -> Option<&TableOccupancy> {
        self.tables.iter().find(|t| t.table_id == table_id)
    }
}

/// One row of the day board (a known table or a reservation-only table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRow {
    pub table_id: i64,
    pub label: String,
    /// `false` when the table only appears because a reservation references it
    pub known: bool,
    pub status_by_slot_index: BTreeMap<usize, String>,
}

/// Full day schedule returned to the schedule page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBoard {
    /// `YYYY-MM-DD`
    pub date: String,
    /// IANA zone name the board was computed in
    pub timezone: String,
    pub step_minutes: u32,
    /// Window as configured (`HH:MM`)
    pub configured_open: String,
    pub configured_close: String,
    /// Window actually displayed, widened to fit the day's reservations
    pub open: String,
    pub close: String,
    pub expanded: bool,
    pub slots: Vec<Slot>,
    pub rows: Vec<BoardRow>,
    /// Reservations on this day with no table assigned
    pub unassigned: Vec<i64>,
}
