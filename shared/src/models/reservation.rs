//! Reservation Model

use serde::{Deserialize, Serialize};

/// Length assumed for a reservation that carries no end time
pub const DEFAULT_RESERVATION_MINUTES: i64 = 30;

/// Longest stay the backoffice accepts for one reservation
pub const MAX_RESERVATION_MINUTES: i64 = 24 * 60;

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Well-known reservation statuses
///
/// Status is a free-form label on the wire; these are the values the
/// backoffice itself writes and reacts to.
pub mod status {
    pub const PENDING: &str = "PENDING";
    pub const CONFIRMED: &str = "CONFIRMED";
    pub const SEATED: &str = "SEATED";
    pub const COMPLETED: &str = "COMPLETED";
    pub const CANCELED: &str = "CANCELED";
    pub const EXPIRED: &str = "EXPIRED";
}

/// Reservation entity (预订)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    /// `None` = not yet assigned to a table
    pub table_id: Option<i64>,
    /// Display name of the table, when the source knows it
    #[serde(default)]
    pub table_label: Option<String>,
    /// Start time (Unix millis)
    pub start_at: i64,
    /// End time (Unix millis)
    #[serde(default)]
    pub end_at: Option<i64>,
    pub status: String,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub party_size: Option<i32>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
}

impl Reservation {
    /// Minimal reservation with no guest details
    pub fn new(
        id: i64,
        table_id: Option<i64>,
        start_at: i64,
        end_at: Option<i64>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id,
            table_id,
            table_label: None,
            start_at,
            end_at,
            status: status.into(),
            guest_name: None,
            party_size: None,
            phone: None,
            note: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn with_table_label(mut self, label: impl Into<String>) -> Self {
        self.table_label = Some(label.into());
        self
    }

    /// End time, or start + [`DEFAULT_RESERVATION_MINUTES`] when absent
    ///
    /// Saturates at `i64::MAX` instead of overflowing.
    pub fn effective_end(&self) -> i64 {
        self.end_at.unwrap_or_else(|| {
            self.start_at
                .saturating_add(DEFAULT_RESERVATION_MINUTES * MILLIS_PER_MINUTE)
        })
    }

    /// Table label, falling back to `#<table_id>`
    pub fn display_table_label(&self) -> Option<String> {
        let table_id = self.table_id?;
        Some(
            self.table_label
                .clone()
                .unwrap_or_else(|| format!("#{}", table_id)),
        )
    }
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub table_id: Option<i64>,
    pub start_at: i64,
    pub end_at: Option<i64>,
    /// Defaults to [`status::PENDING`]
    pub status: Option<String>,
    pub guest_name: Option<String>,
    pub party_size: Option<i32>,
    pub phone: Option<String>,
    pub note: Option<String>,
}

/// Edit reservation start/end as wall-clock `HH:MM` on its own day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationTimeUpdate {
    pub start: String,
    pub end: String,
}

/// Change reservation status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationStatusUpdate {
    pub status: String,
}
