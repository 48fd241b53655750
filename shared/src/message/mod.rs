//! 预订实时事件
//!
//! edge-server 在预订变更后广播这些事件；订阅方（刷新任务、前端推送）
//! 据此决定需要重建哪些日期的排班表。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Reservation, status};

/// Reservation lifecycle event kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationEventKind {
    Created,
    Updated,
    Confirmed,
    Expired,
    Canceled,
}

impl ReservationEventKind {
    /// Pick the event kind a status change should publish
    pub fn for_status(new_status: &str) -> Self {
        match new_status {
            status::CONFIRMED => Self::Confirmed,
            status::EXPIRED => Self::Expired,
            status::CANCELED => Self::Canceled,
            _ => Self::Updated,
        }
    }
}

impl fmt::Display for ReservationEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "reservation_created"),
            Self::Updated => write!(f, "reservation_updated"),
            Self::Confirmed => write!(f, "reservation_confirmed"),
            Self::Expired => write!(f, "reservation_expired"),
            Self::Canceled => write!(f, "reservation_canceled"),
        }
    }
}

/// Reservation change notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationEvent {
    pub kind: ReservationEventKind,
    /// State after the change
    pub reservation: Reservation,
    /// State before the change, for edits that can move a reservation to another day
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<Reservation>,
}

impl ReservationEvent {
    pub fn new(kind: ReservationEventKind, reservation: Reservation) -> Self {
        Self {
            kind,
            reservation,
            previous: None,
        }
    }

    pub fn with_previous(mut self, previous: Reservation) -> Self {
        self.previous = Some(previous);
        self
    }

    /// Every `[start, end)` interval this event touched (Unix millis)
    pub fn touched_intervals(&self) -> Vec<(i64, i64)> {
        std::iter::once(&self.reservation)
            .chain(self.previous.as_ref())
            .map(|r| (r.start_at, r.effective_end()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_for_status() {
        assert_eq!(
            ReservationEventKind::for_status(status::CONFIRMED),
            ReservationEventKind::Confirmed
        );
        assert_eq!(
            ReservationEventKind::for_status(status::CANCELED),
            ReservationEventKind::Canceled
        );
        assert_eq!(
            ReservationEventKind::for_status(status::EXPIRED),
            ReservationEventKind::Expired
        );
        assert_eq!(
            ReservationEventKind::for_status("WALK_IN"),
            ReservationEventKind::Updated
        );
    }

    #[test]
    fn test_touched_intervals_include_previous() {
        let before = Reservation::new(1, Some(2), 0, Some(10), status::PENDING);
        let after = Reservation::new(1, Some(2), 100, None, status::PENDING);
        let event = ReservationEvent::new(ReservationEventKind::Updated, after)
            .with_previous(before);

        assert_eq!(
            event.touched_intervals(),
            vec![(100, 100 + 30 * 60_000), (0, 10)]
        );
    }

    #[test]
    fn test_kind_serialize() {
        let json = serde_json::to_string(&ReservationEventKind::Canceled).unwrap();
        assert_eq!(json, "\"canceled\"");
        assert_eq!(
            ReservationEventKind::Created.to_string(),
            "reservation_created"
        );
    }
}
