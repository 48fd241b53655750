//! Reservation Repository

use super::{RepoError, RepoResult};
use crate::db::{MemoryDb, now_millis};
use shared::models::{Reservation, ReservationCreate, status};

#[derive(Clone)]
pub struct ReservationRepository {
    db: MemoryDb,
}

impl ReservationRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }

    /// All reservations ordered by start time
    pub fn find_all(&self) -> Vec<Reservation> {
        let mut all: Vec<Reservation> = self
            .db
            .reservations
            .iter()
            .map(|e| e.value().clone())
            .collect();
        all.sort_by_key(|r| (r.start_at, r.id));
        all
    }

    /// Reservations intersecting `[from, to)` (Unix millis)
    pub fn find_in_range(&self, from: i64, to: i64) -> Vec<Reservation> {
        let mut found: Vec<Reservation> = self
            .db
            .reservations
            .iter()
            .filter(|e| e.start_at < to && e.effective_end() > from)
            .map(|e| e.value().clone())
            .collect();
        found.sort_by_key(|r| (r.start_at, r.id));
        found
    }

    pub fn find_by_id(&self, id: i64) -> Option<Reservation> {
        self.db.reservations.get(&id).map(|r| r.value().clone())
    }

    pub fn create(&self, data: ReservationCreate) -> RepoResult<Reservation> {
        if let Some(end) = data.end_at
            && end <= data.start_at
        {
            return Err(RepoError::Validation(
                "end_at must be after start_at".to_string(),
            ));
        }

        let table_label = data
            .table_id
            .and_then(|id| self.db.tables.get(&id).map(|t| t.name.clone()));
        let now = now_millis();
        let reservation = Reservation {
            id: self.db.next_id(),
            table_id: data.table_id,
            table_label,
            start_at: data.start_at,
            end_at: data.end_at,
            status: data.status.unwrap_or_else(|| status::PENDING.to_string()),
            guest_name: data.guest_name,
            party_size: data.party_size,
            phone: data.phone,
            note: data.note,
            created_at: now,
            updated_at: now,
        };
        self.db
            .reservations
            .insert(reservation.id, reservation.clone());
        Ok(reservation)
    }

    /// Move a reservation; returns `(previous, updated)`
    pub fn update_times(
        &self,
        id: i64,
        start_at: i64,
        end_at: i64,
    ) -> RepoResult<(Reservation, Reservation)> {
        self.modify(id, |r| {
            r.start_at = start_at;
            r.end_at = Some(end_at);
        })
    }

    /// Set a reservation's status; returns `(previous, updated)`
    pub fn update_status(
        &self,
        id: i64,
        new_status: &str,
    ) -> RepoResult<(Reservation, Reservation)> {
        self.modify(id, |r| r.status = new_status.to_string())
    }

    fn modify(
        &self,
        id: i64,
        apply: impl FnOnce(&mut Reservation),
    ) -> RepoResult<(Reservation, Reservation)> {
        let mut entry = self
            .db
            .reservations
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("Reservation {} not found", id)))?;
        let previous = entry.clone();
        apply(entry.value_mut());
        entry.updated_at = now_millis();
        Ok((previous, entry.clone()))
    }
}
