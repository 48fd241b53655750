//! ScheduleRefreshWorker: rebuilds cached day boards after reservation changes
//!
//! Subscribes to the reservation event bus, collects the touched dates,
//! and once events stop arriving for the debounce window rebuilds every
//! cached board among them.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use shared::ReservationEvent;

use crate::core::state::ServerState;
use crate::schedule::{affected_dates, compute_board};

pub struct ScheduleRefreshWorker {
    state: ServerState,
    shutdown: CancellationToken,
    debounce: Duration,
    events: broadcast::Receiver<ReservationEvent>,
}

impl ScheduleRefreshWorker {
    pub fn new(state: ServerState, shutdown: CancellationToken) -> Self {
        // 构造时订阅，避免启动前发布的事件丢失
        let events = state.events.subscribe();
        let debounce = Duration::from_millis(state.config.refresh_debounce_ms);
        Self {
            state,
            shutdown,
            debounce,
            events,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(debounce_ms = self.debounce.as_millis() as u64, "ScheduleRefreshWorker started");

        let zone = *self.state.grid.zone();
        let mut pending: BTreeSet<NaiveDate> = BTreeSet::new();
        let mut debounce_deadline: Option<Instant> = None;

        loop {
            let sleep_until =
                debounce_deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    if !pending.is_empty() {
                        tracing::debug!(dropped = pending.len(), "Dropping pending board refreshes");
                    }
                    break;
                }

                _ = tokio::time::sleep_until(sleep_until), if debounce_deadline.is_some() => {
                    debounce_deadline = None;
                    self.refresh(std::mem::take(&mut pending));
                }

                result = self.events.recv() => {
                    match result {
                        Ok(event) => {
                            pending.extend(affected_dates(&event, &zone));
                            debounce_deadline = Some(Instant::now() + self.debounce);
                        }
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!("ScheduleRefreshWorker lagged {n} events, refreshing all cached boards");
                            debounce_deadline = None;
                            pending.clear();
                            self.state.boards.invalidate_all();
                            self.refresh(self.state.boards.stale_dates().into_iter().collect());
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            tracing::info!("Event channel closed, ScheduleRefreshWorker stopping");
                            break;
                        }
                    }
                }
            }
        }

        tracing::info!("ScheduleRefreshWorker stopped");
    }

    /// Rebuild the cached boards among `dates`
    fn refresh(&self, dates: BTreeSet<NaiveDate>) {
        let mut rebuilt = 0usize;
        for date in dates {
            if self.shutdown.is_cancelled() {
                return;
            }
            if !self.state.boards.is_cached(date) {
                continue;
            }
            let generation = self.state.boards.begin(date);
            let board = compute_board(&self.state.db, &self.state.grid, date, true);
            if self.state.boards.store(date, generation, board) {
                rebuilt += 1;
            } else {
                tracing::debug!(%date, "Board changed during rebuild, left stale");
            }
        }
        if rebuilt > 0 {
            tracing::debug!(rebuilt, "Refreshed day boards");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::db::repository::ReservationRepository;
    use crab_schedule::parse_date;
    use shared::ReservationEventKind;
    use shared::models::{ReservationCreate, status};

    fn state() -> ServerState {
        let mut config = Config::defaults();
        config.refresh_debounce_ms = 20;
        ServerState::initialize(&config)
    }

    #[tokio::test]
    async fn test_rebuilds_cached_board_after_event() {
        let state = state();
        let date = parse_date("2024-01-15").unwrap();

        let board = compute_board(&state.db, &state.grid, date, true);
        state.boards.store(date, state.boards.begin(date), board);
        assert!(state.boards.get(date).is_some_and(|b| b.unassigned.is_empty()));

        let shutdown = CancellationToken::new();
        let worker = tokio::spawn(ScheduleRefreshWorker::new(state.clone(), shutdown.clone()).run());

        let reservation = ReservationRepository::new(state.db.clone())
            .create(ReservationCreate {
                table_id: None,
                start_at: state.grid.zone().instant(date, 12 * 60),
                end_at: None,
                status: Some(status::PENDING.to_string()),
                guest_name: None,
                party_size: None,
                phone: None,
                note: None,
            })
            .unwrap();
        state.publish(ReservationEvent::new(ReservationEventKind::Created, reservation.clone()));
        assert!(state.boards.get(date).is_none());

        let mut refreshed = None;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            if let Some(board) = state.boards.get(date) {
                refreshed = Some(board);
                break;
            }
        }
        assert_eq!(refreshed.map(|b| b.unassigned), Some(vec![reservation.id]));

        shutdown.cancel();
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_uncached_dates_are_not_built() {
        let state = state();
        let date = parse_date("2024-01-15").unwrap();
        let worker = ScheduleRefreshWorker::new(state.clone(), CancellationToken::new());

        worker.refresh(BTreeSet::from([date]));
        assert!(!state.boards.is_cached(date));
    }
}
