//! Day board cache
//!
//! Each date carries a generation counter. Invalidation bumps it, and a
//! board is only stored if the generation it was computed under is still
//! current, so a rebuild that raced with a newer change is discarded.
//!
//! Entries are only created by [`BoardCache::begin`] (a read that is about to
//! compute a board). Invalidation never creates entries, and the number of
//! dates is capped: beyond [`MAX_CACHED_DATES`] the least recently used date
//! is evicted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use dashmap::DashMap;
use shared::models::DayBoard;

/// Upper bound on cached dates
pub const MAX_CACHED_DATES: usize = 366;

#[derive(Debug, Default)]
struct CachedBoard {
    board: Option<DayBoard>,
    generation: u64,
    stale: bool,
    last_used: u64,
}

#[derive(Clone)]
pub struct BoardCache {
    entries: Arc<DashMap<NaiveDate, CachedBoard>>,
    clock: Arc<AtomicU64>,
    capacity: usize,
}

impl Default for BoardCache {
    fn default() -> Self {
        Self::with_capacity(MAX_CACHED_DATES)
    }
}

impl BoardCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            clock: Arc::new(AtomicU64::new(0)),
            capacity: capacity.max(1),
        }
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Fresh board for `date`, if any
    pub fn get(&self, date: NaiveDate) -> Option<DayBoard> {
        let mut entry = self.entries.get_mut(&date)?;
        if entry.stale {
            return None;
        }
        entry.last_used = self.tick();
        entry.board.clone()
    }

    /// Register `date` before computing its board; returns the generation to
    /// pass to [`BoardCache::store`]
    pub fn begin(&self, date: NaiveDate) -> u64 {
        if !self.entries.contains_key(&date) && self.entries.len() >= self.capacity {
            self.evict_least_recent();
        }
        let now = self.tick();
        let mut entry = self.entries.entry(date).or_insert_with(|| CachedBoard {
            stale: true,
            ..CachedBoard::default()
        });
        entry.last_used = now;
        entry.generation
    }

    /// Store `board` unless `date` was invalidated (or evicted) since `generation`
    pub fn store(&self, date: NaiveDate, generation: u64, board: DayBoard) -> bool {
        let Some(mut entry) = self.entries.get_mut(&date) else {
            return false;
        };
        if entry.generation != generation {
            return false;
        }
        entry.board = Some(board);
        entry.stale = false;
        true
    }

    /// Mark `date` stale; dates never read are left alone
    pub fn invalidate(&self, date: NaiveDate) {
        if let Some(mut entry) = self.entries.get_mut(&date) {
            entry.generation += 1;
            entry.stale = true;
        }
    }

    pub fn invalidate_all(&self) {
        for mut entry in self.entries.iter_mut() {
            entry.generation += 1;
            entry.stale = true;
        }
    }

    /// Whether a board was ever stored for `date`
    pub fn is_cached(&self, date: NaiveDate) -> bool {
        self.entries
            .get(&date)
            .is_some_and(|e| e.board.is_some())
    }

    /// Dates holding a board that needs rebuilding
    pub fn stale_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .entries
            .iter()
            .filter(|e| e.stale && e.board.is_some())
            .map(|e| *e.key())
            .collect();
        dates.sort();
        dates
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn evict_least_recent(&self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|e| e.last_used)
            .map(|e| *e.key());
        if let Some(date) = oldest {
            self.entries.remove(&date);
            tracing::debug!(%date, "Evicted cached day board");
        }
    }
}
