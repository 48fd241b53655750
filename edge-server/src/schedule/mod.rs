//! 排班表服务
//!
//! | 组件 | 说明 |
//! |------|------|
//! | [`compute_board`] | 从存储读取当日预订与桌台，生成 [`DayBoard`] |
//! | [`BoardCache`] | 按日期缓存默认参数下的排班表 |
//! | [`ScheduleRefreshWorker`] | 监听预订事件，防抖后重建受影响日期 |

mod cache;
mod refresh;

pub use cache::BoardCache;
pub use refresh::ScheduleRefreshWorker;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use crab_schedule::{ScheduleZone, SlotGridBuilder, build_day_board};
use shared::ReservationEvent;
use shared::models::DayBoard;

use crate::db::MemoryDb;
use crate::db::repository::{DiningTableRepository, ReservationRepository};

/// Build the board for `date` from the current store contents
pub fn compute_board(
    db: &MemoryDb,
    grid: &SlotGridBuilder,
    date: NaiveDate,
    expand: bool,
) -> DayBoard {
    let (from, to) = grid.zone().day_bounds(date);
    let reservations = ReservationRepository::new(db.clone()).find_in_range(from, to);
    let tables = DiningTableRepository::new(db.clone()).find_all();
    build_day_board(grid, date, &reservations, &tables, expand)
}

/// Local calendar dates an event touched, before and after the change
pub fn affected_dates(event: &ReservationEvent, zone: &ScheduleZone) -> BTreeSet<NaiveDate> {
    let mut dates = BTreeSet::new();
    for (start, end) in event.touched_intervals() {
        let (Some(first), Some(last)) = (
            zone.local_date(start),
            zone.local_date(end.saturating_sub(1).max(start)),
        ) else {
            continue;
        };
        dates.extend(first.iter_days().take_while(|d| *d <= last));
    }
    dates
}
