//! 数据存储层
//!
//! 进程内存储：桌台与预订各一张 [`DashMap`] 表，ID 由单调序列分配。
//! 所有仓储共享同一个 [`MemoryDb`] 句柄（clone 只复制 `Arc`）。

pub mod repository;

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;
use shared::models::{DiningTable, Reservation};

/// 内存数据库句柄
#[derive(Clone, Default)]
pub struct MemoryDb {
    pub(crate) tables: Arc<DashMap<i64, DiningTable>>,
    pub(crate) reservations: Arc<DashMap<i64, Reservation>>,
    sequence: Arc<AtomicI64>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配下一个 ID (从 1 开始)
    pub(crate) fn next_id(&self) -> i64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// 当前时间 (Unix millis)
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
