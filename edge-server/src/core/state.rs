use std::time::Instant;

use crab_schedule::SlotGridBuilder;
use shared::ReservationEvent;

use crate::core::{BackgroundTasks, Config};
use crate::db::MemoryDb;
use crate::message::EventBus;
use crate::schedule::{BoardCache, ScheduleRefreshWorker, affected_dates};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 所有字段内部都是 `Arc` 或小型值类型，clone 成本极低，可直接作为
/// axum 的 `State`。
///
/// # 服务组件
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | db | MemoryDb | 桌台与预订存储 |
/// | events | EventBus | 预订事件广播 |
/// | boards | BoardCache | 按日期缓存的排班表 |
/// | grid | SlotGridBuilder | 按配置构造的时间槽生成器 |
///
/// # 使用示例
///
/// ```ignore
/// let state = ServerState::initialize(&config);
/// let tasks = state.start_background_tasks();
/// let router = api::build_router(state.clone());
/// ```
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: MemoryDb,
    pub events: EventBus,
    pub boards: BoardCache,
    pub grid: SlotGridBuilder,
    started_at: Instant,
}

impl ServerState {
    /// 按配置初始化所有服务
    pub fn initialize(config: &Config) -> Self {
        let grid = config.grid_builder();
        tracing::info!(
            timezone = grid.zone().name(),
            open = %grid.window().open_label(),
            close = %grid.window().close_label(),
            step_minutes = grid.step_minutes(),
            "Schedule grid configured"
        );

        Self {
            config: config.clone(),
            db: MemoryDb::new(),
            events: EventBus::new(),
            boards: BoardCache::new(),
            grid,
            started_at: Instant::now(),
        }
    }

    /// 发布预订事件
    ///
    /// 先把受影响日期的缓存标记为过期，再广播；读请求不会拿到旧表。
    pub fn publish(&self, event: ReservationEvent) {
        for date in affected_dates(&event, self.grid.zone()) {
            self.boards.invalidate(date);
        }
        self.events.publish(event);
    }

    /// 启动后台任务
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let state = self.clone();
        tasks.spawn("schedule_refresh", |shutdown| {
            ScheduleRefreshWorker::new(state, shutdown).run()
        });

        tracing::info!("Started {} background tasks", tasks.len());
        tasks
    }

    /// 运行时间 (秒)
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
