//! Edge Server - 餐厅后台预订排班服务
//!
//! # 架构概述
//!
//! - **HTTP API** (`api`): 桌台、预订、日排班表接口
//! - **存储** (`db`): 进程内桌台/预订仓储
//! - **消息** (`message`): 预订事件广播
//! - **排班** (`schedule`): 排班表缓存与后台刷新
//!
//! 时间槽计算本身在 `crab-schedule` 中，这里只负责取数、缓存和推送。
//!
//! # 模块结构
//!
//! ```text
//! edge-server/src/
//! ├── core/          # 配置、状态、错误、后台任务
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 存储层
//! ├── message/       # 事件总线
//! ├── schedule/      # 排班表缓存与刷新
//! └── utils/         # 日志、校验
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod message;
pub mod schedule;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, LogSettings, Server, ServerState};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境 (dotenv + 日志)，返回加载好的配置
///
/// 日志先于其余配置初始化，配置回退的警告才能输出。
pub fn setup_environment() -> Config {
    // .env 不存在时忽略
    let _ = dotenv::dotenv();

    let log = LogSettings::from_env();
    init_logger_with_file(Some(&log.level), log.json, log.dir.as_deref());

    Config::from_env()
}

pub fn print_banner() {
    println!(
        r#"
   ______           __
  / ____/________ _/ /_
 / /   / ___/ __ `/ __ \
/ /___/ /  / /_/ / /_/ /
\____/_/   \__,_/_.___/
      schedule
    "#
    );
}
