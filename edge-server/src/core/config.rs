use chrono_tz::Tz;
use crab_schedule::{
    DEFAULT_STEP_MINUTES, DEFAULT_ZONE, HoursWindow, OverlapPolicy, ScheduleZone, SlotGridBuilder,
    check_step,
};

/// 日志配置
///
/// 与 [`Config`] 分开读取：日志必须先于其余配置初始化，
/// 否则加载配置时的回退警告没有订阅者接收。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    pub dir: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
            dir: None,
        }
    }
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    /// `LOG_JSON` 在日志初始化之前解析，无法解析时只能写 stderr
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let json = match lookup("LOG_JSON") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                eprintln!("Invalid LOG_JSON value {raw:?}, falling back to {}", defaults.json);
                defaults.json
            }),
            None => defaults.json,
        };
        Self {
            level: lookup("LOG_LEVEL").unwrap_or(defaults.level),
            json,
            dir: lookup("LOG_DIR"),
        }
    }
}

/// 服务器配置 - 预订排班服务的所有配置项
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | TIMEZONE | Asia/Bangkok | 业务时区 (IANA) |
/// | SCHEDULE_OPEN_TIME | 09:00 | 排班表开始时间 |
/// | SCHEDULE_CLOSE_TIME | 22:00 | 排班表结束时间 |
/// | SCHEDULE_STEP_MINUTES | 30 | 时间槽粒度(分钟) |
/// | OVERLAP_POLICY | input_order | 同桌重叠预订的状态取舍 |
/// | REFRESH_DEBOUNCE_MS | 250 | 排班刷新防抖(毫秒) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_JSON | false | JSON 日志 |
/// | LOG_DIR | - | 日志目录 (存在时按天滚动写文件) |
///
/// 无法解析的值回退到默认值并记录 `warn!`。
///
/// # 示例
///
/// ```ignore
/// TIMEZONE=Asia/Ho_Chi_Minh SCHEDULE_OPEN_TIME=10:00 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 业务时区
    pub timezone: Tz,
    /// 配置的营业时间窗口
    pub schedule_window: HoursWindow,
    /// 时间槽粒度 (分钟)
    pub step_minutes: u32,
    /// 同桌重叠预订的状态取舍
    pub overlap_policy: OverlapPolicy,
    /// 实时事件合并窗口 (毫秒)
    pub refresh_debounce_ms: u64,
    pub log: LogSettings,
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// 解析一个可选变量；无法解析时记录警告并返回默认值
fn parse_or<T, E>(
    key: &str,
    raw: Option<String>,
    default: T,
    parse: impl FnOnce(&str) -> Result<T, E>,
) -> T
where
    T: std::fmt::Debug,
    E: std::fmt::Display,
{
    let Some(raw) = raw else {
        return default;
    };
    match parse(raw.trim()) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                key,
                value = %raw,
                error = %e,
                fallback = ?default,
                "Invalid config value, using default"
            );
            default
        }
    }
}

impl Config {
    /// 内置默认值 (不读取环境变量)
    pub fn defaults() -> Self {
        Self {
            http_port: 3000,
            environment: "development".into(),
            timezone: DEFAULT_ZONE,
            schedule_window: HoursWindow::default(),
            step_minutes: DEFAULT_STEP_MINUTES,
            overlap_policy: OverlapPolicy::default(),
            refresh_debounce_ms: 250,
            log: LogSettings::default(),
        }
    }

    /// 从环境变量加载配置
    ///
    /// 应在日志初始化之后调用，回退警告才会输出。
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    /// 从任意键值来源加载配置，未设置的键使用默认值
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::defaults();

        let timezone = parse_or("TIMEZONE", lookup("TIMEZONE"), defaults.timezone, |v| {
            ScheduleZone::parse(v).map(|z| z.tz())
        });

        let open = lookup("SCHEDULE_OPEN_TIME");
        let close = lookup("SCHEDULE_CLOSE_TIME");
        let schedule_window = if open.is_none() && close.is_none() {
            defaults.schedule_window
        } else {
            let open = open.unwrap_or_else(|| defaults.schedule_window.open_label());
            let close = close.unwrap_or_else(|| defaults.schedule_window.close_label());
            parse_or(
                "SCHEDULE_OPEN_TIME/SCHEDULE_CLOSE_TIME",
                Some(format!("{open}-{close}")),
                defaults.schedule_window,
                |_| HoursWindow::parse(open.trim(), close.trim()),
            )
        };

        let step_minutes = parse_or(
            "SCHEDULE_STEP_MINUTES",
            lookup("SCHEDULE_STEP_MINUTES"),
            defaults.step_minutes,
            |v| {
                v.parse::<u32>()
                    .map_err(|e| e.to_string())
                    .and_then(|n| check_step(n).map_err(|e| e.to_string()))
            },
        );

        let overlap_policy = parse_or(
            "OVERLAP_POLICY",
            lookup("OVERLAP_POLICY"),
            defaults.overlap_policy,
            |v| v.parse::<OverlapPolicy>(),
        );

        Self {
            http_port: parse_or("HTTP_PORT", lookup("HTTP_PORT"), defaults.http_port, |v| {
                v.parse::<u16>()
            }),
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            timezone,
            schedule_window,
            step_minutes,
            overlap_policy,
            refresh_debounce_ms: parse_or(
                "REFRESH_DEBOUNCE_MS",
                lookup("REFRESH_DEBOUNCE_MS"),
                defaults.refresh_debounce_ms,
                |v| v.parse::<u64>(),
            ),
            log: LogSettings::from_lookup(lookup),
        }
    }

    /// 业务时区
    pub fn zone(&self) -> ScheduleZone {
        ScheduleZone::new(self.timezone)
    }

    /// 按配置构造排班表生成器
    pub fn grid_builder(&self) -> SlotGridBuilder {
        let builder = SlotGridBuilder::new(self.zone())
            .with_window(self.schedule_window)
            .with_policy(self.overlap_policy);
        // step_minutes 已在加载时校验
        builder
            .clone()
            .with_step(self.step_minutes)
            .unwrap_or(builder)
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
