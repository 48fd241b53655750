//! Schedule API Handlers

use axum::extract::{Query, State};
use chrono::{NaiveDate, Utc};
use crab_schedule::{HoursWindow, ScheduleZone, check_step, parse_date};
use serde::Deserialize;
use shared::models::DayBoard;

use crate::core::ServerState;
use crate::schedule::compute_board;
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// `GET /api/schedule/day` 查询参数
///
/// 除 `date` 外均可省略，省略时使用配置值；`expand` 默认 `true`。
#[derive(Debug, Default, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
    pub open: Option<String>,
    pub close: Option<String>,
    pub step: Option<String>,
    pub expand: Option<String>,
}

impl DayQuery {
    fn uses_defaults(&self) -> bool {
        self.open.is_none() && self.close.is_none() && self.step.is_none()
    }
}

fn today(zone: &ScheduleZone) -> NaiveDate {
    Utc::now().with_timezone(&zone.tz()).date_naive()
}

fn parse_expand(value: Option<&str>) -> AppResult<bool> {
    match value {
        None => Ok(true),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("expand must be true or false (got '{}')", other),
        )
        .with_detail("field", "expand")),
    }
}

fn parse_step(value: &str) -> AppResult<u32> {
    let step: u32 = value.parse().map_err(|_| {
        AppError::with_message(
            ErrorCode::ScheduleStepInvalid,
            format!("step must be a whole number of minutes (got '{}')", value),
        )
    })?;
    Ok(check_step(step)?)
}

/// GET /api/schedule/day - 获取日排班表
///
/// 默认参数的请求走缓存；自定义营业时间或粒度时现算。
pub async fn day(
    State(state): State<ServerState>,
    Query(query): Query<DayQuery>,
) -> AppResult<ApiResponse<DayBoard>> {
    let date = match query.date.as_deref() {
        Some(d) => parse_date(d)?,
        None => today(state.grid.zone()),
    };
    let expand = parse_expand(query.expand.as_deref())?;

    if query.uses_defaults() && expand {
        if let Some(board) = state.boards.get(date) {
            tracing::debug!(%date, "Serving cached day board");
            return Ok(ApiResponse::success(board));
        }
        let generation = state.boards.begin(date);
        let board = compute_board(&state.db, &state.grid, date, true);
        state.boards.store(date, generation, board.clone());
        return Ok(ApiResponse::success(board));
    }

    let configured = state.grid.window();
    let window = HoursWindow::parse(
        query
            .open
            .as_deref()
            .unwrap_or(&configured.open_label()),
        query
            .close
            .as_deref()
            .unwrap_or(&configured.close_label()),
    )?;
    let mut grid = state.grid.clone().with_window(window);
    if let Some(step) = query.step.as_deref() {
        grid = grid.with_step(parse_step(step)?)?;
    }

    Ok(ApiResponse::success(compute_board(
        &state.db, &grid, date, expand,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expand() {
        assert!(parse_expand(None).unwrap());
        assert!(parse_expand(Some("1")).unwrap());
        assert!(!parse_expand(Some("false")).unwrap());
        assert_eq!(
            parse_expand(Some("yes")).unwrap_err().code,
            ErrorCode::InvalidFormat
        );
    }

    #[test]
    fn test_parse_step() {
        assert_eq!(parse_step("15").unwrap(), 15);
        assert_eq!(parse_step("abc").unwrap_err().code, ErrorCode::ScheduleStepInvalid);
        assert_eq!(parse_step("0").unwrap_err().code, ErrorCode::ScheduleStepInvalid);
    }

    #[test]
    fn test_uses_defaults() {
        assert!(DayQuery::default().uses_defaults());
        let query = DayQuery {
            step: Some("15".into()),
            ..Default::default()
        };
        assert!(!query.uses_defaults());
    }
}
