//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{DiningTable, DiningTableCreate};

use crate::core::ServerState;
use crate::db::repository::{DiningTableRepository, RepoError};
use crate::utils::validation::{MAX_NAME_LEN, validate_optional_positive, validate_required_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode};

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<ApiResponse<Vec<DiningTable>>> {
    let repo = DiningTableRepository::new(state.db.clone());
    Ok(ApiResponse::success(repo.find_all()))
}

/// GET /api/tables/:id - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<DiningTable>> {
    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo
        .find_by_id(id)
        .ok_or_else(|| AppError::table_not_found("id", id))?;
    Ok(ApiResponse::success(table))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<ApiResponse<DiningTable>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_positive(payload.capacity, "capacity")?;

    let repo = DiningTableRepository::new(state.db.clone());
    let table = repo.create(payload).map_err(|e| match e {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::TableNameExists, msg),
        other => other.into(),
    })?;

    tracing::info!(table_id = table.id, name = %table.name, "Dining table created");

    // 新桌台会出现在所有日期的排班表上
    state.boards.invalidate_all();

    Ok(ApiResponse::success(table))
}
