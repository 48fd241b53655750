//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use crab_schedule::{parse_date, validate_time_edit};
use serde::Deserialize;
use shared::models::{
    Reservation, ReservationCreate, ReservationStatusUpdate, ReservationTimeUpdate,
};
use shared::{ReservationEvent, ReservationEventKind};

use crate::core::ServerState;
use crate::db::repository::{DiningTableRepository, ReservationRepository};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_positive,
    validate_optional_text, validate_required_text, validate_reservation_times,
};
use crate::utils::{ApiResponse, AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub date: Option<String>,
}

/// GET /api/reservations - 获取预订列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Vec<Reservation>>> {
    let repo = ReservationRepository::new(state.db.clone());
    let reservations = match query.date.as_deref() {
        Some(date) => {
            let (from, to) = state.grid.zone().day_bounds(parse_date(date)?);
            repo.find_in_range(from, to)
        }
        None => repo.find_all(),
    };
    Ok(ApiResponse::success(reservations))
}

/// GET /api/reservations/:id - 获取单个预订
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<ApiResponse<Reservation>> {
    let repo = ReservationRepository::new(state.db.clone());
    let reservation = repo.find_by_id(id).ok_or_else(|| AppError::reservation_not_found(id))?;
    Ok(ApiResponse::success(reservation))
}

/// POST /api/reservations - 创建预订
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<ApiResponse<Reservation>> {
    validate_optional_text(&payload.guest_name, "guest_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;
    validate_optional_positive(payload.party_size, "party_size")?;
    if let Some(status) = &payload.status {
        validate_required_text(status, "status", MAX_SHORT_TEXT_LEN)?;
    }
    validate_reservation_times(payload.start_at, payload.end_at, state.grid.zone())?;
    if let Some(table_id) = payload.table_id
        && DiningTableRepository::new(state.db.clone())
            .find_by_id(table_id)
            .is_none()
    {
        return Err(AppError::table_not_found("table_id", table_id));
    }

    let repo = ReservationRepository::new(state.db.clone());
    let reservation = repo.create(payload)?;

    tracing::info!(
        reservation_id = reservation.id,
        table_id = ?reservation.table_id,
        start = %state.grid.zone().label(reservation.start_at),
        "Reservation created"
    );
    state.publish(ReservationEvent::new(
        ReservationEventKind::Created,
        reservation.clone(),
    ));

    Ok(ApiResponse::success(reservation))
}

/// PATCH /api/reservations/:id/time - 修改预订时间
///
/// 新时间按预订开始日期在业务时区内解释，校验使用配置的营业窗口
/// (不受排班表自动扩展影响)。校验失败时不做任何修改。
pub async fn update_time(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationTimeUpdate>,
) -> AppResult<ApiResponse<Reservation>> {
    let repo = ReservationRepository::new(state.db.clone());
    let current = repo.find_by_id(id).ok_or_else(|| AppError::reservation_not_found(id))?;

    let zone = state.grid.zone();
    let date = zone.local_date(current.start_at).ok_or_else(|| {
        AppError::internal(format!("Reservation {} has an unrepresentable start time", id))
    })?;

    let edit = validate_time_edit(&payload.start, &payload.end, &state.config.schedule_window)?;
    let (start_at, end_at) = edit.resolve(date, zone);

    let (previous, updated) = repo.update_times(id, start_at, end_at)?;

    tracing::info!(
        reservation_id = id,
        %date,
        start = %edit.start_label(),
        end = %edit.end_label(),
        "Reservation time updated"
    );
    state.publish(
        ReservationEvent::new(ReservationEventKind::Updated, updated.clone())
            .with_previous(previous),
    );

    Ok(ApiResponse::success(updated))
}

/// PUT /api/reservations/:id/status - 修改预订状态
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReservationStatusUpdate>,
) -> AppResult<ApiResponse<Reservation>> {
    validate_required_text(&payload.status, "status", MAX_SHORT_TEXT_LEN)?;

    let repo = ReservationRepository::new(state.db.clone());
    if repo.find_by_id(id).is_none() {
        return Err(AppError::reservation_not_found(id));
    }
    let status = payload.status.trim();
    let (previous, updated) = repo.update_status(id, status)?;

    let kind = ReservationEventKind::for_status(status);
    tracing::info!(
        reservation_id = id,
        from = %previous.status,
        to = %updated.status,
        event = %kind,
        "Reservation status changed"
    );
    state.publish(ReservationEvent::new(kind, updated.clone()).with_previous(previous));

    Ok(ApiResponse::success(updated))
}
