//! Reservation API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/reservations | GET | 列表 (`?date=YYYY-MM-DD` 按日过滤) |
//! | /api/reservations | POST | 创建预订 |
//! | /api/reservations/{id} | GET | 单个预订 |
//! | /api/reservations/{id}/time | PATCH | 修改开始/结束时间 (`HH:MM`) |
//! | /api/reservations/{id}/status | PUT | 修改状态 |
//!
//! 所有写操作都会发布 [`shared::ReservationEvent`]。

mod handler;

use axum::{
    Router,
    routing::{get, patch, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/time", patch(handler::update_time))
        .route("/{id}/status", put(handler::update_status))
}
