//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`tables`] - 桌台管理接口
//! - [`reservations`] - 预订管理接口 (创建、改时间、改状态)
//! - [`schedule`] - 日排班表接口

pub mod health;
pub mod logging;
pub mod reservations;
pub mod schedule;
pub mod tables;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Build a router with all routes registered (no middleware, no state)
pub fn routes() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(tables::router())
        .merge(reservations::router())
        .merge(schedule::router())
}

/// Build the fully configured application
///
/// Used by both the HTTP server and in-process tests.
pub fn build_router(state: ServerState) -> Router {
    routes()
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Request logging
        .layer(axum::middleware::from_fn(logging::logging_middleware))
        // Trace - Request tracing spans
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
