//! 请求日志中间件

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

/// 路由模板优先 (`/api/reservations/{id}`)，未匹配时退回原始路径
fn route_of(req: &Request) -> String {
    match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        None => req.uri().path().to_owned(),
    }
}

/// 每个请求一行日志：5xx 记 error，4xx 记 warn，其余 info
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let route = route_of(&req);

    let response = next.run(req).await;

    let status = response.status();
    let code = status.as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(%method, %route, status = code, elapsed_ms, "Request failed");
    } else if status.is_client_error() {
        tracing::warn!(%method, %route, status = code, elapsed_ms, "Request rejected");
    } else {
        tracing::info!(%method, %route, status = code, elapsed_ms, "Request served");
    }

    response
}
