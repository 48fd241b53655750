//! AppError 与统一响应包

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// 附加在错误上的结构化上下文，按键排序输出
pub type ErrorDetails = BTreeMap<String, Value>;

/// 带错误码的业务错误
///
/// `message` 面向开发者，前端根据 `code` 选择本地化文案。
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<ErrorDetails>,
}

impl AppError {
    /// 使用错误码的默认消息
    pub fn new(code: ErrorCode) -> Self {
        Self::with_message(code, code.message())
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(ErrorDetails::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn reservation_not_found(id: i64) -> Self {
        Self::with_message(
            ErrorCode::ReservationNotFound,
            format!("Reservation {id} not found"),
        )
        .with_detail("id", id)
    }

    /// `field` 是请求里引用桌台的字段名 (`id` 或 `table_id`)
    pub fn table_not_found(field: &str, id: i64) -> Self {
        Self::with_message(ErrorCode::TableNotFound, format!("Table {id} not found"))
            .with_detail(field, id)
    }

    pub fn is_system(&self) -> bool {
        self.code.category() == ErrorCategory::System
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// 所有 `/api` 接口的响应包
///
/// ```json
/// { "code": 0, "message": "OK", "data": { ... } }
/// { "code": 4003, "message": "...", "details": { "start": "08:00" } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetails>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: ErrorCode::Success.code(),
            message: ErrorCode::Success.message().to_string(),
            data: Some(data),
            details: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == ErrorCode::Success.code()
    }

    fn status(&self) -> http::StatusCode {
        ErrorCode::try_from(self.code)
            .map(|code| code.http_status())
            .unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<AppError> for ApiResponse<()> {
    fn from(err: AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message,
            data: None,
            details: err.details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_system() {
            tracing::error!(code = %self.code, message = %self.message, "Request failed");
        } else {
            tracing::debug!(code = %self.code, message = %self.message, "Request rejected");
        }
        ApiResponse::<()>::from(self).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status(), axum::Json(self)).into_response()
    }
}
