//! 错误码到 HTTP 状态码的映射

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// 系统类错误一律 500；格式错误默认 400，格式正确但违反营业时间的编辑为 422
    pub fn http_status(&self) -> StatusCode {
        use ErrorCode::*;

        match self {
            Success => StatusCode::OK,
            NotFound | ReservationNotFound | TableNotFound => StatusCode::NOT_FOUND,
            AlreadyExists | TableNameExists => StatusCode::CONFLICT,
            ReservationStartsBeforeOpen | ReservationEndsAfterClose | ReservationEndBeforeStart => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Unknown => StatusCode::INTERNAL_SERVER_ERROR,
            _ if self.category() == ErrorCategory::System => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
