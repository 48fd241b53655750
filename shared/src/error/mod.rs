//! 统一错误体系
//!
//! | 类型 | 说明 |
//! |------|------|
//! | [`ErrorCode`] | 数值错误码，前端按它选择文案 |
//! | [`ErrorCategory`] | 按千位划分的错误领域 |
//! | [`AppError`] | 错误码 + 消息 + 结构化详情 |
//! | [`ApiResponse`] | `/api` 接口统一响应包 |
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::ReservationTimeInvalid, "start must be HH:MM")
//!     .with_detail("field", "start");
//!
//! let response = ApiResponse::<()>::from(err);
//! assert_eq!(response.code, 4002);
//! assert!(!response.is_success());
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult, ErrorDetails};
