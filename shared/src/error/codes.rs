//! 错误码表
//!
//! 每个错误码只在 [`error_codes!`] 表中声明一次：数值、枚举名和默认消息
//! 都从同一行生成，`TryFrom<u16>` 与 `message()` 不会和枚举定义走样。
//!
//! | 范围 | 领域 |
//! |------|------|
//! | 0xxx | 通用 |
//! | 4xxx | 预订 |
//! | 6xxx | 排班表 |
//! | 7xxx | 桌台 |
//! | 9xxx | 系统 |

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! error_codes {
    ($( $(#[$attr:meta])* $name:ident = $value:literal => $message:literal, )+) => {
        /// Numeric error code carried in every API response
        ///
        /// Serialized as a bare `u16` so the frontend can switch on it directly.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u16", try_from = "u16")]
        #[repr(u16)]
        pub enum ErrorCode {
            $( $(#[$attr])* $name = $value, )+
        }

        impl ErrorCode {
            /// Every code in declaration order
            pub const ALL: &'static [ErrorCode] = &[ $( ErrorCode::$name, )+ ];

            /// Default English message for this code
            pub const fn message(&self) -> &'static str {
                match self {
                    $( ErrorCode::$name => $message, )+
                }
            }
        }

        impl TryFrom<u16> for ErrorCode {
            type Error = InvalidErrorCode;

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(ErrorCode::$name), )+
                    other => Err(InvalidErrorCode(other)),
                }
            }
        }
    };
}

error_codes! {
    // 0xxx
    Success = 0 => "OK",
    /// Unclassified failure
    Unknown = 1 => "An unknown error occurred",
    ValidationFailed = 2 => "Validation failed",
    NotFound = 3 => "Resource not found",
    AlreadyExists = 4 => "Resource already exists",
    /// Query parameter could not be parsed
    InvalidFormat = 6 => "Invalid format",
    ValueOutOfRange = 8 => "Value is out of range",

    // 4xxx
    ReservationNotFound = 4001 => "Reservation not found",
    /// Edited start or end is not `HH:MM`
    ReservationTimeInvalid = 4002 => "Time must be in HH:MM format",
    ReservationStartsBeforeOpen = 4003 => "Start time is before opening time",
    ReservationEndsAfterClose = 4004 => "End time is after closing time",
    ReservationEndBeforeStart = 4005 => "End time must be after start time",

    // 6xxx
    ScheduleDateInvalid = 6001 => "Date must be in YYYY-MM-DD format",
    ScheduleHoursInvalid = 6002 => "Opening hours must be in HH:MM format",
    /// Step is zero, negative or longer than a day
    ScheduleStepInvalid = 6003 => "Slot step is out of range",

    // 7xxx
    TableNotFound = 7001 => "Table not found",
    TableNameExists = 7002 => "Table name already exists",

    // 9xxx
    InternalError = 9001 => "Internal server error",
    ConfigError = 9003 => "Configuration error",
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// 未登记的错误码数值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unregistered error code {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}
