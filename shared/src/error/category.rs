//! 按错误码千位划分领域

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    Reservation,
    Schedule,
    Table,
    /// 9xxx 以及所有未分配的千位段
    System,
}

impl ErrorCategory {
    pub fn of(code: u16) -> Self {
        match code / 1000 {
            0 => Self::General,
            4 => Self::Reservation,
            6 => Self::Schedule,
            7 => Self::Table,
            _ => Self::System,
        }
    }
}

impl ErrorCode {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::of(self.code())
    }
}
