//! 时间解析工具: 日期 (YYYY-MM-DD) 与挂钟时间 (HH:MM)
//!
//! Wall-clock times are carried as minutes since midnight (`0..=1440`).
//! `1440` is only produced by window expansion and renders as `24:00`.

use chrono::NaiveDate;

use crate::error::{ScheduleError, ScheduleResult};

/// Minutes in a calendar day
pub const MINUTES_PER_DAY: u32 = 1440;

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> ScheduleResult<NaiveDate> {
    if date.len() != 10 {
        return Err(ScheduleError::InvalidDate(date.to_string()));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ScheduleError::InvalidDate(date.to_string()))
}

/// 解析严格的 24 小时制 HH:MM，返回当日分钟数
///
/// Both fields must be two digits: `9:00` and `09:5` are rejected.
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digit = |i: usize| -> Option<u32> {
        let b = bytes[i];
        b.is_ascii_digit().then(|| u32::from(b - b'0'))
    };
    let hours = digit(0)? * 10 + digit(1)?;
    let minutes = digit(3)? * 10 + digit(4)?;
    (hours < 24 && minutes < 60).then_some(hours * 60 + minutes)
}

/// Like [`parse_hhmm`], reporting the offending value
pub fn parse_time(value: &str) -> ScheduleResult<u32> {
    parse_hhmm(value).ok_or_else(|| ScheduleError::InvalidTime(value.to_string()))
}

/// 分钟数 → HH:MM
pub fn format_minutes(minute_of_day: u32) -> String {
    format!("{:02}:{:02}", minute_of_day / 60, minute_of_day % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hhmm_accepts_strict_values() {
        assert_eq!(parse_hhmm("00:00"), Some(0));
        assert_eq!(parse_hhmm("09:30"), Some(570));
        assert_eq!(parse_hhmm("23:59"), Some(1439));
    }

    #[test]
    fn test_parse_hhmm_rejects_loose_values() {
        for bad in ["9:00", "09:5", "24:00", "12:60", "ab:cd", "09-30", "09:300", ""] {
            assert_eq!(parse_hhmm(bad), None, "{bad} should be rejected");
        }
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(matches!(
            parse_date("2024-02-30"),
            Err(ScheduleError::InvalidDate(_))
        ));
        assert!(parse_date("2024-1-5").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "00:00");
        assert_eq!(format_minutes(570), "09:30");
        assert_eq!(format_minutes(MINUTES_PER_DAY), "24:00");
    }
}
