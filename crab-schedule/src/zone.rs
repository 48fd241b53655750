//! 业务时区
//!
//! All schedule arithmetic happens in one configured zone so a board renders
//! identically whatever the viewer's locale. Defaults to `Asia/Bangkok`
//! (UTC+7, no DST).

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::error::{ScheduleError, ScheduleResult};
use crate::time::MINUTES_PER_DAY;

/// Zone used when none is configured
pub const DEFAULT_ZONE: Tz = chrono_tz::Asia::Bangkok;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleZone {
    tz: Tz,
}

impl ScheduleZone {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Parse an IANA zone name such as `Asia/Bangkok`
    pub fn parse(name: &str) -> ScheduleResult<Self> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| ScheduleError::InvalidZone(name.to_string()))
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn name(&self) -> &'static str {
        self.tz.name()
    }

    /// 日期 + 当日分钟数 → Unix millis
    ///
    /// `minute_of_day` may be 1440 (next midnight). DST gap fallback: if the
    /// local time does not exist, fall back to UTC.
    pub fn instant(&self, date: NaiveDate, minute_of_day: u32) -> i64 {
        let naive = date.and_time(NaiveTime::MIN) + Duration::minutes(i64::from(minute_of_day));
        naive
            .and_local_timezone(self.tz)
            .latest()
            .map(|dt| dt.timestamp_millis())
            .unwrap_or_else(|| naive.and_utc().timestamp_millis())
    }

    /// `[midnight, next midnight)` of `date` in Unix millis
    pub fn day_bounds(&self, date: NaiveDate) -> (i64, i64) {
        (self.instant(date, 0), self.instant(date, MINUTES_PER_DAY))
    }

    pub fn local(&self, millis: i64) -> Option<DateTime<Tz>> {
        self.tz.timestamp_millis_opt(millis).single()
    }

    /// Calendar date of an instant in this zone
    pub fn local_date(&self, millis: i64) -> Option<NaiveDate> {
        self.local(millis).map(|dt| dt.date_naive())
    }

    /// `HH:MM` wall clock of an instant in this zone
    pub fn label(&self, millis: i64) -> String {
        self.local(millis)
            .map(|dt| dt.format("%H:%M").to_string())
            .unwrap_or_default()
    }
}

impl Default for ScheduleZone {
    fn default() -> Self {
        Self::new(DEFAULT_ZONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_instant_uses_zone_offset() {
        let zone = ScheduleZone::default();
        // 2024-01-15 09:00 +07:00 == 2024-01-15 02:00 UTC
        assert_eq!(zone.instant(date(2024, 1, 15), 9 * 60), 1_705_284_000_000);
    }

    #[test]
    fn test_day_bounds_span_one_day() {
        let zone = ScheduleZone::default();
        let (start, end) = zone.day_bounds(date(2024, 1, 15));
        assert_eq!(end - start, 24 * 60 * 60_000);
        assert_eq!(zone.local_date(start), Some(date(2024, 1, 15)));
        assert_eq!(zone.local_date(end), Some(date(2024, 1, 16)));
    }

    #[test]
    fn test_label_renders_wall_clock() {
        let zone = ScheduleZone::default();
        let t = zone.instant(date(2024, 1, 15), 9 * 60 + 30);
        assert_eq!(zone.label(t), "09:30");

        let utc = ScheduleZone::new(chrono_tz::UTC);
        assert_eq!(utc.label(t), "02:30");
    }

    #[test]
    fn test_parse_zone() {
        assert_eq!(ScheduleZone::parse("Asia/Bangkok").unwrap().name(), "Asia/Bangkok");
        assert!(matches!(
            ScheduleZone::parse("Mars/Olympus"),
            Err(ScheduleError::InvalidZone(_))
        ));
    }
}
