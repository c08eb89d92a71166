use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone as _, Timelike, Utc};
use chrono_tz::Tz;
use regex::Regex;
use tracing::warn;

use crate::error::{ChartError, Result};
use crate::models::{LocalSample, Sample, SECONDS_PER_DAY};

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Parses trackpoint timestamps and places instants on the local wall clock.
#[derive(Debug, Clone, Copy)]
pub struct TimezoneHandler {
    default_tz: Tz,
}

impl TimezoneHandler {
    /// Create a handler with the given IANA timezone name as the local zone.
    ///
    /// If `tz_name` is not a recognised IANA timezone, falls back to UTC
    /// and logs a warning.
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimezoneHandler: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Tz::UTC
        });
        Self { default_tz: tz }
    }

    /// Parse an ISO 8601 / RFC 3339 timestamp string into a UTC [`DateTime`].
    ///
    /// Handles the `Z`-suffix form, any fixed UTC offset and fractional
    /// seconds. Strings without an offset are read as local time in the
    /// handler's zone; a time skipped by a DST jump is moved forward by the
    /// length of the jump (one hour). Returns `None` for empty strings or
    /// unrecognised formats.
    pub fn parse_timestamp(&self, s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }

        const FMTS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
        ];
        for fmt in FMTS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return self.resolve_local(naive).map(|dt| dt.with_timezone(&Utc));
            }
        }

        None
    }

    /// Ambiguous local times (DST fall-back) resolve to the earlier instant;
    /// times inside a spring-forward gap are shifted one hour later.
    fn resolve_local(&self, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
        self.default_tz
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                self.default_tz
                    .from_local_datetime(&(naive + Duration::hours(1)))
                    .earliest()
            })
    }

    /// Local calendar date and seconds since local midnight for `dt`.
    pub fn day_position(&self, dt: DateTime<Utc>) -> (NaiveDate, u32) {
        let local = dt.with_timezone(&self.default_tz);
        (local.date_naive(), local.num_seconds_from_midnight())
    }

    /// Attach local date and day-second to a sample.
    pub fn localize(&self, sample: Sample) -> LocalSample {
        let (date, day_second) = self.day_position(sample.timestamp);
        debug_assert!(day_second < SECONDS_PER_DAY);
        LocalSample {
            sample,
            date,
            day_second,
        }
    }
}

// ── Time-of-day window ────────────────────────────────────────────────────────

/// Parse `HH:MM` or `HH:MM:SS` into seconds since midnight.
///
/// # Examples
///
/// ```
/// use heartchart_core::time_utils::parse_time_of_day;
///
/// assert_eq!(parse_time_of_day("06:00").unwrap(), 21_600);
/// assert_eq!(parse_time_of_day("23:59:59").unwrap(), 86_399);
/// assert!(parse_time_of_day("24:00").is_err());
/// ```
pub fn parse_time_of_day(spec: &str) -> Result<u32> {
    let re = Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").expect("regex is valid");
    let invalid = || ChartError::InvalidTimeSpec(spec.to_string());

    let caps = re.captures(spec.trim()).ok_or_else(invalid)?;
    let field = |i: usize| -> Result<u32> {
        caps.get(i)
            .map_or(Ok(0), |m| m.as_str().parse::<u32>().map_err(|_| invalid()))
    };
    let (hours, minutes, seconds) = (field(1)?, field(2)?, field(3)?);

    if hours > 23 || minutes > 59 || seconds > 59 {
        return Err(invalid());
    }
    Ok(hours * 3_600 + minutes * 60 + seconds)
}

/// Inclusive wall-clock window; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<u32>,
    pub end: Option<u32>,
}

impl TimeWindow {
    /// Build a window from optional `HH:MM[:SS]` strings.
    pub fn from_specs(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Ok(Self {
            start: start.map(parse_time_of_day).transpose()?,
            end: end.map(parse_time_of_day).transpose()?,
        })
    }

    /// `true` when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn contains(&self, day_second: u32) -> bool {
        self.start.map_or(true, |s| day_second >= s) && self.end.map_or(true, |e| day_second <= e)
    }
}

/// Render a day-second as `HH:MM`.
pub fn format_day_second(day_second: u32) -> String {
    format!("{:02}:{:02}", day_second / 3_600, (day_second % 3_600) / 60)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Reading;
    use chrono::TimeZone;

    // ── TimezoneHandler::new ─────────────────────────────────────────────────

    #[test]
    fn test_unknown_zone_splits_days_in_utc() {
        let handler = TimezoneHandler::new("Mars/Olympus");
        let ts = Utc.with_ymd_and_hms(2024, 1, 10, 23, 30, 0).unwrap();
        let local = handler.localize(Sample::new(ts, 60));
        assert_eq!(local.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(local.day_second, 23 * 3_600 + 30 * 60);
    }

    // ── TimezoneHandler::parse_timestamp ─────────────────────────────────────

    #[test]
    fn test_parse_timestamp_z_suffix() {
        let handler = TimezoneHandler::new("UTC");
        let dt = handler.parse_timestamp("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_timestamp_fractional_seconds() {
        let handler = TimezoneHandler::new("UTC");
        let dt = handler.parse_timestamp("2024-01-15T10:30:00.250Z").unwrap();
        assert_eq!(dt.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_timestamp_with_offset() {
        let handler = TimezoneHandler::new("UTC");
        let dt = handler
            .parse_timestamp("2024-01-15T12:00:00+02:00")
            .unwrap();
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn test_parse_timestamp_naive_uses_local_zone() {
        let handler = TimezoneHandler::new("Europe/Berlin");
        let dt = handler.parse_timestamp("2024-01-15T12:00:00").unwrap();
        // Berlin is UTC+1 in winter.
        assert_eq!(dt.hour(), 11);
    }

    #[test]
    fn test_parse_timestamp_in_spring_forward_gap() {
        let handler = TimezoneHandler::new("Europe/Berlin");
        // 02:30 does not exist on 2024-03-31 in Berlin; it reads as 03:30 CEST.
        let dt = handler.parse_timestamp("2024-03-31T02:30:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 31, 1, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_in_fall_back_overlap_takes_earlier() {
        let handler = TimezoneHandler::new("Europe/Berlin");
        // 02:30 happens twice on 2024-10-27; the first is still CEST.
        let dt = handler.parse_timestamp("2024-10-27T02:30:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 10, 27, 0, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_timestamp_garbage_returns_none() {
        let handler = TimezoneHandler::new("UTC");
        assert!(handler.parse_timestamp("").is_none());
        assert!(handler.parse_timestamp("not-a-date").is_none());
    }

    // ── TimezoneHandler::localize ────────────────────────────────────────────

    #[test]
    fn test_localize_utc() {
        let handler = TimezoneHandler::new("UTC");
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 6, 30, 15).unwrap();
        let local = handler.localize(Sample::new(ts, 70));
        assert_eq!(local.date, NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(local.day_second, 6 * 3_600 + 30 * 60 + 15);
        assert_eq!(local.heart_rate(), 70);
    }

    #[test]
    fn test_localize_crosses_date_line_in_local_zone() {
        let handler = TimezoneHandler::new("America/New_York");
        // 02:00 UTC on the 10th is 21:00 on the 9th in New York (EST).
        let ts = Utc.with_ymd_and_hms(2024, 1, 10, 2, 0, 0).unwrap();
        let local = handler.localize(Sample::new(ts, 60));
        assert_eq!(local.date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert_eq!(local.day_second, 21 * 3_600);
    }

    #[test]
    fn test_localize_last_second_of_day() {
        let handler = TimezoneHandler::new("UTC");
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap();
        assert_eq!(handler.localize(Sample::new(ts, 1)).day_second, 86_399);
    }

    // ── parse_time_of_day ────────────────────────────────────────────────────

    #[test]
    fn test_parse_time_of_day_valid() {
        assert_eq!(parse_time_of_day("00:00").unwrap(), 0);
        assert_eq!(parse_time_of_day("6:00").unwrap(), 21_600);
        assert_eq!(parse_time_of_day("10:00").unwrap(), 36_000);
        assert_eq!(parse_time_of_day("10:00:01").unwrap(), 36_001);
    }

    #[test]
    fn test_parse_time_of_day_rejects_out_of_range() {
        for spec in ["24:00", "12:60", "12:00:60", "99:99"] {
            assert!(
                matches!(parse_time_of_day(spec), Err(ChartError::InvalidTimeSpec(_))),
                "{spec} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_time_of_day_rejects_garbage() {
        for spec in ["", "noon", "10", "10:0", "10:00:00:00", "-1:00"] {
            assert!(
                matches!(parse_time_of_day(spec), Err(ChartError::InvalidTimeSpec(_))),
                "{spec} should be rejected"
            );
        }
    }

    // ── TimeWindow ───────────────────────────────────────────────────────────

    #[test]
    fn test_time_window_inclusive_bounds() {
        let window = TimeWindow::from_specs(Some("06:00"), Some("10:00")).unwrap();
        assert!(!window.contains(21_599));
        assert!(window.contains(21_600));
        assert!(window.contains(36_000));
        assert!(!window.contains(36_001));
    }

    #[test]
    fn test_time_window_open_sides() {
        let only_start = TimeWindow::from_specs(Some("12:00"), None).unwrap();
        assert!(only_start.contains(86_399));
        assert!(!only_start.contains(0));

        let unbounded = TimeWindow::default();
        assert!(unbounded.is_unbounded());
        assert!(unbounded.contains(0));
        assert!(unbounded.contains(86_399));
    }

    #[test]
    fn test_time_window_invalid_spec() {
        let result = TimeWindow::from_specs(None, Some("late"));
        assert!(matches!(result, Err(ChartError::InvalidTimeSpec(s)) if s == "late"));
    }

    #[test]
    fn test_format_day_second() {
        assert_eq!(format_day_second(0), "00:00");
        assert_eq!(format_day_second(36_059), "10:00");
        assert_eq!(format_day_second(86_399), "23:59");
    }

    // ── get_system_timezone ──────────────────────────────────────────────────

    #[test]
    fn test_get_system_timezone_returns_nonempty_string() {
        assert!(!get_system_timezone().is_empty());
    }
}
