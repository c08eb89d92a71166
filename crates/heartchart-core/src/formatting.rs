use chrono::{Datelike, NaiveDate};

/// English weekday names, Monday first (matches `Weekday::num_days_from_monday`).
pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// English month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Heading text for a day's chart.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use heartchart_core::formatting::format_day_heading;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// assert_eq!(format_day_heading(date), "Monday 15 January 2024");
/// ```
pub fn format_day_heading(date: NaiveDate) -> String {
    let day_name = DAY_NAMES[date.weekday().num_days_from_monday() as usize];
    let month_name = MONTH_NAMES[date.month0() as usize];
    format!("{} {} {} {}", day_name, date.day(), month_name, date.year())
}

/// One-line summary shown under a day heading, e.g. `"412 samples, 58–131 bpm"`.
pub fn format_day_summary(count: usize, range: Option<(i64, i64)>) -> String {
    let noun = if count == 1 { "sample" } else { "samples" };
    match range {
        Some((min, max)) if min == max => format!("{} {}, {} bpm", count, noun, min),
        Some((min, max)) => format!("{} {}, {}–{} bpm", count, noun, min, max),
        None => format!("{} {}", count, noun),
    }
}
