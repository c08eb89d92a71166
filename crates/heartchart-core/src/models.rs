use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Number of seconds in a calendar day; every day-second is below this.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// A single heart-rate reading.
///
/// Serialises as `{"hr": <int>, "timestamp": <epoch-ms>}`, the shape used by
/// cache files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Heart rate in beats per minute. No physiological bound is enforced.
    #[serde(rename = "hr")]
    pub heart_rate: i64,
    /// Absolute instant of the reading.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, heart_rate: i64) -> Self {
        Self {
            heart_rate,
            timestamp,
        }
    }
}

/// Anything carrying a timestamped heart-rate value.
pub trait Reading {
    fn timestamp(&self) -> DateTime<Utc>;
    fn heart_rate(&self) -> i64;
}

impl Reading for Sample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn heart_rate(&self) -> i64 {
        self.heart_rate
    }
}

/// A [`Sample`] placed on the local wall clock.
///
/// Only produced by the localisation step, so `day_second` is always within
/// `[0, SECONDS_PER_DAY)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSample {
    pub sample: Sample,
    /// Local calendar date of the reading.
    pub date: NaiveDate,
    /// Seconds since local midnight.
    pub day_second: u32,
}

impl Reading for LocalSample {
    fn timestamp(&self) -> DateTime<Utc> {
        self.sample.timestamp
    }

    fn heart_rate(&self) -> i64 {
        self.sample.heart_rate
    }
}

/// All samples sharing one local calendar date, in chronological order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub samples: Vec<LocalSample>,
}

impl DayBucket {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            samples: Vec::new(),
        }
    }

    /// Lowest and highest heart rate within this day, if it has any samples.
    pub fn heart_rate_range(&self) -> Option<(i64, i64)> {
        let min = self.samples.iter().map(LocalSample::heart_rate).min()?;
        let max = self.samples.iter().map(LocalSample::heart_rate).max()?;
        Some((min, max))
    }
}

/// Shared axis domain for every day's chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_day_second: u32,
    pub max_day_second: u32,
    pub min_heart_rate: i64,
    pub max_heart_rate: i64,
}

impl Bounds {
    /// Width of the time axis in seconds (zero when all samples share a second).
    pub fn day_second_span(&self) -> u32 {
        self.max_day_second - self.min_day_second
    }

    /// Height of the value axis in bpm (zero when all samples share a value).
    pub fn heart_rate_span(&self) -> u64 {
        self.max_heart_rate.abs_diff(self.min_heart_rate)
    }
}

/// On-disk cache snapshot: `{"datapoints": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDocument {
    pub datapoints: Vec<Sample>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(hr: i64, day_second: u32) -> LocalSample {
        let ts = Utc.timestamp_opt(i64::from(day_second), 0).unwrap();
        LocalSample {
            sample: Sample::new(ts, hr),
            date: ts.date_naive(),
            day_second,
        }
    }

    #[test]
    fn test_sample_serializes_as_cache_datapoint() {
        let sample = Sample::new(Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(), 72);
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"hr": 72, "timestamp": 1_700_000_000_123_i64})
        );
    }

    #[test]
    fn test_cache_document_requires_datapoints() {
        let result = serde_json::from_str::<CacheDocument>("{}");
        assert!(result.is_err());
    }

    #[test]
    fn test_cache_document_accepts_empty_list() {
        let doc: CacheDocument = serde_json::from_str(r#"{"datapoints": []}"#).unwrap();
        assert!(doc.datapoints.is_empty());
    }

    #[test]
    fn test_day_bucket_heart_rate_range() {
        let mut bucket = DayBucket::new(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap());
        assert_eq!(bucket.heart_rate_range(), None);
        bucket.samples.push(local(80, 10));
        bucket.samples.push(local(61, 20));
        bucket.samples.push(local(95, 30));
        assert_eq!(bucket.heart_rate_range(), Some((61, 95)));
    }

    #[test]
    fn test_bounds_spans() {
        let bounds = Bounds {
            min_day_second: 3_600,
            max_day_second: 7_200,
            min_heart_rate: 55,
            max_heart_rate: 170,
        };
        assert_eq!(bounds.day_second_span(), 3_600);
        assert_eq!(bounds.heart_rate_span(), 115);
    }

    #[test]
    fn test_heart_rate_span_covers_full_integer_range() {
        let bounds = Bounds {
            min_day_second: 0,
            max_day_second: 0,
            min_heart_rate: i64::MIN,
            max_heart_rate: i64::MAX,
        };
        assert_eq!(bounds.heart_rate_span(), u64::MAX);
    }
}
