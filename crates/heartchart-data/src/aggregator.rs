//! Merging, day grouping and shared chart bounds.

use std::collections::HashMap;

use chrono::NaiveDate;
use heartchart_core::error::{ChartError, Result};
use heartchart_core::models::{Bounds, DayBucket, LocalSample, Reading, Sample};
use tracing::debug;

// ── SampleAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that merges per-file samples and groups them by day.
pub struct SampleAggregator;

impl SampleAggregator {
    /// Concatenate per-file results in argument order and sort by timestamp.
    ///
    /// The sort is stable, so samples sharing a timestamp keep their
    /// concatenated order. Nothing is dropped: identical samples coming from
    /// overlapping files (or from re-reading a cache next to its sources) are
    /// all kept.
    pub fn aggregate(per_file: Vec<Vec<Sample>>) -> Vec<Sample> {
        let files = per_file.len();
        let mut merged: Vec<Sample> = per_file.into_iter().flatten().collect();
        merged.sort_by_key(|s| s.timestamp);

        debug!("Aggregated {} samples from {} files", merged.len(), files);
        merged
    }

    /// Group samples by local date, in order of first appearance.
    ///
    /// Sorted input yields chronologically ordered buckets, each internally
    /// ordered.
    pub fn partition_by_day(samples: Vec<LocalSample>) -> Vec<DayBucket> {
        let mut buckets: Vec<DayBucket> = Vec::new();
        let mut index: HashMap<NaiveDate, usize> = HashMap::new();

        for sample in samples {
            let slot = *index.entry(sample.date).or_insert_with(|| {
                buckets.push(DayBucket::new(sample.date));
                buckets.len() - 1
            });
            buckets[slot].samples.push(sample);
        }

        debug!("Partitioned samples into {} days", buckets.len());
        buckets
    }

    /// Min/max of day-second and heart rate over every sample.
    pub fn compute_bounds(samples: &[LocalSample]) -> Result<Bounds> {
        let (first, rest) = samples.split_first().ok_or(ChartError::EmptyInput)?;

        let init = Bounds {
            min_day_second: first.day_second,
            max_day_second: first.day_second,
            min_heart_rate: first.heart_rate(),
            max_heart_rate: first.heart_rate(),
        };

        Ok(rest.iter().fold(init, |b, s| Bounds {
            min_day_second: b.min_day_second.min(s.day_second),
            max_day_second: b.max_day_second.max(s.day_second),
            min_heart_rate: b.min_heart_rate.min(s.heart_rate()),
            max_heart_rate: b.max_heart_rate.max(s.heart_rate()),
        }))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
