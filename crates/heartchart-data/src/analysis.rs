//! Sample pipeline for heartchart.
//!
//! Takes the merged, time-ordered samples and turns them into per-day
//! buckets plus the shared [`Bounds`] the renderer scales every chart by.

use heartchart_core::error::Result;
use heartchart_core::models::{Bounds, DayBucket, Sample};
use heartchart_core::time_utils::{TimeWindow, TimezoneHandler};
use tracing::info;

use crate::aggregator::SampleAggregator;
use crate::processing::{filter_by_time_of_day, localize_samples, Smoother};

// ── Public types ──────────────────────────────────────────────────────────────

/// Optional stages applied after merging.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Wall-clock window to keep.
    pub window: TimeWindow,
    /// Minimum gap for the smoother; `None` disables smoothing.
    pub smooth_seconds: Option<u32>,
}

/// Sample counts after each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub merged: usize,
    pub after_filter: usize,
    pub charted: usize,
    pub days: usize,
}

/// Everything the renderer needs.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub days: Vec<DayBucket>,
    pub bounds: Bounds,
    pub stats: PipelineStats,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the post-merge pipeline.
///
/// 1. Derive local date and day-second for each sample.
/// 2. Drop samples outside the time-of-day window.
/// 3. Smooth, when requested.
/// 4. Compute bounds over what is left (fails with `EmptyInput` if nothing).
/// 5. Partition into day buckets.
pub fn process_samples(
    merged: &[Sample],
    tz: &TimezoneHandler,
    options: &PipelineOptions,
) -> Result<ChartData> {
    let local = localize_samples(merged, tz);

    let filtered = filter_by_time_of_day(local, options.window);
    let after_filter = filtered.len();

    let processed = match options.smooth_seconds {
        Some(gap) => Smoother::new(gap).smooth(&filtered),
        None => filtered,
    };

    let bounds = SampleAggregator::compute_bounds(&processed)?;
    let charted = processed.len();
    let days = SampleAggregator::partition_by_day(processed);

    let stats = PipelineStats {
        merged: merged.len(),
        after_filter,
        charted,
        days: days.len(),
    };
    info!(
        "Charting {} of {} samples ({} inside the time window) over {} days",
        stats.charted, stats.merged, stats.after_filter, stats.days
    );

    Ok(ChartData {
        days,
        bounds,
        stats,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
