//! Per-sample processing stages: localisation, time-of-day filtering and
//! smoothing.

use chrono::Duration;
use heartchart_core::models::{LocalSample, Reading, Sample};
use heartchart_core::time_utils::{TimeWindow, TimezoneHandler};
use tracing::debug;

/// Place every sample on the local wall clock.
pub fn localize_samples(samples: &[Sample], tz: &TimezoneHandler) -> Vec<LocalSample> {
    samples.iter().map(|s| tz.localize(*s)).collect()
}

/// Keep samples whose day-second lies inside `window` (bounds inclusive).
pub fn filter_by_time_of_day(samples: Vec<LocalSample>, window: TimeWindow) -> Vec<LocalSample> {
    if window.is_unbounded() {
        return samples;
    }

    let before = samples.len();
    let kept: Vec<LocalSample> = samples
        .into_iter()
        .filter(|s| window.contains(s.day_second))
        .collect();

    debug!(
        "Time-of-day filter {:?}..{:?} kept {} of {} samples",
        window.start,
        window.end,
        kept.len(),
        before
    );
    kept
}

// ── Smoother ──────────────────────────────────────────────────────────────────

/// Greedy density reduction.
///
/// A sample is kept when at least `min_gap` has passed since the last kept
/// sample, or when its heart rate differs from the last kept one by more
/// than `threshold`. The first sample is always kept.
#[derive(Debug, Clone, Copy)]
pub struct Smoother {
    min_gap: Duration,
    threshold: u64,
}

impl Smoother {
    /// Heart-rate change (bpm) that always survives smoothing.
    pub const DEFAULT_THRESHOLD: u64 = 5;

    pub fn new(min_gap_seconds: u32) -> Self {
        Self {
            min_gap: Duration::seconds(i64::from(min_gap_seconds)),
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    /// `candidate` is at least `min_gap` after `last`.
    pub fn gap_elapsed<R: Reading>(&self, last: &R, candidate: &R) -> bool {
        candidate.timestamp() - last.timestamp() >= self.min_gap
    }

    /// `candidate`'s heart rate moved by more than the threshold.
    pub fn value_jumped<R: Reading>(&self, last: &R, candidate: &R) -> bool {
        candidate.heart_rate().abs_diff(last.heart_rate()) > self.threshold
    }

    pub fn keeps<R: Reading>(&self, last: &R, candidate: &R) -> bool {
        self.gap_elapsed(last, candidate) || self.value_jumped(last, candidate)
    }

    /// Reduce an ordered sequence. Empty input yields empty output.
    pub fn smooth<R: Reading + Clone>(&self, samples: &[R]) -> Vec<R> {
        let Some((first, rest)) = samples.split_first() else {
            return Vec::new();
        };

        let mut kept = vec![first.clone()];
        let mut last = first;
        for candidate in rest {
            if self.keeps(last, candidate) {
                kept.push(candidate.clone());
                last = candidate;
            }
        }

        debug!(
            "Smoothing (gap {}s, threshold {}) kept {} of {} samples",
            self.min_gap.num_seconds(),
            self.threshold,
            kept.len(),
            samples.len()
        );
        kept
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn utc() -> TimezoneHandler {
        TimezoneHandler::new("UTC")
    }

    /// Sample `secs` seconds after 2024-01-15 00:00:00 UTC.
    fn s(secs: i64, hr: i64) -> Sample {
        let base = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        Sample::new(base + Duration::seconds(secs), hr)
    }

    fn is_subsequence(sub: &[Sample], of: &[Sample]) -> bool {
        let mut it = of.iter();
        sub.iter().all(|x| it.any(|y| y == x))
    }

    // ── localize_samples ─────────────────────────────────────────────────────

    #[test]
    fn test_localize_samples_keeps_order() {
        let samples = vec![s(10, 60), s(20, 61), s(86_410, 62)];
        let local = localize_samples(&samples, &utc());
        let seconds: Vec<u32> = local.iter().map(|l| l.day_second).collect();
        assert_eq!(seconds, vec![10, 20, 10]);
        assert_eq!(local[2].sample, samples[2]);
    }

    // ── filter_by_time_of_day ────────────────────────────────────────────────

    #[test]
    fn test_filter_inclusive_upper_bound() {
        let samples = localize_samples(
            &[s(21_599, 1), s(21_600, 2), s(36_000, 3), s(36_001, 4)],
            &utc(),
        );
        let window = TimeWindow {
            start: Some(21_600),
            end: Some(36_000),
        };
        let kept = filter_by_time_of_day(samples, window);
        let hrs: Vec<i64> = kept.iter().map(|l| l.heart_rate()).collect();
        assert_eq!(hrs, vec![2, 3]);
    }

    #[test]
    fn test_filter_applies_across_days() {
        let samples = localize_samples(&[s(7_200, 1), s(86_400 + 7_200, 2), s(86_400 + 50_000, 3)], &utc());
        let window = TimeWindow {
            start: None,
            end: Some(10_000),
        };
        let kept = filter_by_time_of_day(samples, window);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_filter_unbounded_is_identity() {
        let samples = localize_samples(&[s(1, 1), s(80_000, 2)], &utc());
        let kept = filter_by_time_of_day(samples.clone(), TimeWindow::default());
        assert_eq!(kept, samples);
    }

    // ── Smoother predicates ──────────────────────────────────────────────────

    #[test]
    fn test_gap_elapsed_is_inclusive() {
        let smoother = Smoother::new(30);
        assert!(!smoother.gap_elapsed(&s(0, 60), &s(29, 60)));
        assert!(smoother.gap_elapsed(&s(0, 60), &s(30, 60)));
    }

    #[test]
    fn test_value_jumped_is_strict() {
        let smoother = Smoother::new(30);
        assert!(!smoother.value_jumped(&s(0, 60), &s(1, 65)));
        assert!(smoother.value_jumped(&s(0, 60), &s(1, 66)));
        assert!(smoother.value_jumped(&s(0, 60), &s(1, 54)));
        assert!(!smoother.value_jumped(&s(0, 60), &s(1, 55)));
    }

    // ── Smoother::smooth ─────────────────────────────────────────────────────

    #[test]
    fn test_smooth_drops_dense_flat_points() {
        let input = vec![s(0, 60), s(5, 61), s(10, 62), s(30, 62), s(35, 63), s(61, 63)];
        let out = Smoother::new(30).smooth(&input);
        assert_eq!(out, vec![s(0, 60), s(30, 62), s(61, 63)]);
    }

    #[test]
    fn test_smooth_keeps_value_jumps() {
        let input = vec![s(0, 60), s(1, 70), s(2, 71), s(3, 90)];
        let out = Smoother::new(60).smooth(&input);
        // 71 is within 5 of the last kept (70).
        assert_eq!(out, vec![s(0, 60), s(1, 70), s(3, 90)]);
    }

    #[test]
    fn test_smooth_compares_against_last_kept_not_previous() {
        // Each step is +3 bpm, but the drift from the last kept point adds up.
        let input = vec![s(0, 60), s(1, 63), s(2, 66), s(3, 69)];
        let out = Smoother::new(60).smooth(&input);
        assert_eq!(out, vec![s(0, 60), s(2, 66)]);
    }

    #[test]
    fn test_smooth_zero_gap_is_identity() {
        let input = vec![s(0, 60), s(0, 61), s(1, 60), s(2, 62)];
        assert_eq!(Smoother::new(0).smooth(&input), input);
    }

    #[test]
    fn test_smooth_first_kept_and_subsequence() {
        let input: Vec<Sample> = (0..200).map(|i| s(i * 3, 60 + (i * 7) % 13)).collect();
        for gap in [1, 5, 17, 60, 600] {
            let out = Smoother::new(gap).smooth(&input);
            assert_eq!(out[0], input[0]);
            assert!(is_subsequence(&out, &input), "gap {gap}");
        }
    }

    #[test]
    fn test_resmooth_with_smaller_or_equal_gap_is_noop() {
        let input: Vec<Sample> = (0..120).map(|i| s(i * 2, 60 + (i % 4))).collect();
        let once = Smoother::new(20).smooth(&input);
        assert_eq!(Smoother::new(20).smooth(&once), once);
        assert_eq!(Smoother::new(10).smooth(&once), once);
        assert!(Smoother::new(60).smooth(&once).len() < once.len());
    }

    #[test]
    fn test_smooth_empty_input() {
        let out: Vec<Sample> = Smoother::new(30).smooth(&[]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_smooth_local_samples() {
        let local = localize_samples(&[s(0, 60), s(1, 60), s(40, 60)], &utc());
        let out = Smoother::new(30).smooth(&local);
        let seconds: Vec<u32> = out.iter().map(|l| l.day_second).collect();
        assert_eq!(seconds, vec![0, 40]);
    }

    #[test]
    fn test_value_jumped_across_full_integer_range() {
        let smoother = Smoother::new(30);
        let low = s(0, i64::MIN);
        let high = s(1, i64::MAX);
        assert!(smoother.value_jumped(&low, &high));
        assert!(smoother.value_jumped(&high, &low));
        assert_eq!(Smoother::new(30).smooth(&[low, high]), vec![low, high]);
    }

    #[test]
    fn test_custom_threshold() {
        let input = vec![s(0, 60), s(1, 62)];
        assert_eq!(Smoother::new(60).with_threshold(1).smooth(&input).len(), 2);
        assert_eq!(Smoother::new(60).smooth(&input).len(), 1);
    }
}
