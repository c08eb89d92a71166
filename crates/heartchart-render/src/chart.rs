//! Inline SVG line chart for one day.
//!
//! Every chart is scaled by the same [`Bounds`], so the same time of day and
//! the same heart rate land on the same pixel in every chart.

use std::fmt::Write as _;

use heartchart_core::models::{Bounds, DayBucket, Reading};
use heartchart_core::time_utils::format_day_second;

use crate::themes::Theme;

/// Space reserved for the bpm labels.
const MARGIN_LEFT: f64 = 44.0;
const MARGIN_RIGHT: f64 = 12.0;
const MARGIN_TOP: f64 = 8.0;
/// Space reserved for the time labels.
const MARGIN_BOTTOM: f64 = 22.0;

/// Maps day-seconds and heart rates onto pixel coordinates.
#[derive(Debug, Clone, Copy)]
pub struct ChartScale {
    bounds: Bounds,
    width: f64,
    height: f64,
}

impl ChartScale {
    pub fn new(bounds: Bounds, width: u32, height: u32) -> Self {
        Self {
            bounds,
            width: f64::from(width),
            height: f64::from(height),
        }
    }

    fn plot_width(&self) -> f64 {
        (self.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0)
    }

    fn plot_height(&self) -> f64 {
        (self.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0)
    }

    /// Horizontal position; a zero-width domain maps to the centre.
    pub fn x(&self, day_second: u32) -> f64 {
        let span = f64::from(self.bounds.day_second_span());
        let frac = if span == 0.0 {
            0.5
        } else {
            f64::from(day_second.saturating_sub(self.bounds.min_day_second)) / span
        };
        MARGIN_LEFT + frac * self.plot_width()
    }

    /// Vertical position, higher heart rate nearer the top; a zero-height
    /// domain maps to the middle.
    pub fn y(&self, heart_rate: i64) -> f64 {
        let span = self.bounds.heart_rate_span() as f64;
        let frac = if span == 0.0 {
            0.5
        } else {
            (heart_rate as f64 - self.bounds.min_heart_rate as f64) / span
        };
        MARGIN_TOP + (1.0 - frac) * self.plot_height()
    }

    fn left(&self) -> f64 {
        MARGIN_LEFT
    }

    fn right(&self) -> f64 {
        MARGIN_LEFT + self.plot_width()
    }

    fn bottom(&self) -> f64 {
        MARGIN_TOP + self.plot_height()
    }
}

/// Render one day's samples as an `<svg>` element.
pub fn render_day_chart(day: &DayBucket, scale: &ChartScale, theme: &Theme) -> String {
    let b = scale.bounds;
    let mut svg = String::new();

    let _ = writeln!(
        svg,
        r#"<svg class="chart" xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" role="img">"#,
        w = scale.width,
        h = scale.height,
    );

    // Frame lines at the shared min/max heart rate.
    for hr in [b.min_heart_rate, b.max_heart_rate] {
        let y = scale.y(hr);
        let _ = writeln!(
            svg,
            r#"  <line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{}" stroke-width="1"/>"#,
            scale.left(),
            scale.right(),
            theme.grid,
        );
    }
    let _ = writeln!(
        svg,
        r#"  <line x1="{l:.1}" y1="{bottom:.1}" x2="{r:.1}" y2="{bottom:.1}" stroke="{c}" stroke-width="1"/>"#,
        l = scale.left(),
        r = scale.right(),
        bottom = scale.bottom(),
        c = theme.axis,
    );

    // Axis labels.
    let _ = writeln!(
        svg,
        r#"  <text class="axis" x="{:.1}" y="{:.1}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
        scale.left() - 6.0,
        scale.y(b.max_heart_rate),
        b.max_heart_rate,
    );
    if b.heart_rate_span() != 0 {
        let _ = writeln!(
            svg,
            r#"  <text class="axis" x="{:.1}" y="{:.1}" text-anchor="end" dominant-baseline="middle">{}</text>"#,
            scale.left() - 6.0,
            scale.y(b.min_heart_rate),
            b.min_heart_rate,
        );
    }
    let label_y = scale.bottom() + 15.0;
    let _ = writeln!(
        svg,
        r#"  <text class="axis" x="{:.1}" y="{label_y:.1}" text-anchor="start">{}</text>"#,
        scale.left(),
        format_day_second(b.min_day_second),
    );
    let _ = writeln!(
        svg,
        r#"  <text class="axis" x="{:.1}" y="{label_y:.1}" text-anchor="end">{}</text>"#,
        scale.right(),
        format_day_second(b.max_day_second),
    );

    // The series.
    let points: Vec<String> = day
        .samples
        .iter()
        .map(|s| format!("{:.1},{:.1}", scale.x(s.day_second), scale.y(s.heart_rate())))
        .collect();
    if let [only] = day.samples.as_slice() {
        let _ = writeln!(
            svg,
            r#"  <circle cx="{:.1}" cy="{:.1}" r="2" fill="{}"/>"#,
            scale.x(only.day_second),
            scale.y(only.heart_rate()),
            theme.line,
        );
    } else if !points.is_empty() {
        let _ = writeln!(
            svg,
            r#"  <polyline fill="none" stroke="{}" stroke-width="1.5" stroke-linejoin="round" points="{}"/>"#,
            theme.line,
            points.join(" "),
        );
    }

    svg.push_str("</svg>\n");
    svg
}
