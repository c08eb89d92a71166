//! HTML rendering for heartchart.
//!
//! Turns per-day sample buckets into a single static page with one inline
//! SVG chart per day.

pub mod chart;
pub mod document;
pub mod themes;

pub use document::{render_document, RenderOptions};
pub use themes::Theme;
