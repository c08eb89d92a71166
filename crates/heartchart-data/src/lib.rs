//! Data layer for heartchart.
//!
//! Reads trackpoint markup and JSON cache files, merges and orders the
//! samples, and runs the filter / smoothing / day-partitioning pipeline.

pub mod aggregator;
pub mod analysis;
pub mod cache;
pub mod processing;
pub mod reader;

pub use heartchart_core as core;
