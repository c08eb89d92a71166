//! Runtime layer for heartchart.
//!
//! Loads input files concurrently and drives the data pipeline for a single
//! charting run.

pub mod loader;
pub mod orchestrator;

pub use heartchart_core as core;
pub use heartchart_data as data;
