//! End-to-end run coordination.
//!
//! Expands the inputs, fans parsing out over tokio tasks, merges the results
//! and runs the sample pipeline. The cache file, when requested, is written
//! only after every stage has succeeded.

use std::path::PathBuf;

use heartchart_core::error::Result;
use heartchart_core::models::Sample;
use heartchart_core::time_utils::TimezoneHandler;
use heartchart_data::aggregator::SampleAggregator;
use heartchart_data::analysis::{process_samples, ChartData, PipelineOptions};
use heartchart_data::cache::write_cache;
use heartchart_data::reader::find_input_files;

use crate::loader::load_all;

// ── Public types ──────────────────────────────────────────────────────────────

/// One charting run, as configured from the command line.
#[derive(Debug, Clone)]
pub struct ChartJob {
    /// Files and directories named on the command line.
    pub inputs: Vec<PathBuf>,
    /// Zone used to split days.
    pub timezone: TimezoneHandler,
    pub options: PipelineOptions,
    /// Where to write the merged samples, if anywhere.
    pub cache_path: Option<PathBuf>,
}

/// Result of a successful [`ChartJob`].
#[derive(Debug, Clone)]
pub struct ChartReport {
    /// Files actually parsed, after directory expansion.
    pub files: Vec<PathBuf>,
    /// All samples, merged and sorted, before filtering or smoothing.
    pub merged: Vec<Sample>,
    pub chart: ChartData,
}

// ── ChartJob ──────────────────────────────────────────────────────────────────

impl ChartJob {
    pub fn new(inputs: Vec<PathBuf>, timezone: TimezoneHandler) -> Self {
        Self {
            inputs,
            timezone,
            options: PipelineOptions::default(),
            cache_path: None,
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cache(mut self, path: Option<PathBuf>) -> Self {
        self.cache_path = path;
        self
    }

    /// Run the job. Any parse failure aborts the whole run.
    pub async fn run(self) -> Result<ChartReport> {
        let files = find_input_files(&self.inputs);
        tracing::info!(files = files.len(), "loading recordings");

        let per_file = load_all(&files, self.timezone).await?;
        let merged = SampleAggregator::aggregate(per_file);

        let chart = process_samples(&merged, &self.timezone, &self.options)?;

        if let Some(path) = &self.cache_path {
            write_cache(path, &merged)?;
        }

        Ok(ChartReport {
            files,
            merged,
            chart,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
