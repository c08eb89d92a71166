//! Concurrent file loading.
//!
//! Each input file is read and parsed in its own tokio task. Results are
//! slotted back by argument position, so the caller sees them in the order
//! the files were given no matter which task finishes first. The first
//! failure aborts every task still running.

use std::path::PathBuf;

use heartchart_core::error::{ChartError, Result};
use heartchart_core::models::Sample;
use heartchart_core::time_utils::TimezoneHandler;
use heartchart_data::reader::parse_file_contents;
use tokio::task::JoinSet;

/// Read and parse every file, returning one sample list per file in input order.
pub async fn load_all(files: &[PathBuf], tz: TimezoneHandler) -> Result<Vec<Vec<Sample>>> {
    let mut tasks = JoinSet::new();
    for (index, path) in files.iter().cloned().enumerate() {
        tasks.spawn(async move { (index, load_file(path, tz).await) });
    }

    let mut slots: Vec<Option<Vec<Sample>>> = vec![None; files.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, Ok(samples))) => slots[index] = Some(samples),
            Ok((_, Err(e))) => {
                tasks.abort_all();
                return Err(e);
            }
            Err(join_err) => {
                tasks.abort_all();
                return Err(ChartError::Io(join_err.into()));
            }
        }
    }

    tracing::debug!(files = files.len(), "all input files parsed");
    Ok(slots.into_iter().flatten().collect())
}

async fn load_file(path: PathBuf, tz: TimezoneHandler) -> Result<Vec<Sample>> {
    let contents = tokio::fs::read(&path)
        .await
        .map_err(|source| ChartError::FileRead {
            path: path.clone(),
            source,
        })?;
    parse_file_contents(&path, &contents, &tz)
}
