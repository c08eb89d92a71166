//! JSON cache output.
//!
//! The cache mirrors the input format read by [`crate::reader::parse_cache`],
//! so a cache file can be passed back in as an input on a later run.

use std::path::Path;

use heartchart_core::error::{ChartError, Result};
use heartchart_core::models::{CacheDocument, Sample};
use tracing::info;

/// Serialise `samples` as a cache document.
pub fn encode_cache(samples: &[Sample]) -> Result<String> {
    let doc = CacheDocument {
        datapoints: samples.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// Write `samples` to `path`, creating parent directories if needed.
///
/// The document is written to a sibling temp file first and renamed into
/// place, so readers never observe a half-written cache.
pub fn write_cache(path: &Path, samples: &[Sample]) -> Result<()> {
    let json = encode_cache(samples)?;
    let write_err = |source: std::io::Error| ChartError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)?;

    info!("Wrote {} samples to cache {}", samples.len(), path.display());
    Ok(())
}
