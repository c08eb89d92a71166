//! Input discovery, format sniffing and parsing for heartchart.
//!
//! Every input is either trackpoint markup (an exercise-tracker XML export)
//! or a JSON cache written by a previous run. The format is decided from the
//! content alone, never from the file name.

use std::path::{Path, PathBuf};

use heartchart_core::error::{ChartError, Result};
use heartchart_core::models::{CacheDocument, Sample};
use heartchart_core::time_utils::TimezoneHandler;
use roxmltree::Node;
use tracing::{debug, warn};

/// Extensions picked up when an input argument names a directory.
const INPUT_EXTENSIONS: &[&str] = &["tcx", "xml", "json"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

// ── Public API ────────────────────────────────────────────────────────────────

/// The two supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Trackpoint markup, recognised by a leading `<`.
    Markup,
    /// JSON cache, recognised by a leading `{`.
    Cache,
}

/// Expand the command-line inputs into the list of files to parse.
///
/// Plain paths are kept as given, in order. A directory is replaced by the
/// recognised files found beneath it, sorted by path.
pub fn find_input_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            files.push(input.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = walkdir::WalkDir::new(input)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry
                        .path()
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .map(|ext| INPUT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                        .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect();

        if found.is_empty() {
            warn!("No recordings found in {}", input.display());
        }
        found.sort();
        files.extend(found);
    }

    files
}

/// Decide the format from the first non-whitespace byte.
pub fn sniff_format(contents: &[u8]) -> Result<SourceFormat> {
    let body = contents.strip_prefix(UTF8_BOM).unwrap_or(contents);
    match body.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'<') => Ok(SourceFormat::Markup),
        Some(b'{') => Ok(SourceFormat::Cache),
        _ => Err(ChartError::UnrecognizedFormat),
    }
}

/// Parse raw file contents into (unordered) samples.
pub fn parse_contents(contents: &[u8], tz: &TimezoneHandler) -> Result<Vec<Sample>> {
    match sniff_format(contents)? {
        SourceFormat::Markup => {
            let text = std::str::from_utf8(contents)
                .map_err(|e| ChartError::MalformedMarkup(e.to_string()))?;
            parse_markup(text, tz)
        }
        SourceFormat::Cache => parse_cache(contents),
    }
}

/// Parse the contents of one input file, tagging any error with its path.
pub fn parse_file_contents(
    path: &Path,
    contents: &[u8],
    tz: &TimezoneHandler,
) -> Result<Vec<Sample>> {
    let samples = parse_contents(contents, tz).map_err(|e| e.in_file(path))?;
    debug!("File {}: {} samples", path.display(), samples.len());
    Ok(samples)
}

/// Extract samples from trackpoint markup.
///
/// Every `Trackpoint` element must carry a parseable `Time`; one without is
/// a fatal error for the whole document. A trackpoint with no
/// `HeartRateBpm/Value` reading is skipped.
pub fn parse_markup(text: &str, tz: &TimezoneHandler) -> Result<Vec<Sample>> {
    let text = text.trim_start_matches('\u{feff}');
    let doc = roxmltree::Document::parse(text)
        .map_err(|e| ChartError::MalformedMarkup(e.to_string()))?;

    let mut samples = Vec::new();
    let mut skipped = 0usize;

    for trackpoint in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "Trackpoint")
    {
        let time_text = child_element(trackpoint, "Time")
            .and_then(|n| n.text())
            .ok_or_else(|| {
                ChartError::TimestampParse(format!(
                    "trackpoint without a time at byte {}",
                    trackpoint.range().start
                ))
            })?;
        let timestamp = tz
            .parse_timestamp(time_text)
            .ok_or_else(|| ChartError::TimestampParse(time_text.trim().to_string()))?;

        let Some(value_text) = child_element(trackpoint, "HeartRateBpm")
            .and_then(|hr| child_element(hr, "Value"))
            .and_then(|n| n.text())
        else {
            skipped += 1;
            continue;
        };
        let heart_rate = value_text.trim().parse::<i64>().map_err(|_| {
            ChartError::MalformedMarkup(format!("heart rate \"{}\" is not an integer", value_text))
        })?;

        samples.push(Sample::new(timestamp, heart_rate));
    }

    if skipped > 0 {
        debug!("Skipped {} trackpoints without a heart-rate reading", skipped);
    }

    Ok(samples)
}

/// Extract samples from a JSON cache document.
pub fn parse_cache(contents: &[u8]) -> Result<Vec<Sample>> {
    let doc: CacheDocument = serde_json::from_slice(contents)
        .map_err(|e| ChartError::InvalidCache(e.to_string()))?;
    Ok(doc.datapoints)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// First child element with the given local name, ignoring namespaces.
fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
