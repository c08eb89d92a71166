use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by heartchart.
#[derive(Error, Debug)]
pub enum ChartError {
    /// File content starts with neither `<` nor `{`.
    #[error("Unrecognized input format")]
    UnrecognizedFormat,

    /// The trackpoint document is not well-formed markup.
    #[error("Malformed markup: {0}")]
    MalformedMarkup(String),

    /// A trackpoint time was missing or did not parse.
    #[error("Invalid timestamp format: {0}")]
    TimestampParse(String),

    /// A JSON cache document is invalid or lacks `datapoints`.
    #[error("Invalid cache document: {0}")]
    InvalidCache(String),

    /// A `--start-time` / `--end-time` value is not `HH:MM[:SS]`.
    #[error("Invalid time of day \"{0}\" (expected HH:MM or HH:MM:SS)")]
    InvalidTimeSpec(String),

    /// Nothing survived to the bounds stage, so there is nothing to chart.
    #[error("No heart-rate samples to chart")]
    EmptyInput,

    /// A parse error tagged with the input file it came from.
    #[error("{path}: {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ChartError>,
    },

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file could not be written.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChartError {
    /// Attach the input path to a parse error.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        ChartError::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }

    /// The underlying error, looking through any [`ChartError::InFile`] wrapper.
    pub fn root(&self) -> &ChartError {
        match self {
            ChartError::InFile { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Convenience alias used throughout the heartchart crates.
pub type Result<T> = std::result::Result<T, ChartError>;
