use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::Result;
use crate::time_utils::TimeWindow;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Render heart-rate recordings as one chart per day in a static HTML page
#[derive(Parser, Debug, Clone)]
#[command(
    name = "heartchart",
    about = "Render heart-rate recordings as one chart per day in a static HTML page",
    version
)]
pub struct Settings {
    /// Write the HTML document to FILE instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the merged samples to FILE as a JSON cache
    #[arg(long, value_name = "FILE")]
    pub cache: Option<PathBuf>,

    /// Document title
    #[arg(long, default_value = "Heart rate")]
    pub title: String,

    /// Drop samples closer than SECONDS to the last kept one (unless the value jumps)
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u32).range(1..))]
    pub smooth: Option<u32>,

    /// Only keep samples at or after this local time of day
    #[arg(long, value_name = "HH:MM[:SS]")]
    pub start_time: Option<String>,

    /// Only keep samples at or before this local time of day
    #[arg(long, value_name = "HH:MM[:SS]")]
    pub end_time: Option<String>,

    /// Chart width in pixels
    #[arg(long, default_value = "800", value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Chart height in pixels
    #[arg(long, default_value = "200", value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Timezone used to split days (auto-detected if not specified)
    #[arg(long, default_value = "auto", env = "HEARTCHART_TIMEZONE")]
    pub timezone: String,

    /// Colour theme of the document
    #[arg(long, default_value = "light", value_parser = ["light", "dark"])]
    pub theme: String,

    /// Logging level
    #[arg(
        long,
        default_value = "WARNING",
        env = "HEARTCHART_LOG",
        value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"]
    )]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Input recordings (trackpoint XML or JSON cache); directories are searched
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve `"auto"` values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os())
    }

    /// Same as [`Settings::load`] but accepts an explicit argument list,
    /// enabling unit-testing without spawning subprocesses.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::resolve_auto_values(Settings::parse_from(args))
    }

    /// Print the `--help` text to stdout.
    pub fn print_usage() -> std::io::Result<()> {
        Settings::command().print_help()
    }

    /// The wall-clock window requested with `--start-time` / `--end-time`.
    pub fn time_window(&self) -> Result<TimeWindow> {
        TimeWindow::from_specs(self.start_time.as_deref(), self.end_time.as_deref())
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = crate::time_utils::get_system_timezone();
        }

        // --debug overrides log level.
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
