//! Core types for heartchart.
//!
//! Sample and bucket models, the error taxonomy, time-zone and time-of-day
//! handling, display formatting tables and command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{ChartError, Result};
