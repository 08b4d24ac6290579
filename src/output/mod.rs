//! Output module for analysis reports
//!
//! This module handles:
//! - Rendering markdown reports of finished jobs
//! - Exporting job records as JSON
//! - Computing and printing batch statistics

mod markdown;
pub mod stats;

pub use markdown::format_markdown_report;
pub use stats::{print_statistics, BatchStatistics};

use crate::queue::JobRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Report formats the CLI can produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

/// Serializes job records as pretty-printed JSON
pub fn to_json(records: &[JobRecord]) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Renders job records in the requested format
pub fn render_report(records: &[JobRecord], format: ReportFormat) -> OutputResult<String> {
    match format {
        ReportFormat::Markdown => Ok(format_markdown_report(records)),
        ReportFormat::Json => to_json(records),
    }
}

/// Writes a rendered report to `path`, or to stdout when no path is given
pub fn write_report(
    records: &[JobRecord],
    format: ReportFormat,
    path: Option<&Path>,
) -> OutputResult<()> {
    let report = render_report(records, format)?;

    match path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(report.as_bytes())?;
            tracing::info!("Report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(report.as_bytes())?;
            if !report.ends_with('\n') {
                handle.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}
