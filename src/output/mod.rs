//! Output module for exporting records and reporting runs
//!
//! This module handles:
//! - Exporting records to CSV, JSON and Excel files
//! - Summarizing a crawl run

mod export;
mod summary;
mod traits;

pub use export::{
    export_records, export_stem, exporter_for, CsvExporter, ExcelExporter, JsonExporter,
};
pub use summary::RunSummary;
pub use traits::{ExportFormat, Exporter, OutputError, OutputResult};

use crate::config::OutputConfig;
use crate::extract::Record;
use std::path::PathBuf;

/// Formats requested by an output configuration, CSV first
pub fn requested_formats(config: &OutputConfig) -> Vec<ExportFormat> {
    let mut formats = vec![ExportFormat::Csv];
    if config.json {
        formats.push(ExportFormat::Json);
    }
    if config.excel {
        formats.push(ExportFormat::Excel);
    }
    formats
}

/// Exports records in every requested format
///
/// Each format is attempted independently; one failing export does not stop
/// the others.
///
/// # Returns
///
/// One result per requested format, in [`requested_formats`] order
pub fn export_all(
    records: &[Record],
    config: &OutputConfig,
    stem: &str,
) -> Vec<(ExportFormat, OutputResult<PathBuf>)> {
    requested_formats(config)
        .into_iter()
        .map(|format| {
            let exporter = exporter_for(format);
            let result = export_records(exporter.as_ref(), records, &config.directory, stem);
            (format, result)
        })
        .collect()
}
