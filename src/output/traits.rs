//! Exporter trait and output errors
//!
//! This module defines the interface every record exporter implements and
//! the errors exporting can produce.

use crate::extract::Record;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel error: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Export file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Excel => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
            Self::Excel => "Excel",
        };
        write!(f, "{}", name)
    }
}

/// Trait for record exporters
///
/// An exporter writes the flattened records of a run to a single file.
/// Absent values are written as empty cells or nulls, never dropped.
pub trait Exporter {
    /// The format this exporter writes
    fn format(&self) -> ExportFormat;

    /// Writes all records to `path`, replacing any existing file
    ///
    /// # Arguments
    ///
    /// * `records` - Records in crawl order
    /// * `path` - Destination file; its directory must exist
    fn write_records(&self, records: &[Record], path: &Path) -> OutputResult<()>;
}
