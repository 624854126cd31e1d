//! Record exporters
//!
//! Every run writes a CSV file; JSON and Excel are opt-in. All files of a run
//! share one timestamped stem, `scraped_YYYYMMDD_HHMMSS`.

use crate::extract::Record;
use crate::output::traits::{ExportFormat, Exporter, OutputResult};
use chrono::{DateTime, Local};
use rust_xlsxwriter::{Format, Workbook};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Builds the file stem shared by all exports of a run
pub fn export_stem(now: DateTime<Local>) -> String {
    format!("scraped_{}", now.format("%Y%m%d_%H%M%S"))
}

/// Writes records as CSV with a header row
///
/// Columns: `name,price,category,description,availability,rating,link`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn write_records(&self, records: &[Record], path: &Path) -> OutputResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        if records.is_empty() {
            writer.write_record(CSV_HEADER)?;
        }
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Column order of the CSV export, matching the field order of [`Record`]
const CSV_HEADER: [&str; 7] = [
    "name",
    "price",
    "category",
    "description",
    "availability",
    "rating",
    "link",
];

/// Writes records as a pretty-printed JSON array
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn write_records(&self, records: &[Record], path: &Path) -> OutputResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Writes records to a single-sheet xlsx workbook
///
/// Same columns as the CSV export. Prices are numeric cells; absent values
/// are left as empty cells.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExcelExporter;

impl Exporter for ExcelExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Excel
    }

    fn write_records(&self, records: &[Record], path: &Path) -> OutputResult<()> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        let bold = Format::new().set_bold();

        for (col, title) in CSV_HEADER.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &bold)?;
        }

        for (index, record) in records.iter().enumerate() {
            let row = index as u32 + 1;
            sheet.write_string(row, 0, &record.name)?;
            if let Some(price) = record.price {
                sheet.write_number(row, 1, price)?;
            }
            sheet.write_string(row, 2, &record.category)?;
            sheet.write_string(row, 3, &record.description)?;
            sheet.write_string(row, 4, &record.availability)?;
            if let Some(rating) = &record.rating {
                sheet.write_string(row, 5, rating)?;
            }
            sheet.write_string(row, 6, &record.link)?;
        }

        workbook.save(path)?;
        Ok(())
    }
}

/// Returns the exporter for a format
pub fn exporter_for(format: ExportFormat) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Csv => Box::new(CsvExporter),
        ExportFormat::Json => Box::new(JsonExporter),
        ExportFormat::Excel => Box::new(ExcelExporter),
    }
}

/// Writes records to `<directory>/<stem>.<ext>`
///
/// The directory is created if missing.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(OutputError)` - The directory or file could not be written
pub fn export_records(
    exporter: &dyn Exporter,
    records: &[Record],
    directory: &Path,
    stem: &str,
) -> OutputResult<PathBuf> {
    std::fs::create_dir_all(directory)?;

    let path = directory.join(format!("{}.{}", stem, exporter.format().extension()));
    exporter.write_records(records, &path)?;

    tracing::info!(
        "{} export: {} records -> {}",
        exporter.format(),
        records.len(),
        path.display()
    );
    Ok(path)
}
