pub mod csv_reader;
pub mod utils;
pub mod workbook;

use std::str::FromStr;
use std::time::Instant;

use bytes::Bytes;

use crate::error::{AppError, Result};
use crate::models::TabularDataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
    Xls,
    Ods,
}

impl FromStr for SourceFormat {
    type Err = AppError;

    fn from_str(extension: &str) -> Result<Self> {
        match extension.to_lowercase().as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" => Ok(SourceFormat::Xlsx),
            "xls" => Ok(SourceFormat::Xls),
            "ods" => Ok(SourceFormat::Ods),
            other => Err(AppError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Parses a whole upload. The format comes from the extension of `file_name`.
pub fn parse_spreadsheet(bytes: impl Into<Bytes>, file_name: &str) -> Result<TabularDataset> {
    let start = Instant::now();
    let extension = utils::file_extension(file_name);
    tracing::info!("Parsing file: {} Extension: {}", file_name, extension);

    let format: SourceFormat = extension.parse()?;
    let bytes = bytes.into();

    let parsed = match format {
        SourceFormat::Csv => csv_reader::parse_csv(&bytes, file_name),
        _ => workbook::parse_workbook(bytes, format, file_name),
    };

    match &parsed {
        Ok(dataset) => tracing::info!(
            "Parsed {} rows x {} columns from {} in {:?}",
            dataset.total_rows(),
            dataset.headers().len(),
            file_name,
            start.elapsed()
        ),
        Err(e) => tracing::error!("Failed to parse {}: {}", file_name, e),
    }

    parsed
}
