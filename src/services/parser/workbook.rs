use std::fmt::Display;
use std::io::Cursor;

use bytes::Bytes;
use calamine::{open_workbook_from_rs, Data, Ods, Range, Reader, Xls, Xlsx};

use super::utils::{build_dataset, cell_to_string, is_empty_cell};
use super::SourceFormat;
use crate::error::{AppError, Result};
use crate::models::TabularDataset;

fn first_sheet<R>(cursor: Cursor<Bytes>) -> Result<Range<Data>>
where
    R: Reader<Cursor<Bytes>>,
    R::Error: Display,
{
    let mut workbook: R = open_workbook_from_rs(cursor)
        .map_err(|e| AppError::ReadFailure(format!("Failed to open workbook: {}", e)))?;

    let sheet_names = workbook.sheet_names();
    tracing::debug!("Found {} sheets: {:?}", sheet_names.len(), sheet_names);

    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(AppError::ReadFailure(format!("Failed to read worksheet: {}", e))),
        None => Err(AppError::EmptySource("No worksheets found in the file".to_string())),
    }
}

/// Reads the first sheet of an xlsx/xls/ods workbook.
pub fn parse_workbook(
    bytes: Bytes,
    format: SourceFormat,
    source_name: &str,
) -> Result<TabularDataset> {
    let cursor = Cursor::new(bytes);
    let range = match format {
        SourceFormat::Xlsx => first_sheet::<Xlsx<_>>(cursor)?,
        SourceFormat::Xls => first_sheet::<Xls<_>>(cursor)?,
        SourceFormat::Ods => first_sheet::<Ods<_>>(cursor)?,
        SourceFormat::Csv => {
            return Err(AppError::UnsupportedFormat("csv is not a workbook format".to_string()))
        }
    };

    let mut rows = range.rows();
    let header_cells: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(cell_to_string).collect(),
        None => return Err(AppError::EmptySource("Worksheet is empty".to_string())),
    };

    let raw_rows: Vec<Vec<String>> = rows
        .filter(|row| row.iter().any(|cell| !is_empty_cell(cell)))
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    tracing::debug!(
        "Worksheet of {} has {} columns and {} non-empty data rows",
        source_name,
        header_cells.len(),
        raw_rows.len()
    );

    build_dataset(source_name, &header_cells, raw_rows)
}
