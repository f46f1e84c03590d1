use csv::ReaderBuilder;

use super::utils::build_dataset;
use crate::error::{AppError, Result};
use crate::models::TabularDataset;

const UTF8_BOM: char = '\u{feff}';

fn read_error(err: csv::Error) -> AppError {
    AppError::ReadFailure(format!("CSV parsing error: {}", err))
}

pub fn parse_csv(bytes: &[u8], source_name: &str) -> Result<TabularDataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    // textually empty lines never reach here, the reader skips them
    let mut records = reader.records();

    let header_cells: Vec<String> = match records.next() {
        Some(record) => record
            .map_err(read_error)?
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                if idx == 0 {
                    cell.trim_start_matches(UTF8_BOM).to_string()
                } else {
                    cell.to_string()
                }
            })
            .collect(),
        None => return Err(AppError::EmptySource("CSV file is empty".to_string())),
    };

    let raw_rows = records
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect::<Vec<_>>())
                .map_err(read_error)
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(
        "CSV {} has {} columns and {} data records",
        source_name,
        header_cells.len(),
        raw_rows.len()
    );

    build_dataset(source_name, &header_cells, raw_rows)
}
