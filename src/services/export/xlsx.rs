use rust_xlsxwriter::Workbook;

use super::{ExportArtifact, ExportFormat, ExportRecord};
use crate::error::{AppError, Result};

pub const SHEET_NAME: &str = "Sheet1";

fn column_index(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| {
        AppError::SerializationFailure(format!("Column {} is beyond the sheet width", col))
    })
}

fn row_index(row: usize) -> Result<u32> {
    u32::try_from(row).map_err(|_| {
        AppError::SerializationFailure(format!("Row {} is beyond the sheet height", row))
    })
}

/// Single-sheet workbook: the first record's keys as row 0, one row per
/// record below. Empty values are left as blank cells.
pub fn records_to_xlsx<R: ExportRecord>(records: &[R]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    if let Some(first) = records.first() {
        let keys = first.keys();

        for (col, key) in keys.iter().enumerate() {
            worksheet.write_string(0, column_index(col)?, *key)?;
        }

        for (idx, record) in records.iter().enumerate() {
            let row = row_index(idx + 1)?;
            for (col, key) in keys.iter().enumerate() {
                match record.value(key) {
                    Some(value) if !value.is_empty() => {
                        worksheet.write_string(row, column_index(col)?, value)?;
                    }
                    _ => {}
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn export_xlsx<R: ExportRecord>(records: &[R], file_name: &str) -> Result<ExportArtifact> {
    let bytes = records_to_xlsx(records)?;
    tracing::info!(
        "Exported {} records to {} ({} bytes)",
        records.len(),
        file_name,
        bytes.len()
    );
    Ok(ExportArtifact::new(file_name, ExportFormat::Xlsx, bytes))
}
