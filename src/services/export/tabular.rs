use csv::{Terminator, WriterBuilder};
use serde::Serialize;

use super::{ExportArtifact, ExportFormat, ExportRecord};
use crate::error::{AppError, Result};

const CRLF: &str = "\r\n";

/// CSV text with a header row taken from the first record's keys. Rows are
/// CRLF separated with no trailing line break; no records yields `""`.
pub fn records_to_csv<R: ExportRecord>(records: &[R]) -> Result<String> {
    let Some(first) = records.first() else {
        return Ok(String::new());
    };
    let keys = first.keys();

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());

    writer.write_record(&keys)?;
    for record in records {
        writer.write_record(keys.iter().map(|key| record.value(key).unwrap_or_default()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::SerializationFailure(format!("Failed to flush CSV: {}", e)))?;
    let mut text = String::from_utf8(bytes)
        .map_err(|e| AppError::SerializationFailure(e.to_string()))?;

    if text.ends_with(CRLF) {
        text.truncate(text.len() - CRLF.len());
    }
    Ok(text)
}

/// Pretty JSON with two-space indentation.
pub fn to_json_text<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn export_csv<R: ExportRecord>(records: &[R], file_name: &str) -> Result<ExportArtifact> {
    let text = records_to_csv(records)?;
    tracing::info!("Exported {} records to {} ({} bytes)", records.len(), file_name, text.len());
    Ok(ExportArtifact::new(file_name, ExportFormat::Csv, text))
}

pub fn export_json<T: Serialize + ?Sized>(value: &T, file_name: &str) -> Result<ExportArtifact> {
    let text = to_json_text(value)?;
    tracing::info!("Exported JSON to {} ({} bytes)", file_name, text.len());
    Ok(ExportArtifact::new(file_name, ExportFormat::Json, text))
}
