use std::path::Path;

use bytes::Bytes;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::TabularDataset;
use crate::services::parser::parse_spreadsheet;

/// Raw bytes of an uploaded file plus the name its format is derived from.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn from_bytes(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn parse(&self) -> Result<TabularDataset> {
        parse_upload(self)
    }
}

pub fn parse_upload(upload: &Upload) -> Result<TabularDataset> {
    parse_spreadsheet(upload.bytes.clone(), &upload.file_name)
}

fn check_size(size: u64, limit: u64) -> Result<()> {
    if size > limit {
        return Err(AppError::FileTooLarge { size, limit });
    }
    Ok(())
}

/// Reads a whole file into memory, refusing anything over `max_file_size`.
pub async fn read_upload(path: impl AsRef<Path>, config: &Config) -> Result<Upload> {
    let path = path.as_ref();
    let limit = config.max_file_size as u64;

    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        tracing::error!("Failed to stat {}: {}", path.display(), e);
        AppError::ReadFailure(format!("{}: {}", path.display(), e))
    })?;
    check_size(metadata.len(), limit)?;

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        tracing::error!("Failed to read {}: {}", path.display(), e);
        AppError::ReadFailure(format!("{}: {}", path.display(), e))
    })?;
    // the file may have grown since it was stat'ed
    check_size(bytes.len() as u64, limit)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    tracing::info!("Read {} bytes from {}", bytes.len(), path.display());

    Ok(Upload::from_bytes(file_name, bytes))
}
