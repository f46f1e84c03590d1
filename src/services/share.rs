use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::services::export::ExportArtifact;

/// Hands a finished export to the user.
pub trait Sharer {
    fn share(&self, artifact: &ExportArtifact) -> Result<()>;
}

/// Platform share sheet, supplied by the host as a callback.
pub struct NativeShare<F> {
    handler: F,
}

impl<F> NativeShare<F>
where
    F: Fn(&ExportArtifact) -> Result<()>,
{
    pub fn new(handler: F) -> Self {
        Self { handler }
    }
}

impl<F> Sharer for NativeShare<F>
where
    F: Fn(&ExportArtifact) -> Result<()>,
{
    fn share(&self, artifact: &ExportArtifact) -> Result<()> {
        (self.handler)(artifact)
    }
}

/// Plain download: writes the artifact into a directory under its own name.
#[derive(Debug, Clone)]
pub struct DownloadFallback {
    dir: PathBuf,
}

impl DownloadFallback {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Sharer for DownloadFallback {
    fn share(&self, artifact: &ExportArtifact) -> Result<()> {
        let path = self.dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.bytes)
            .map_err(|e| AppError::ShareFailure(format!("{}: {}", path.display(), e)))?;
        tracing::info!("Saved {} ({})", path.display(), artifact.mime_type());
        Ok(())
    }
}

/// Tries the native sharer when there is one and falls back to the download
/// path if it is missing or fails.
pub fn deliver(
    artifact: &ExportArtifact,
    native: Option<&dyn Sharer>,
    fallback: &dyn Sharer,
) -> Result<()> {
    if let Some(native) = native {
        match native.share(artifact) {
            Ok(()) => return Ok(()),
            Err(e) => tracing::warn!(
                "Error sharing {}: {}, falling back to download",
                artifact.file_name,
                e
            ),
        }
    }
    fallback.share(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::export::ExportFormat;
    use std::cell::Cell;

    fn artifact() -> ExportArtifact {
        ExportArtifact::new("export.csv", ExportFormat::Csv, "Name\r\nAnn")
    }

    #[test]
    fn native_share_wins_when_it_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Cell::new(0);
        let native = NativeShare::new(|_: &ExportArtifact| {
            calls.set(calls.get() + 1);
            Ok(())
        });

        let fallback = DownloadFallback::new(dir.path());
        deliver(&artifact(), Some(&native as &dyn Sharer), &fallback).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(!dir.path().join("export.csv").exists());
    }

    #[test]
    fn failed_native_share_falls_back_to_download() {
        let dir = tempfile::tempdir().unwrap();
        let native = NativeShare::new(|_: &ExportArtifact| {
            Err(AppError::ShareFailure("no share sheet".to_string()))
        });

        let fallback = DownloadFallback::new(dir.path());
        deliver(&artifact(), Some(&native as &dyn Sharer), &fallback).unwrap();
        let written = std::fs::read_to_string(dir.path().join("export.csv")).unwrap();
        assert_eq!(written, "Name\r\nAnn");
    }

    #[test]
    fn download_into_missing_dir_is_a_share_failure() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = DownloadFallback::new(dir.path().join("absent"));
        assert!(matches!(deliver(&artifact(), None, &fallback), Err(AppError::ShareFailure(_))));
    }
}
