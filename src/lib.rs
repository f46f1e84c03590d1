//! Spreadsheet-to-contacts pipeline: parse an uploaded CSV or workbook, map
//! its columns onto contact fields, analyze the rows for duplicates, groups
//! and gaps, then export as CSV, JSON, XLSX or vCard.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
pub use models::{
    AnalysisResult, AnalysisSummary, ColumnMapping, ContactRecord, Grouping, RowRecord,
    StandardField, TabularDataset,
};
pub use services::analyzer::{analyze, column_preview};
pub use services::export::{
    export_csv, export_json, export_vcf, export_xlsx, generate_vcf, vcf_artifact, ExportArtifact,
    ExportFormat, ExportRecord, VcfVersion,
};
pub use services::loader::{parse_upload, read_upload, Upload};
pub use services::parser::{parse_spreadsheet, SourceFormat};
pub use services::projector::project_contacts;
pub use services::share::{deliver, DownloadFallback, NativeShare, Sharer};
