pub mod tabular;
pub mod vcf;
pub mod xlsx;

use bytes::Bytes;

use crate::models::{ContactRecord, RowRecord};

pub use tabular::{export_csv, export_json, records_to_csv, to_json_text};
pub use vcf::{export_vcf, generate_vcf, vcf_artifact, VcfVersion};
pub use xlsx::{export_xlsx, records_to_xlsx, SHEET_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
    Vcf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Vcf => "vcf",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv;charset=utf-8",
            ExportFormat::Json => "application/json;charset=utf-8",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Vcf => "text/vcard;charset=utf-8",
        }
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "export.csv",
            ExportFormat::Json => "export.json",
            ExportFormat::Xlsx => "export.xlsx",
            ExportFormat::Vcf => "contacts.vcf",
        }
    }
}

/// A finished export, ready to hand to a [`crate::services::share::Sharer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Bytes,
}

impl ExportArtifact {
    pub fn new(
        file_name: impl Into<String>,
        format: ExportFormat,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            format,
            bytes: bytes.into(),
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// The payload as UTF-8, for the text formats.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }
}

/// A flat record the tabular writers can lay out as one row.
pub trait ExportRecord {
    /// Column names, in output order.
    fn keys(&self) -> Vec<&str>;
    fn value(&self, key: &str) -> Option<&str>;
}

impl ExportRecord for RowRecord {
    fn keys(&self) -> Vec<&str> {
        self.headers().iter().map(String::as_str).collect()
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.get(key)
    }
}

impl ExportRecord for ContactRecord {
    fn keys(&self) -> Vec<&str> {
        self.fields().into_iter().map(|(key, _)| key).collect()
    }

    fn value(&self, key: &str) -> Option<&str> {
        match key {
            "name" => self.name.as_deref(),
            "phone" => self.phone.as_deref(),
            "email" => self.email.as_deref(),
            "organization" => self.organization.as_deref(),
            "address" => self.address.as_deref(),
            _ => None,
        }
    }
}
