use std::fmt;
use std::str::FromStr;

use super::{ExportArtifact, ExportFormat};
use crate::error::{AppError, Result};
use crate::models::{ColumnMapping, ContactRecord, RowRecord, StandardField};
use crate::services::projector::project_contacts;

const CHARSET: &str = ";CHARSET=UTF-8";
const LINE_END: &str = "\r\n";
const HOME_ADDRESS_LABEL: &str = "Home Address";

/// vCard flavor written by [`generate_vcf`]. 3.0 is the default; 2.1-style
/// blocks have to be chosen explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VcfVersion {
    V2_1,
    #[default]
    V3_0,
}

impl VcfVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            VcfVersion::V2_1 => "2.1",
            VcfVersion::V3_0 => "3.0",
        }
    }

    /// Property parameters: bare in 2.1, `TYPE=` in 3.0.
    fn type_param(&self, types: &str) -> String {
        match self {
            VcfVersion::V2_1 => types.replace(',', ";"),
            VcfVersion::V3_0 => format!("TYPE={}", types),
        }
    }
}

impl fmt::Display for VcfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VcfVersion {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "2.1" => Ok(VcfVersion::V2_1),
            "3.0" | "3" => Ok(VcfVersion::V3_0),
            other => Err(format!("unsupported vCard version '{}'", other)),
        }
    }
}

fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace(',', "\\,")
        .replace(';', "\\;")
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// First whitespace-separated token, and the rest joined by single spaces.
fn split_name(name: &str) -> (String, String) {
    let mut parts = name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}

fn vcard_block(contact: &ContactRecord, version: VcfVersion) -> String {
    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        format!("VERSION:{}", version.as_str()),
    ];

    if let Some(name) = present(&contact.name) {
        let (first, last) = split_name(name);
        let formatted = [first.as_str(), last.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(format!("FN{}:{}", CHARSET, escape(&formatted)));
        lines.push(format!("N{}:{};{};;;", CHARSET, escape(&last), escape(&first)));
    }

    if let Some(email) = present(&contact.email) {
        lines.push(format!(
            "EMAIL{};{}:{}",
            CHARSET,
            version.type_param("HOME,INTERNET"),
            escape(email)
        ));
    }

    if let Some(phone) = present(&contact.phone) {
        lines.push(format!("TEL;{}:{}", version.type_param("CELL"), escape(phone)));
    }

    if let Some(address) = present(&contact.address) {
        let home = version.type_param("HOME");
        lines.push(format!("LABEL{};{}:{}", CHARSET, home, HOME_ADDRESS_LABEL));
        lines.push(format!("ADR{};{}:;;{};;;;", CHARSET, home, escape(address)));
    }

    if let Some(organization) = present(&contact.organization) {
        lines.push(format!("ORG{}:{}", CHARSET, escape(organization)));
    }

    lines.push("END:VCARD".to_string());

    let mut block = lines.join(LINE_END);
    block.push_str(LINE_END);
    block
}

/// One vCard block per contact, in input order, separated by `\n`.
pub fn generate_vcf(contacts: &[ContactRecord], version: VcfVersion) -> String {
    contacts
        .iter()
        .map(|contact| vcard_block(contact, version))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn vcf_artifact(vcf_text: String, file_name: &str) -> ExportArtifact {
    ExportArtifact::new(file_name, ExportFormat::Vcf, vcf_text)
}

/// Projects `rows` through `mapping` and renders the surviving contacts.
pub fn export_vcf(
    rows: &[RowRecord],
    mapping: &ColumnMapping,
    version: VcfVersion,
    file_name: &str,
) -> Result<ExportArtifact> {
    if !mapping.contains(&StandardField::Name) {
        return Err(AppError::NoNameMapped);
    }

    let contacts = project_contacts(rows, mapping);
    if contacts.is_empty() {
        return Err(AppError::NoContactsFound);
    }

    let text = generate_vcf(&contacts, version);
    tracing::info!("{} contacts exported to VCF format", contacts.len());
    Ok(vcf_artifact(text, file_name))
}
