use anyhow::{Context, Result};
use dotenvy::dotenv;

use crate::services::export::VcfVersion;

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

#[derive(Debug, Clone)]
pub struct Config {
    pub max_file_size: usize,
    pub log_filter: String,
    pub vcf_version: VcfVersion,
    pub export_basename: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_file_size: default_max_file_size(),
            log_filter: "info".to_string(),
            vcf_version: VcfVersion::default(),
            export_basename: "export".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `lookup`; keys it returns `None` for keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(raw) = lookup("SHEET_CONTACTS_MAX_FILE_SIZE") {
            config.max_file_size = raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid SHEET_CONTACTS_MAX_FILE_SIZE: {}", raw))?;
        }
        if let Some(filter) = lookup("SHEET_CONTACTS_LOG") {
            config.log_filter = filter;
        }
        if let Some(raw) = lookup("SHEET_CONTACTS_VCF_VERSION") {
            config.vcf_version = raw
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid SHEET_CONTACTS_VCF_VERSION: {}", e))?;
        }
        if let Some(basename) = lookup("SHEET_CONTACTS_EXPORT_BASENAME") {
            if basename.trim().is_empty() {
                anyhow::bail!("SHEET_CONTACTS_EXPORT_BASENAME must not be empty");
            }
            config.export_basename = basename;
        }

        Ok(config)
    }

    /// File name for an export of `extension` using the configured basename.
    pub fn export_file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.export_basename, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(
        vars: &'a [(&'a str, &'a str)],
    ) -> impl Fn(&str) -> Option<String> + 'a {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key: &str| vars.get(key).map(|v| v.to_string())
    }

    #[test]
    fn defaults_match_upload_limits() {
        let config = Config::default();
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.vcf_version, VcfVersion::V3_0);
        assert_eq!(config.export_file_name("csv"), "export.csv");
    }

    #[test]
    fn unset_variables_keep_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.max_file_size, default_max_file_size());
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.vcf_version, VcfVersion::V3_0);
        assert_eq!(config.export_basename, "export");
    }

    #[test]
    fn every_variable_can_be_overridden() {
        let config = Config::from_lookup(lookup_from(&[
            ("SHEET_CONTACTS_MAX_FILE_SIZE", " 2048 "),
            ("SHEET_CONTACTS_LOG", "sheet_contacts=debug"),
            ("SHEET_CONTACTS_VCF_VERSION", "2.1"),
            ("SHEET_CONTACTS_EXPORT_BASENAME", "roster"),
        ]))
        .unwrap();
        assert_eq!(config.max_file_size, 2048);
        assert_eq!(config.log_filter, "sheet_contacts=debug");
        assert_eq!(config.vcf_version, VcfVersion::V2_1);
        assert_eq!(config.export_file_name("xlsx"), "roster.xlsx");
    }

    #[test]
    fn non_numeric_max_file_size_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("SHEET_CONTACTS_MAX_FILE_SIZE", "10MB")]))
            .unwrap_err();
        assert!(err.to_string().contains("SHEET_CONTACTS_MAX_FILE_SIZE"));
    }

    #[test]
    fn unknown_vcf_version_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("SHEET_CONTACTS_VCF_VERSION", "4.0")]))
            .unwrap_err();
        assert!(err.to_string().contains("4.0"));
    }

    #[test]
    fn blank_export_basename_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("SHEET_CONTACTS_EXPORT_BASENAME", "  ")]))
            .unwrap_err();
        assert!(err.to_string().contains("SHEET_CONTACTS_EXPORT_BASENAME"));
    }
}
