use std::collections::HashSet;

use smallvec::SmallVec;

use crate::models::{
    AnalysisResult, AnalysisSummary, ColumnMapping, Grouping, RowRecord, StandardField,
    TabularDataset,
};

pub const SAMPLE_SIZE: usize = 3;
pub const UNKNOWN_GROUP: &str = "Unknown";

fn value_of<'a>(row: &'a RowRecord, column: Option<&str>) -> &'a str {
    column.and_then(|c| row.get(c)).unwrap_or_default()
}

/// Rows that need review for `key`: every row whose key is blank, plus every
/// repeat of a key already seen (case-insensitive). The first occurrence of a
/// repeated key is not reported.
pub fn detect_duplicates(rows: &[RowRecord], key: &str) -> Vec<RowRecord> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|row| {
            let value = value_of(row, Some(key)).to_lowercase().trim().to_string();
            value.is_empty() || !seen.insert(value)
        })
        .cloned()
        .collect()
}

/// Buckets rows by the trimmed value of `column`; blanks go to `"Unknown"`.
pub fn group_by_column(rows: &[RowRecord], column: &str) -> Grouping {
    let mut grouping = Grouping::default();
    for row in rows {
        let key = value_of(row, Some(column)).trim();
        let key = if key.is_empty() { UNKNOWN_GROUP } else { key };
        grouping.push(key.to_string(), row.clone());
    }
    grouping
}

pub fn find_missing_data<'a, I>(rows: &[RowRecord], required_columns: I) -> Vec<RowRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let required: Vec<&str> = required_columns.into_iter().collect();
    rows.iter()
        .filter(|row| {
            required
                .iter()
                .any(|column| row.get(column).map_or(true, |v| v.trim().is_empty()))
        })
        .cloned()
        .collect()
}

pub fn find_contact_candidates(rows: &[RowRecord], mapping: &ColumnMapping) -> Vec<RowRecord> {
    let Some(name_column) = mapping.get(&StandardField::Name) else {
        return Vec::new();
    };
    let phone_column = mapping.get(&StandardField::Phone);
    let email_column = mapping.get(&StandardField::Email);

    rows.iter()
        .filter(|row| {
            !value_of(row, Some(name_column)).is_empty()
                && (!value_of(row, phone_column).is_empty()
                    || !value_of(row, email_column).is_empty())
        })
        .cloned()
        .collect()
}

/// True when the mapping could yield contacts at all, whatever the rows hold.
pub fn mapping_has_contact_info(mapping: &ColumnMapping) -> bool {
    mapping.contains(&StandardField::Name)
        && (mapping.contains(&StandardField::Phone) || mapping.contains(&StandardField::Email))
}

pub fn analyze(dataset: &TabularDataset, mapping: &ColumnMapping) -> AnalysisResult {
    let rows = dataset.rows();

    let result = AnalysisResult {
        summary: AnalysisSummary {
            total_rows: dataset.total_rows(),
            mapped_fields: mapping.len(),
            has_contact_info: mapping_has_contact_info(mapping),
        },
        duplicates: mapping
            .get(&StandardField::Name)
            .map(|column| detect_duplicates(rows, column))
            .unwrap_or_default(),
        grouping: mapping
            .get(&StandardField::School)
            .map(|column| group_by_column(rows, column))
            .unwrap_or_default(),
        missing_data: find_missing_data(rows, mapping.columns()),
        contact_candidates: find_contact_candidates(rows, mapping),
    };

    tracing::debug!(
        "Analysis of {}: {} duplicates, {} groups, {} incomplete, {} contact candidates",
        dataset.source_name(),
        result.duplicates.len(),
        result.grouping.len(),
        result.missing_data.len(),
        result.contact_candidates.len()
    );

    result
}

/// Non-empty values from the first few rows of `column`.
pub fn column_samples(dataset: &TabularDataset, column: &str) -> SmallVec<[String; SAMPLE_SIZE]> {
    dataset
        .rows()
        .iter()
        .take(SAMPLE_SIZE)
        .filter_map(|row| row.get(column))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// One-line preview of a column for the mapping screen.
pub fn column_preview(dataset: &TabularDataset, column: &str) -> String {
    let samples = column_samples(dataset, column);
    if samples.is_empty() {
        "No data".to_string()
    } else {
        samples.join(", ")
    }
}
