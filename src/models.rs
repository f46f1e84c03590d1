use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeStruct, Serializer};
use serde::Serialize;

use crate::error::{AppError, Result};

/// One data row. Holds a value for every header of the dataset it came from,
/// in header order; absent cells are stored as `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRecord {
    headers: Arc<[String]>,
    values: Vec<String>,
}

impl RowRecord {
    pub(crate) fn new(headers: Arc<[String]>, mut values: Vec<String>) -> Self {
        values.resize(headers.len(), String::new());
        Self { headers, values }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.headers
            .iter()
            .position(|h| h == header)
            .map(|idx| self.values[idx].as_str())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(header, value)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

impl Serialize for RowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (header, value) in self.iter() {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

/// Headers plus rows of the first sheet (or the CSV body) of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularDataset {
    headers: Arc<[String]>,
    rows: Vec<RowRecord>,
    source_name: String,
}

impl TabularDataset {
    pub(crate) fn new(source_name: String, headers: Arc<[String]>, rows: Vec<RowRecord>) -> Self {
        Self { headers, rows, source_name }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn has_header(&self, header: &str) -> bool {
        self.headers.iter().any(|h| h == header)
    }
}

impl Serialize for TabularDataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TabularDataset", 4)?;
        state.serialize_field("headers", &*self.headers)?;
        state.serialize_field("rows", &self.rows)?;
        state.serialize_field("totalRows", &self.total_rows())?;
        state.serialize_field("sourceName", &self.source_name)?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardField {
    Name,
    Phone,
    Email,
    School,
    Address,
    Custom(String),
}

impl StandardField {
    /// The built-in fields offered for mapping, in display order.
    pub fn standard() -> [StandardField; 5] {
        [
            StandardField::Name,
            StandardField::Phone,
            StandardField::Email,
            StandardField::School,
            StandardField::Address,
        ]
    }

    pub fn key(&self) -> &str {
        match self {
            StandardField::Name => "name",
            StandardField::Phone => "phone",
            StandardField::Email => "email",
            StandardField::School => "school",
            StandardField::Address => "address",
            StandardField::Custom(key) => key,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StandardField::Name => "Name",
            StandardField::Phone => "Phone",
            StandardField::Email => "Email",
            StandardField::School => "School/Organization",
            StandardField::Address => "Address",
            StandardField::Custom(key) => key,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, StandardField::Name)
    }
}

impl fmt::Display for StandardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StandardField {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "name" => StandardField::Name,
            "phone" => StandardField::Phone,
            "email" => StandardField::Email,
            "school" => StandardField::School,
            "address" => StandardField::Address,
            other => StandardField::Custom(other.to_string()),
        })
    }
}

/// Standard field -> source column. At most one column per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    entries: BTreeMap<StandardField, String>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `field` to `header` without checking it against a dataset.
    /// Returns the column previously mapped to `field`, if any.
    pub fn map(&mut self, field: StandardField, header: impl Into<String>) -> Option<String> {
        self.entries.insert(field, header.into())
    }

    /// Maps `field` to `header` after checking that `dataset` has that column.
    pub fn assign(
        &mut self,
        field: StandardField,
        header: &str,
        dataset: &TabularDataset,
    ) -> Result<()> {
        if !dataset.has_header(header) {
            return Err(AppError::UnknownColumn(header.to_string()));
        }
        self.map(field, header);
        Ok(())
    }

    pub fn unmap(&mut self, field: &StandardField) -> Option<String> {
        self.entries.remove(field)
    }

    pub fn get(&self, field: &StandardField) -> Option<&str> {
        self.entries.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &StandardField) -> bool {
        self.entries.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every mapped column, one per mapped field.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StandardField, &str)> {
        self.entries.iter().map(|(field, header)| (field, header.as_str()))
    }

    /// Checks every mapped column against `dataset`.
    pub fn validate(&self, dataset: &TabularDataset) -> Result<()> {
        match self.columns().find(|header| !dataset.has_header(header)) {
            Some(header) => Err(AppError::UnknownColumn(header.to_string())),
            None => Ok(()),
        }
    }
}

impl<S: Into<String>> FromIterator<(StandardField, S)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (StandardField, S)>>(iter: I) -> Self {
        let mut mapping = ColumnMapping::new();
        for (field, header) in iter {
            mapping.map(field, header);
        }
        mapping
    }
}

impl Serialize for ColumnMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, header) in &self.entries {
            map.serialize_entry(field.key(), header)?;
        }
        map.end()
    }
}

/// Rows bucketed by a trimmed key, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    groups: Vec<(String, Vec<RowRecord>)>,
    index: HashMap<String, usize>,
}

impl Grouping {
    pub(crate) fn push(&mut self, key: String, row: RowRecord) {
        match self.index.get(&key) {
            Some(&idx) => self.groups[idx].1.push(row),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![row]));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&[RowRecord]> {
        self.index.get(key).map(|&idx| self.groups[idx].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[RowRecord])> {
        self.groups
            .iter()
            .map(|(key, rows)| (key.as_str(), rows.as_slice()))
    }

    /// Largest groups first; ties keep first-seen order.
    pub fn by_size_desc(&self) -> Vec<(&str, &[RowRecord])> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.len().cmp(&a.1.len()));
        sorted
    }
}

impl Serialize for Grouping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (key, rows) in &self.groups {
            map.serialize_entry(key, rows)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_rows: usize,
    pub mapped_fields: usize,
    pub has_contact_info: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: AnalysisSummary,
    pub duplicates: Vec<RowRecord>,
    pub grouping: Grouping,
    pub missing_data: Vec<RowRecord>,
    pub contact_candidates: Vec<RowRecord>,
}

impl AnalysisResult {
    pub fn contact_percentage(&self) -> f64 {
        self.percentage_of_total(self.contact_candidates.len())
    }

    pub fn duplicate_percentage(&self) -> f64 {
        self.percentage_of_total(self.duplicates.len())
    }

    pub fn missing_percentage(&self) -> f64 {
        self.percentage_of_total(self.missing_data.len())
    }

    fn percentage_of_total(&self, count: usize) -> f64 {
        if self.summary.total_rows == 0 {
            return 0.0;
        }
        count as f64 / self.summary.total_rows as f64 * 100.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl ContactRecord {
    /// Present fields as `(key, value)` in a fixed order.
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("phone", &self.phone),
            ("email", &self.email),
            ("organization", &self.organization),
            ("address", &self.address),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> TabularDataset {
        let headers: Arc<[String]> = vec!["N".to_string(), "P".to_string()].into();
        let rows = vec![RowRecord::new(headers.clone(), vec!["Ann".to_string()])];
        TabularDataset::new("people.csv".to_string(), headers, rows)
    }

    #[test]
    fn short_rows_are_padded_with_empty_strings() {
        let data = dataset();
        let row = &data.rows()[0];
        assert_eq!(row.len(), data.headers().len());
        assert_eq!(row.get("P"), Some(""));
        assert_eq!(row.get("missing"), None);
    }

    #[test]
    fn assign_rejects_unknown_columns_and_remap_replaces() {
        let data = dataset();
        let mut mapping = ColumnMapping::new();
        assert!(matches!(
            mapping.assign(StandardField::Name, "Nope", &data),
            Err(AppError::UnknownColumn(col)) if col == "Nope"
        ));
        mapping.assign(StandardField::Name, "N", &data).unwrap();
        mapping.assign(StandardField::Name, "P", &data).unwrap();
        assert_eq!(mapping.get(&StandardField::Name), Some("P"));
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.unmap(&StandardField::Name), Some("P".to_string()));
        assert!(mapping.is_empty());
    }

    #[test]
    fn field_keys_round_trip_through_from_str() {
        for field in StandardField::standard() {
            assert_eq!(field.key().parse::<StandardField>().unwrap(), field);
        }
        assert_eq!(
            "nickname".parse::<StandardField>().unwrap(),
            StandardField::Custom("nickname".to_string())
        );
        assert_eq!(StandardField::School.label(), "School/Organization");
        assert!(StandardField::Name.is_required());
        assert!(!StandardField::Email.is_required());
    }

    #[test]
    fn dataset_serializes_with_camel_case_keys_and_ordered_rows() {
        let json = serde_json::to_string(&dataset()).unwrap();
        let expected = concat!(
            r#"{"headers":["N","P"],"rows":[{"N":"Ann","P":""}],"#,
            r#""totalRows":1,"sourceName":"people.csv"}"#
        );
        assert_eq!(json, expected);
    }

    #[test]
    fn mapping_serializes_by_field_key() {
        let mapping: ColumnMapping =
            [(StandardField::Phone, "P"), (StandardField::Name, "N")].into_iter().collect();
        assert_eq!(serde_json::to_string(&mapping).unwrap(), r#"{"name":"N","phone":"P"}"#);
    }

    #[test]
    fn grouping_sorts_by_size_keeping_ties_stable() {
        let data = dataset();
        let row = data.rows()[0].clone();
        let mut grouping = Grouping::default();
        grouping.push("A".to_string(), row.clone());
        grouping.push("B".to_string(), row.clone());
        grouping.push("B".to_string(), row.clone());
        grouping.push("C".to_string(), row);
        let order: Vec<&str> = grouping.by_size_desc().into_iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
        assert_eq!(grouping.keys().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }
}
