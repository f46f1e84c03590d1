use std::collections::HashSet;
use std::sync::Arc;

use calamine::Data;

use crate::error::{AppError, Result};
use crate::models::{RowRecord, TabularDataset};

/// Lower-cased text after the last `.`; the whole name when there is none.
pub fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Raw string form of a workbook cell. Dates stay as their serial number.
pub fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::Error(e) => e.to_string(),
    }
}

pub fn is_empty_cell(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

pub fn unique_header_name(name: &str, existing_names: &mut HashSet<String>) -> String {
    let mut unique = name.to_string();

    // If the name already exists, add a numeric suffix
    let mut counter = 1;
    while !existing_names.insert(unique.clone()) {
        unique = format!("{}_{}", name, counter);
        counter += 1;
    }

    unique
}

/// Turns the raw header cells and data rows of either source kind into a
/// dataset. Blank header cells drop their column; every other column keeps
/// its source position.
pub fn build_dataset<I>(
    source_name: &str,
    header_cells: &[String],
    raw_rows: I,
) -> Result<TabularDataset>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut existing_names = HashSet::new();
    let columns: Vec<(usize, String)> = header_cells
        .iter()
        .enumerate()
        .filter(|(_, cell)| !cell.trim().is_empty())
        .map(|(idx, cell)| (idx, unique_header_name(cell, &mut existing_names)))
        .collect();

    if columns.is_empty() {
        return Err(AppError::MissingHeader);
    }

    let headers: Arc<[String]> = columns.iter().map(|(_, name)| name.clone()).collect();

    let rows: Vec<RowRecord> = raw_rows
        .into_iter()
        .map(|mut raw| {
            let values = columns
                .iter()
                .map(|(idx, _)| raw.get_mut(*idx).map(std::mem::take).unwrap_or_default())
                .collect();
            RowRecord::new(headers.clone(), values)
        })
        .collect();

    if rows.is_empty() {
        return Err(AppError::EmptySource(format!("{} has no data rows", source_name)));
    }

    Ok(TabularDataset::new(source_name.to_string(), headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn extension_is_lower_cased_last_segment() {
        assert_eq!(file_extension("People.Final.XLSX"), "xlsx");
        assert_eq!(file_extension("data.csv"), "csv");
        assert_eq!(file_extension("README"), "readme");
    }

    #[test]
    fn numeric_cells_use_shortest_form() {
        assert_eq!(cell_to_string(&Data::Float(42.0)), "42");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_to_string(&Data::Int(-7)), "-7");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn duplicate_headers_get_numeric_suffix() {
        let mut existing = HashSet::new();
        assert_eq!(unique_header_name("Name", &mut existing), "Name");
        assert_eq!(unique_header_name("Name", &mut existing), "Name_1");
        assert_eq!(unique_header_name("Name", &mut existing), "Name_2");
    }

    #[test]
    fn blank_headers_drop_their_column_only() {
        let dataset = build_dataset(
            "t.csv",
            &strings(&["A", " ", "C"]),
            vec![strings(&["1", "2", "3"]), strings(&["4"])],
        )
        .unwrap();
        assert_eq!(dataset.headers(), &strings(&["A", "C"])[..]);
        assert_eq!(dataset.rows()[0].values(), &strings(&["1", "3"])[..]);
        assert_eq!(dataset.rows()[1].values(), &strings(&["4", ""])[..]);
        assert_eq!(dataset.total_rows(), 2);
    }

    #[test]
    fn all_blank_header_is_rejected() {
        let err = build_dataset("t.csv", &strings(&["", "  "]), vec![strings(&["x"])]).unwrap_err();
        assert!(matches!(err, AppError::MissingHeader));
    }

    #[test]
    fn header_without_rows_is_empty_source() {
        let err = build_dataset("t.csv", &strings(&["A"]), Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::EmptySource(_)));
    }
}
