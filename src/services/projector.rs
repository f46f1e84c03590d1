use crate::models::{ColumnMapping, ContactRecord, RowRecord, StandardField};

fn mapped_value(row: &RowRecord, mapping: &ColumnMapping, field: &StandardField) -> Option<String> {
    mapping
        .get(field)
        .map(|column| row.get(column).unwrap_or_default().to_string())
}

/// Copies mapped columns verbatim into contact records. Rows whose mapped
/// name is empty are skipped; with no name mapping nothing survives.
pub fn project_contacts(rows: &[RowRecord], mapping: &ColumnMapping) -> Vec<ContactRecord> {
    let Some(name_column) = mapping.get(&StandardField::Name) else {
        return Vec::new();
    };

    rows.iter()
        .filter(|row| row.get(name_column).is_some_and(|name| !name.is_empty()))
        .map(|row| ContactRecord {
            name: mapped_value(row, mapping, &StandardField::Name),
            phone: mapped_value(row, mapping, &StandardField::Phone),
            email: mapped_value(row, mapping, &StandardField::Email),
            organization: mapped_value(row, mapping, &StandardField::School),
            address: mapped_value(row, mapping, &StandardField::Address),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::parser::csv_reader::parse_csv;

    #[test]
    fn mapped_fields_are_copied_verbatim() {
        let data = parse_csv(
            b"Full Name,Mobile,School,Notes\n  Jane Doe ,555-1234,Hill High,x\n,556,,\n",
            "c.csv",
        )
        .unwrap();
        let mapping: ColumnMapping = [
            (StandardField::Name, "Full Name"),
            (StandardField::Phone, "Mobile"),
            (StandardField::School, "School"),
        ]
        .into_iter()
        .collect();

        let contacts = project_contacts(data.rows(), &mapping);
        assert_eq!(
            contacts,
            vec![ContactRecord {
                name: Some("  Jane Doe ".to_string()),
                phone: Some("555-1234".to_string()),
                email: None,
                organization: Some("Hill High".to_string()),
                address: None,
            }]
        );
    }

    #[test]
    fn no_name_mapping_projects_nothing() {
        let data = parse_csv(b"P\n555\n", "c.csv").unwrap();
        let mapping: ColumnMapping = [(StandardField::Phone, "P")].into_iter().collect();
        assert!(project_contacts(data.rows(), &mapping).is_empty());
    }
}
