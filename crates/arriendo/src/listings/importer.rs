//! Bulk portfolio import. Landlords managing whole buildings upload a CSV
//! export instead of keying listings one by one; each row becomes a
//! validated draft ready for [`super::service::ListingService::publish`].

use std::io::Read;

use serde::Deserialize;

use super::domain::{ListingDraft, ListingError, Typology};

#[derive(Debug, Deserialize)]
struct PortfolioRow {
    #[serde(rename = "Building")]
    building: String,
    #[serde(rename = "Unit")]
    unit: String,
    #[serde(rename = "Bedrooms")]
    bedrooms: u8,
    #[serde(rename = "Bathrooms")]
    bathrooms: u8,
    #[serde(rename = "Monthly Rent")]
    monthly_rent: f64,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Photo Folder", default, deserialize_with = "empty_string_as_none")]
    photo_folder_id: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|raw| !raw.trim().is_empty()))
}

impl PortfolioRow {
    fn into_draft(self) -> ListingDraft {
        ListingDraft {
            building: self.building,
            unit: self.unit,
            typology: Typology {
                bedrooms: self.bedrooms,
                bathrooms: self.bathrooms,
            },
            monthly_rent: self.monthly_rent,
            description: self.description,
            photo_folder_id: self.photo_folder_id,
        }
    }
}

/// Parses a portfolio CSV into validated drafts. The whole import fails on
/// the first bad row so a landlord never ends up with half a building
/// published.
pub fn import_portfolio<R: Read>(reader: R) -> Result<Vec<ListingDraft>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut drafts = Vec::new();
    for (index, record) in csv_reader.deserialize::<PortfolioRow>().enumerate() {
        // Header occupies line 1.
        let line = index + 2;
        let row = record?;
        let draft = row.into_draft();
        draft
            .validate()
            .map_err(|source| ImportError::Row { line, source })?;
        drafts.push(draft);
    }

    Ok(drafts)
}

/// Failure modes for a portfolio import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("portfolio CSV is malformed: {0}")]
    Csv(#[from] csv::Error),
    #[error("portfolio CSV line {line}: {source}")]
    Row { line: usize, source: ListingError },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Building,Unit,Bedrooms,Bathrooms,Monthly Rent,Description,Photo Folder\n";

    #[test]
    fn imports_well_formed_rows() {
        let csv = format!(
            "{HEADER}Edificio Mirador,1204,2,1,450000,Vista al parque,folder-1\n\
             Edificio Mirador,1205,2,1,460000,,\n"
        );
        let drafts = import_portfolio(Cursor::new(csv)).expect("portfolio imports");

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].building, "Edificio Mirador");
        assert_eq!(drafts[0].typology.bedrooms, 2);
        assert_eq!(drafts[0].photo_folder_id.as_deref(), Some("folder-1"));
        assert_eq!(drafts[1].photo_folder_id, None);
        assert!(drafts[1].description.is_empty());
    }

    #[test]
    fn invalid_rent_reports_the_csv_line() {
        let csv = format!(
            "{HEADER}Edificio Mirador,1204,2,1,450000,,\n\
             Edificio Mirador,1205,2,1,0,,\n"
        );
        let err = import_portfolio(Cursor::new(csv)).expect_err("zero rent must fail");

        match err {
            ImportError::Row { line, source } => {
                assert_eq!(line, 3);
                assert!(matches!(source, ListingError::NonPositiveRent { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn malformed_csv_surfaces_the_parser_error() {
        let csv = format!("{HEADER}Edificio Mirador,1204,two,1,450000,,\n");
        assert!(matches!(
            import_portfolio(Cursor::new(csv)),
            Err(ImportError::Csv(_))
        ));
    }
}
