use serde::{Deserialize, Serialize};

/// Identifier wrapper for published listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

/// Bedroom/bathroom configuration grouping listings within a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Typology {
    pub bedrooms: u8,
    pub bathrooms: u8,
}

impl Typology {
    /// Short Chilean-market label, e.g. `"2D/1B"`.
    pub fn label(&self) -> String {
        format!("{}D/{}B", self.bedrooms, self.bathrooms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Draft,
    Published,
    Archived,
}

impl ListingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
            Self::Archived => "Archived",
        }
    }
}

/// A rentable unit as advertised on the marketplace. Rent is a CLP amount;
/// `landlord_id` is the opaque identifier issued by the external auth
/// provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub building: String,
    pub unit: String,
    pub typology: Typology,
    pub monthly_rent: f64,
    pub description: String,
    pub photo_folder_id: Option<String>,
    pub status: ListingStatus,
    pub landlord_id: String,
}

/// Landlord-supplied fields for a new or edited listing, before an id and
/// status are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub building: String,
    pub unit: String,
    pub typology: Typology,
    pub monthly_rent: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photo_folder_id: Option<String>,
}

impl ListingDraft {
    /// Field-level validation applied before any store write.
    pub fn validate(&self) -> Result<(), ListingError> {
        if self.building.trim().is_empty() {
            return Err(ListingError::MissingBuilding);
        }
        if self.unit.trim().is_empty() {
            return Err(ListingError::MissingUnit);
        }
        if !self.monthly_rent.is_finite() || self.monthly_rent <= 0.0 {
            return Err(ListingError::NonPositiveRent {
                rent: self.monthly_rent,
            });
        }
        Ok(())
    }
}

/// Tenant-side search criteria. Every present field must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFilter {
    pub building: Option<String>,
    pub bedrooms: Option<u8>,
    pub bathrooms: Option<u8>,
    pub min_rent: Option<f64>,
    pub max_rent: Option<f64>,
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(building) = &self.building {
            if !listing.building.eq_ignore_ascii_case(building.trim()) {
                return false;
            }
        }
        if let Some(bedrooms) = self.bedrooms {
            if listing.typology.bedrooms != bedrooms {
                return false;
            }
        }
        if let Some(bathrooms) = self.bathrooms {
            if listing.typology.bathrooms != bathrooms {
                return false;
            }
        }
        if let Some(min) = self.min_rent {
            if listing.monthly_rent < min {
                return false;
            }
        }
        if let Some(max) = self.max_rent {
            if listing.monthly_rent > max {
                return false;
            }
        }
        true
    }
}

/// Browse-view grouping: all published listings sharing a building and
/// typology, with the rent band across the group.
#[derive(Debug, Clone, Serialize)]
pub struct TypologyGroup {
    pub building: String,
    pub typology: Typology,
    pub typology_label: String,
    pub lowest_rent: f64,
    pub highest_rent: f64,
    pub listings: Vec<Listing>,
}

/// Validation failures for landlord-supplied listing fields.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListingError {
    #[error("building name must not be empty")]
    MissingBuilding,
    #[error("unit identifier must not be empty")]
    MissingUnit,
    #[error("monthly rent must be a positive amount, got {rent}")]
    NonPositiveRent { rent: f64 },
}
