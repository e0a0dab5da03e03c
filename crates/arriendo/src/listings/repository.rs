use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Listing, ListingId};

/// Storage abstraction over the document-store collaborator so the catalog
/// service can be exercised in isolation.
pub trait ListingStore: Send + Sync {
    fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError>;
    fn update(&self, listing: Listing) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError>;
    fn delete(&self, id: &ListingId) -> Result<(), RepositoryError>;
    fn all(&self) -> Result<Vec<Listing>, RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("listing already exists")]
    Conflict,
    #[error("listing not found")]
    NotFound,
    #[error("listing store unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook fired when a tenant expresses interest in a listing; the
/// concrete adapter (e-mail, CRM) lives with the caller.
pub trait InterestPublisher: Send + Sync {
    fn publish(&self, note: InterestNote) -> Result<(), InterestError>;
}

/// Payload handed to the interest hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestNote {
    pub listing_id: ListingId,
    pub tenant_name: String,
    pub tenant_email: String,
    pub details: BTreeMap<String, String>,
}

/// Interest dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum InterestError {
    #[error("interest transport unavailable: {0}")]
    Transport(String),
}
