use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::domain::{
    Listing, ListingDraft, ListingError, ListingFilter, ListingId, ListingStatus, TypologyGroup,
};
use super::repository::{
    InterestError, InterestNote, InterestPublisher, ListingStore, RepositoryError,
};

/// Catalog service composing validation, the listing store, and the
/// interest hook.
pub struct ListingService<S, I> {
    store: Arc<S>,
    interest: Arc<I>,
}

static LISTING_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_listing_id() -> ListingId {
    let id = LISTING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ListingId(format!("lst-{id:06}"))
}

impl<S, I> ListingService<S, I>
where
    S: ListingStore + 'static,
    I: InterestPublisher + 'static,
{
    pub fn new(store: Arc<S>, interest: Arc<I>) -> Self {
        Self { store, interest }
    }

    /// Validate and publish a new listing on behalf of `landlord_id`.
    pub fn publish(
        &self,
        landlord_id: &str,
        draft: ListingDraft,
    ) -> Result<Listing, ListingServiceError> {
        draft.validate()?;

        let listing = Listing {
            id: next_listing_id(),
            building: draft.building,
            unit: draft.unit,
            typology: draft.typology,
            monthly_rent: draft.monthly_rent,
            description: draft.description,
            photo_folder_id: draft.photo_folder_id,
            status: ListingStatus::Published,
            landlord_id: landlord_id.to_string(),
        };

        let stored = self.store.insert(listing)?;
        Ok(stored)
    }

    /// Replace the editable fields of an existing listing. Only the owning
    /// landlord may edit.
    pub fn edit(
        &self,
        landlord_id: &str,
        id: &ListingId,
        draft: ListingDraft,
    ) -> Result<Listing, ListingServiceError> {
        draft.validate()?;

        let current = self
            .store
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        if current.landlord_id != landlord_id {
            return Err(ListingServiceError::NotOwner {
                listing_id: id.clone(),
            });
        }

        let updated = Listing {
            id: current.id.clone(),
            building: draft.building,
            unit: draft.unit,
            typology: draft.typology,
            monthly_rent: draft.monthly_rent,
            description: draft.description,
            photo_folder_id: draft.photo_folder_id,
            status: current.status,
            landlord_id: current.landlord_id,
        };

        self.store.update(updated.clone())?;
        Ok(updated)
    }

    /// Remove a listing. Only the owning landlord may delete.
    pub fn remove(&self, landlord_id: &str, id: &ListingId) -> Result<(), ListingServiceError> {
        let current = self
            .store
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        if current.landlord_id != landlord_id {
            return Err(ListingServiceError::NotOwner {
                listing_id: id.clone(),
            });
        }
        self.store.delete(id)?;
        Ok(())
    }

    pub fn get(&self, id: &ListingId) -> Result<Listing, ListingServiceError> {
        let listing = self
            .store
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(listing)
    }

    /// Published listings matching `filter`, lowest rent first.
    pub fn search(&self, filter: &ListingFilter) -> Result<Vec<Listing>, ListingServiceError> {
        let mut matches: Vec<Listing> = self
            .store
            .all()?
            .into_iter()
            .filter(|listing| listing.status == ListingStatus::Published)
            .filter(|listing| filter.matches(listing))
            .collect();
        matches.sort_by(|a, b| {
            a.monthly_rent
                .total_cmp(&b.monthly_rent)
                .then_with(|| a.id.0.cmp(&b.id.0))
        });
        Ok(matches)
    }

    /// Browse view: published listings grouped by building and typology,
    /// each group carrying its rent band. Groups come back ordered by
    /// building then typology.
    pub fn browse(&self) -> Result<Vec<TypologyGroup>, ListingServiceError> {
        let mut buckets: BTreeMap<(String, u8, u8), Vec<Listing>> = BTreeMap::new();
        for listing in self.store.all()? {
            if listing.status != ListingStatus::Published {
                continue;
            }
            let key = (
                listing.building.clone(),
                listing.typology.bedrooms,
                listing.typology.bathrooms,
            );
            buckets.entry(key).or_default().push(listing);
        }

        let groups = buckets
            .into_iter()
            .map(|((building, _, _), mut listings)| {
                listings.sort_by(|a, b| a.monthly_rent.total_cmp(&b.monthly_rent));
                let typology = listings[0].typology;
                let lowest_rent = listings[0].monthly_rent;
                let highest_rent = listings[listings.len() - 1].monthly_rent;
                TypologyGroup {
                    building,
                    typology,
                    typology_label: typology.label(),
                    lowest_rent,
                    highest_rent,
                    listings,
                }
            })
            .collect();

        Ok(groups)
    }

    /// Record tenant interest in a published listing and fire the outbound
    /// hook.
    pub fn express_interest(
        &self,
        id: &ListingId,
        tenant_name: &str,
        tenant_email: &str,
    ) -> Result<(), ListingServiceError> {
        let listing = self.get(id)?;

        let mut details = BTreeMap::new();
        details.insert("building".to_string(), listing.building.clone());
        details.insert("unit".to_string(), listing.unit.clone());
        details.insert("landlord_id".to_string(), listing.landlord_id.clone());

        self.interest.publish(InterestNote {
            listing_id: listing.id,
            tenant_name: tenant_name.to_string(),
            tenant_email: tenant_email.to_string(),
            details,
        })?;
        Ok(())
    }
}

/// Error raised by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error(transparent)]
    Validation(#[from] ListingError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Interest(#[from] InterestError),
    #[error("listing {} belongs to another landlord", listing_id.0)]
    NotOwner { listing_id: ListingId },
}
