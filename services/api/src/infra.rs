use arriendo::calendar;
use arriendo::listings::{
    InterestError, InterestNote, InterestPublisher, Listing, ListingId, ListingMedia,
    ListingStore, MediaError, MediaGateway, RepositoryError,
};
use arriendo::visits::{VisitBook, VisitBookError, VisitRequest};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Document-store stand-in used until the hosted backend adapter is wired
/// in deployment.
#[derive(Default, Clone)]
pub(crate) struct InMemoryListingStore {
    listings: Arc<Mutex<HashMap<ListingId, Listing>>>,
}

impl ListingStore for InMemoryListingStore {
    fn insert(&self, listing: Listing) -> Result<Listing, RepositoryError> {
        let mut guard = self.listings.lock().expect("listing store mutex poisoned");
        if guard.contains_key(&listing.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(listing.id.clone(), listing.clone());
        Ok(listing)
    }

    fn update(&self, listing: Listing) -> Result<(), RepositoryError> {
        let mut guard = self.listings.lock().expect("listing store mutex poisoned");
        if guard.contains_key(&listing.id) {
            guard.insert(listing.id.clone(), listing);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        let guard = self.listings.lock().expect("listing store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn delete(&self, id: &ListingId) -> Result<(), RepositoryError> {
        let mut guard = self.listings.lock().expect("listing store mutex poisoned");
        guard.remove(id).map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn all(&self) -> Result<Vec<Listing>, RepositoryError> {
        let guard = self.listings.lock().expect("listing store mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Interest hook that records locally and logs; the outbound CRM/e-mail
/// adapter is an external collaborator.
#[derive(Default, Clone)]
pub(crate) struct LoggingInterestPublisher {
    notes: Arc<Mutex<Vec<InterestNote>>>,
}

impl InterestPublisher for LoggingInterestPublisher {
    fn publish(&self, note: InterestNote) -> Result<(), InterestError> {
        info!(listing = %note.listing_id.0, tenant = %note.tenant_email, "interest registered");
        let mut guard = self.notes.lock().expect("interest mutex poisoned");
        guard.push(note);
        Ok(())
    }
}

impl LoggingInterestPublisher {
    #[cfg(test)]
    pub(crate) fn notes(&self) -> Vec<InterestNote> {
        self.notes.lock().expect("interest mutex poisoned").clone()
    }
}

/// Photo storage stand-in mirroring the Drive adapter's surface for local
/// runs and tests.
#[derive(Debug, Default)]
pub(crate) struct InMemoryPhotoStore {
    albums: Arc<Mutex<HashMap<String, Vec<ListingMedia>>>>,
    sequence: AtomicU64,
}

impl MediaGateway for InMemoryPhotoStore {
    fn list_photos(&self, folder_id: &str) -> Result<Vec<ListingMedia>, MediaError> {
        let guard = self.albums.lock().expect("photo store mutex poisoned");
        Ok(guard.get(folder_id).cloned().unwrap_or_default())
    }

    fn upload_photo(
        &self,
        folder_id: &str,
        name: &str,
        content_type: mime::Mime,
        _bytes: Vec<u8>,
    ) -> Result<String, MediaError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let file_id = format!("media-{id:06}");
        let mut guard = self.albums.lock().expect("photo store mutex poisoned");
        guard.entry(folder_id.to_string()).or_default().push(ListingMedia {
            file_id: file_id.clone(),
            name: name.to_string(),
            mime_type: Some(content_type.to_string()),
            web_view_link: None,
        });
        Ok(file_id)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryVisitBook {
    requests: Arc<Mutex<Vec<VisitRequest>>>,
}

impl VisitBook for InMemoryVisitBook {
    fn record(&self, request: VisitRequest) -> Result<(), VisitBookError> {
        let mut guard = self.requests.lock().expect("visit book mutex poisoned");
        guard.push(request);
        Ok(())
    }

    fn for_listing(&self, id: &ListingId) -> Result<Vec<VisitRequest>, VisitBookError> {
        let guard = self.requests.lock().expect("visit book mutex poisoned");
        Ok(guard
            .iter()
            .filter(|request| &request.listing_id == id)
            .cloned()
            .collect())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    calendar::parse_date(raw).map_err(|err| err.to_string())
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
