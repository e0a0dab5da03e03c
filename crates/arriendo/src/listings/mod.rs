//! Listing catalog: the tenant-facing browse/search surface and the
//! landlord-facing publishing workflow, behind capability traits so the
//! backend-as-a-service adapters stay swappable.

pub mod domain;
pub mod importer;
pub mod media;
pub mod repository;
pub mod service;

pub use domain::{
    Listing, ListingDraft, ListingError, ListingFilter, ListingId, ListingStatus, Typology,
    TypologyGroup,
};
pub use importer::{import_portfolio, ImportError};
pub use media::{DrivePhotoStore, ListingGallery, ListingMedia, MediaError, MediaGateway};
pub use repository::{InterestError, InterestNote, InterestPublisher, ListingStore, RepositoryError};
pub use service::{ListingService, ListingServiceError};
