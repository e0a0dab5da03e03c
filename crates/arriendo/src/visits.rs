//! Visit requests. The slot generator in [`crate::scheduling`] is the
//! source of truth here: whatever the date picker allowed client-side, a
//! submission is re-checked against the generated slots and against
//! "today" before it is recorded.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::listings::ListingId;
use crate::scheduling::{self, TimeSlot};

/// A confirmed visit-request record. Tenant identity fields are the opaque
/// values supplied by the external auth collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRequest {
    pub listing_id: ListingId,
    pub tenant_name: String,
    pub tenant_email: String,
    pub date: NaiveDate,
    pub slot: TimeSlot,
}

/// Write-side abstraction over wherever visit requests land.
pub trait VisitBook: Send + Sync {
    fn record(&self, request: VisitRequest) -> Result<(), VisitBookError>;
    fn for_listing(&self, id: &ListingId) -> Result<Vec<VisitRequest>, VisitBookError>;
}

#[derive(Debug, thiserror::Error)]
pub enum VisitBookError {
    #[error("visit book unavailable: {0}")]
    Unavailable(String),
}

/// Front desk for visit submissions: validates a (date, slot) selection and
/// records it.
pub struct VisitDesk<B> {
    book: Arc<B>,
}

impl<B> VisitDesk<B>
where
    B: VisitBook + 'static,
{
    pub fn new(book: Arc<B>) -> Self {
        Self { book }
    }

    /// Validate and record a visit request. `today` comes from the caller
    /// so the check stays pure and testable.
    pub fn request(
        &self,
        request: VisitRequest,
        today: NaiveDate,
    ) -> Result<VisitRequest, VisitError> {
        if request.date < today {
            return Err(VisitError::DateInPast {
                date: request.date,
            });
        }
        if !scheduling::slot_is_offered(request.date, request.slot) {
            return Err(VisitError::SlotUnavailable {
                date: request.date,
                slot: request.slot,
            });
        }

        self.book.record(request.clone())?;
        Ok(request)
    }

    pub fn for_listing(&self, id: &ListingId) -> Result<Vec<VisitRequest>, VisitError> {
        Ok(self.book.for_listing(id)?)
    }
}

/// Rejections and failures for a visit submission.
#[derive(Debug, thiserror::Error)]
pub enum VisitError {
    #[error("visit date {date} is in the past")]
    DateInPast { date: NaiveDate },
    #[error("slot {slot} is not offered on {date}")]
    SlotUnavailable { date: NaiveDate, slot: TimeSlot },
    #[error(transparent)]
    Book(#[from] VisitBookError),
}
