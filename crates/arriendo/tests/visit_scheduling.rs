use std::sync::{Arc, Mutex};

use arriendo::calendar::{date_from_ymd, InvalidDateError};
use arriendo::listings::ListingId;
use arriendo::scheduling::{visit_slots, visit_slots_for_ymd, TimeSlot};
use arriendo::visits::{VisitBook, VisitBookError, VisitDesk, VisitError, VisitRequest};
use chrono::{Duration, NaiveDate};

#[derive(Default)]
struct InMemoryVisitBook {
    requests: Mutex<Vec<VisitRequest>>,
}

impl VisitBook for InMemoryVisitBook {
    fn record(&self, request: VisitRequest) -> Result<(), VisitBookError> {
        self.requests
            .lock()
            .expect("visit book mutex poisoned")
            .push(request);
        Ok(())
    }

    fn for_listing(&self, id: &ListingId) -> Result<Vec<VisitRequest>, VisitBookError> {
        Ok(self
            .requests
            .lock()
            .expect("visit book mutex poisoned")
            .iter()
            .filter(|request| &request.listing_id == id)
            .cloned()
            .collect())
    }
}

fn week_of(monday: NaiveDate) -> Vec<NaiveDate> {
    (0..7).map(|offset| monday + Duration::days(offset)).collect()
}

#[test]
fn weekly_policy_holds_across_a_full_week() {
    // 2024-02-12 is a Monday.
    let monday = date_from_ymd(2024, 2, 12).unwrap();
    let week = week_of(monday);

    for date in &week[0..5] {
        let slots = visit_slots(*date);
        assert_eq!(slots.len(), 11, "weekday {date} should offer 11 slots");
        assert_eq!(slots[0], TimeSlot::starting_at(9));
        assert_eq!(slots[10], TimeSlot::starting_at(19));
    }

    let saturday = visit_slots(week[5]);
    assert_eq!(saturday.len(), 8);
    assert_eq!(saturday[0], TimeSlot::starting_at(10));
    assert_eq!(saturday[7], TimeSlot::starting_at(17));

    assert!(visit_slots(week[6]).is_empty());
}

#[test]
fn slots_are_contiguous_ascending_hours() {
    let friday = date_from_ymd(2024, 2, 16).unwrap();
    let slots = visit_slots(friday);
    for window in slots.windows(2) {
        assert_eq!(window[0].end_hour, window[1].start_hour);
    }
    for slot in &slots {
        assert!(slot.start_hour < slot.end_hour);
    }
}

#[test]
fn same_weekday_different_dates_yield_identical_lists() {
    let saturday_a = visit_slots_for_ymd(2024, 2, 17).unwrap();
    let saturday_b = visit_slots_for_ymd(2031, 5, 17).unwrap();
    assert_eq!(saturday_a, saturday_b);
}

#[test]
fn nonexistent_dates_fail_loudly() {
    assert!(matches!(
        visit_slots_for_ymd(2024, 13, 1),
        Err(InvalidDateError::Nonexistent { month: 13, .. })
    ));
    assert!(matches!(
        visit_slots_for_ymd(2023, 2, 29),
        Err(InvalidDateError::Nonexistent { day: 29, .. })
    ));
}

#[test]
fn desk_accepts_only_generated_slots() {
    let book = Arc::new(InMemoryVisitBook::default());
    let desk = VisitDesk::new(book.clone());
    let today = date_from_ymd(2024, 2, 12).unwrap();
    let listing = ListingId("lst-000042".to_string());

    let wednesday = date_from_ymd(2024, 2, 14).unwrap();
    let accepted = desk.request(
        VisitRequest {
            listing_id: listing.clone(),
            tenant_name: "Diego Fuentes".to_string(),
            tenant_email: "diego@example.com".to_string(),
            date: wednesday,
            slot: TimeSlot::starting_at(19),
        },
        today,
    );
    assert!(accepted.is_ok());

    // 20:00 is past the weekday window.
    let rejected = desk.request(
        VisitRequest {
            listing_id: listing.clone(),
            tenant_name: "Diego Fuentes".to_string(),
            tenant_email: "diego@example.com".to_string(),
            date: wednesday,
            slot: TimeSlot::starting_at(20),
        },
        today,
    );
    assert!(matches!(rejected, Err(VisitError::SlotUnavailable { .. })));

    let recorded = desk.for_listing(&listing).expect("book lists");
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].slot.label(), "19:00 - 20:00");
}
