//! Visit slot generation. A fixed weekly policy maps a calendar date to the
//! hourly windows a tenant can book for an in-person visit: weekdays 09:00 to
//! 20:00, Saturdays 10:00 to 18:00, nothing on Sundays. The generator labels
//! what is bookable in principle; it does not check concrete booking
//! conflicts.

use crate::calendar::{self, InvalidDateError};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A one-hour bookable visit window. `start_hour < end_hour` always holds
/// for slots produced by this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl TimeSlot {
    pub const fn starting_at(hour: u8) -> Self {
        Self {
            start_hour: hour,
            end_hour: hour + 1,
        }
    }

    /// Rendering used by the selection UI, e.g. `"09:00 - 10:00"`.
    pub fn label(&self) -> String {
        format!("{:02}:00 - {:02}:00", self.start_hour, self.end_hour)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00 - {:02}:00", self.start_hour, self.end_hour)
    }
}

fn start_hours(weekday: Weekday) -> Option<Range<u8>> {
    match weekday {
        Weekday::Sun => None,
        Weekday::Sat => Some(10..18),
        _ => Some(9..20),
    }
}

/// Bookable slots for `date`, earliest first. Output depends only on the
/// weekday, so two dates sharing a weekday yield identical lists. A Sunday
/// yields an empty list; an unrepresentable date never reaches this
/// function (see [`visit_slots_for_ymd`]).
pub fn visit_slots(date: NaiveDate) -> Vec<TimeSlot> {
    match start_hours(date.weekday()) {
        Some(hours) => hours.map(TimeSlot::starting_at).collect(),
        None => Vec::new(),
    }
}

/// Fallible entry point for callers holding raw components: nonexistent
/// dates fail with [`InvalidDateError`] instead of returning an empty list,
/// so "invalid date" and "valid Sunday" stay distinguishable.
pub fn visit_slots_for_ymd(
    year: i32,
    month: u32,
    day: u32,
) -> Result<Vec<TimeSlot>, InvalidDateError> {
    let date = calendar::date_from_ymd(year, month, day)?;
    Ok(visit_slots(date))
}

/// True when `slot` is one of the windows the policy offers on `date`.
pub fn slot_is_offered(date: NaiveDate, slot: TimeSlot) -> bool {
    visit_slots(date).contains(&slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::date_from_ymd;

    #[test]
    fn sundays_have_no_slots() {
        // 2024-02-18 is a Sunday.
        let sunday = date_from_ymd(2024, 2, 18).unwrap();
        assert!(visit_slots(sunday).is_empty());
    }

    #[test]
    fn weekdays_offer_eleven_hourly_slots() {
        // 2024-02-14 is a Wednesday.
        let wednesday = date_from_ymd(2024, 2, 14).unwrap();
        let slots = visit_slots(wednesday);
        assert_eq!(slots.len(), 11);
        assert_eq!(slots.first().copied(), Some(TimeSlot::starting_at(9)));
        assert_eq!(slots.last().copied(), Some(TimeSlot::starting_at(19)));
        assert!(slots.iter().all(|slot| slot.start_hour < slot.end_hour));
    }

    #[test]
    fn saturdays_offer_eight_hourly_slots() {
        // 2024-02-17 is a Saturday.
        let saturday = date_from_ymd(2024, 2, 17).unwrap();
        let slots = visit_slots(saturday);
        assert_eq!(slots.len(), 8);
        assert_eq!(slots.first().copied(), Some(TimeSlot::starting_at(10)));
        assert_eq!(slots.last().copied(), Some(TimeSlot::starting_at(17)));
    }

    #[test]
    fn output_depends_only_on_weekday() {
        let monday_a = date_from_ymd(2024, 2, 12).unwrap();
        let monday_b = date_from_ymd(2025, 6, 2).unwrap();
        assert_eq!(visit_slots(monday_a), visit_slots(monday_b));
        assert_eq!(visit_slots(monday_a), visit_slots(monday_a));
    }

    #[test]
    fn nonexistent_date_is_an_error_not_an_empty_list() {
        let err = visit_slots_for_ymd(2024, 13, 1).expect_err("month 13 must fail");
        assert!(matches!(
            err,
            InvalidDateError::Nonexistent { month: 13, .. }
        ));
    }

    #[test]
    fn slot_labels_are_zero_padded() {
        assert_eq!(TimeSlot::starting_at(9).label(), "09:00 - 10:00");
        assert_eq!(TimeSlot::starting_at(19).label(), "19:00 - 20:00");
    }

    #[test]
    fn slot_is_offered_tracks_the_policy() {
        let saturday = date_from_ymd(2024, 2, 17).unwrap();
        assert!(slot_is_offered(saturday, TimeSlot::starting_at(10)));
        assert!(!slot_is_offered(saturday, TimeSlot::starting_at(9)));
    }
}
