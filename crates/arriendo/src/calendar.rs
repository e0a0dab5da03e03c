use chrono::{Datelike, NaiveDate};

/// Raised when a caller supplies a date that does not exist on the calendar
/// or a string that does not parse as `YYYY-MM-DD`. The scheduling and
/// billing modules never swallow this into an empty result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDateError {
    #[error("{year:04}-{month:02}-{day:02} is not a calendar date")]
    Nonexistent { year: i32, month: u32, day: u32 },
    #[error("failed to parse '{raw}' as YYYY-MM-DD")]
    Unparseable { raw: String },
}

/// Builds a date from components, failing on nonexistent dates (month 13,
/// February 30) instead of returning a sentinel.
pub fn date_from_ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, InvalidDateError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(InvalidDateError::Nonexistent { year, month, day })
}

/// Parses a `YYYY-MM-DD` string, trimming surrounding whitespace.
pub fn parse_date(raw: &str) -> Result<NaiveDate, InvalidDateError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| InvalidDateError::Unparseable {
        raw: raw.trim().to_string(),
    })
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .expect("day 1 exists in every month")
}

/// First day of the month after the one containing `date`.
pub fn first_of_following_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("day 1 exists in every month")
}

/// Advances a first-of-month marker by `months` whole months.
pub fn add_months(first_of: NaiveDate, months: u32) -> NaiveDate {
    let zero_based = first_of.month() - 1 + months;
    let year = first_of.year() + (zero_based / 12) as i32;
    let month = zero_based % 12 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).expect("day 1 exists in every month")
}

/// Number of days in the month containing `date`.
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    let next = first_of_following_month(date);
    next.signed_duration_since(first).num_days() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_month_thirteen() {
        let err = date_from_ymd(2024, 13, 1).expect_err("month 13 must fail");
        assert_eq!(
            err,
            InvalidDateError::Nonexistent {
                year: 2024,
                month: 13,
                day: 1
            }
        );
    }

    #[test]
    fn rejects_february_thirtieth() {
        assert!(date_from_ymd(2023, 2, 30).is_err());
    }

    #[test]
    fn parses_trimmed_iso_dates() {
        let date = parse_date(" 2024-02-15 ").expect("date parses");
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 15).unwrap());
        assert!(parse_date("15/02/2024").is_err());
    }

    #[test]
    fn leap_february_has_29_days() {
        let date = date_from_ymd(2024, 2, 15).unwrap();
        assert_eq!(days_in_month(date), 29);
        let date = date_from_ymd(2023, 2, 15).unwrap();
        assert_eq!(days_in_month(date), 28);
    }

    #[test]
    fn following_month_rolls_over_december() {
        let date = date_from_ymd(2024, 12, 31).unwrap();
        assert_eq!(
            first_of_following_month(date),
            date_from_ymd(2025, 1, 1).unwrap()
        );
    }

    #[test]
    fn add_months_crosses_year_boundaries() {
        let nov = date_from_ymd(2024, 11, 1).unwrap();
        assert_eq!(add_months(nov, 2), date_from_ymd(2025, 1, 1).unwrap());
        assert_eq!(add_months(nov, 0), nov);
    }
}
