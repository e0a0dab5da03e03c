use crate::calendar::{self, InvalidDateError};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Breakdown of the first payment for a lease: prorated partial month (when
/// the lease does not start on the 1st), one full month of rent, and the
/// security deposit, plus the two flat charges that follow. Amounts keep
/// full `f64` precision; rounding belongs to [`crate::billing::format`].
#[derive(Debug, Clone, Serialize)]
pub struct ProrationResult {
    pub is_prorated: bool,
    pub prorated_days: u32,
    pub prorated_amount: f64,
    pub first_full_month_rent: f64,
    pub security_deposit: f64,
    pub total_first_payment: f64,
    /// First day of the first month charged in full. Equals the start
    /// date's own month when the lease begins on the 1st, otherwise the
    /// month after.
    pub first_full_month: NaiveDate,
    /// Flat recurring rent for the two months after the first full one.
    pub upcoming: [UpcomingCharge; 2],
}

/// A single month of flat recurring rent in the forward schedule.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct UpcomingCharge {
    /// First day of the billed month, used as the month marker.
    pub month: NaiveDate,
    pub amount: f64,
}

/// Computes the first-payment breakdown. Returns `None` when `monthly_rent`
/// is not a positive amount; the caller renders a prompt in that case
/// rather than an error. Pure and safe to recompute on every input change.
pub fn first_payment_quote(
    start_date: NaiveDate,
    monthly_rent: f64,
    security_deposit_months: u32,
) -> Option<ProrationResult> {
    if !monthly_rent.is_finite() || monthly_rent <= 0.0 {
        return None;
    }

    let day_of_month = start_date.day();
    let days_in_month = calendar::days_in_month(start_date);
    let is_prorated = day_of_month != 1;

    let (prorated_days, prorated_amount, first_full_month) = if is_prorated {
        // Inclusive of the start day through month end.
        let days = days_in_month - day_of_month + 1;
        let amount = monthly_rent * days as f64 / days_in_month as f64;
        (days, amount, calendar::first_of_following_month(start_date))
    } else {
        (0, 0.0, calendar::first_of_month(start_date))
    };

    let first_full_month_rent = monthly_rent;
    let security_deposit = security_deposit_months as f64 * monthly_rent;
    let total_first_payment = prorated_amount + first_full_month_rent + security_deposit;

    let upcoming = [
        UpcomingCharge {
            month: calendar::add_months(first_full_month, 1),
            amount: monthly_rent,
        },
        UpcomingCharge {
            month: calendar::add_months(first_full_month, 2),
            amount: monthly_rent,
        },
    ];

    Some(ProrationResult {
        is_prorated,
        prorated_days,
        prorated_amount,
        first_full_month_rent,
        security_deposit,
        total_first_payment,
        first_full_month,
        upcoming,
    })
}

/// Fallible entry point for callers holding raw date components; a
/// nonexistent start date fails with [`InvalidDateError`] instead of being
/// substituted with a default.
pub fn first_payment_quote_for_ymd(
    year: i32,
    month: u32,
    day: u32,
    monthly_rent: f64,
    security_deposit_months: u32,
) -> Result<Option<ProrationResult>, InvalidDateError> {
    let start_date = calendar::date_from_ymd(year, month, day)?;
    Ok(first_payment_quote(
        start_date,
        monthly_rent,
        security_deposit_months,
    ))
}
