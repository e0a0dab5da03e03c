use arriendo::billing::{first_payment_quote, first_payment_quote_for_ymd, format};
use arriendo::calendar::{date_from_ymd, InvalidDateError};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn every_first_of_month_start_skips_proration() {
    for month in 1..=12 {
        let start = date_from_ymd(2024, month, 1).unwrap();
        let quote = first_payment_quote(start, 500_000.0, 1).expect("positive rent quotes");
        assert!(!quote.is_prorated, "month {month} should not prorate");
        assert_eq!(quote.prorated_days, 0);
        assert_close(quote.prorated_amount, 0.0);
        assert_close(quote.total_first_payment, 1_000_000.0);
        assert_eq!(quote.first_full_month, start);
    }
}

#[test]
fn leap_february_mid_month_matches_hand_computed_values() {
    let quote = first_payment_quote_for_ymd(2024, 2, 15, 500_000.0, 1)
        .expect("date exists")
        .expect("positive rent quotes");

    assert!(quote.is_prorated);
    assert_eq!(quote.prorated_days, 15);
    assert_close(quote.prorated_amount, 258_620.69);
    assert_close(quote.first_full_month_rent, 500_000.0);
    assert_close(quote.security_deposit, 500_000.0);
    assert_close(quote.total_first_payment, 1_258_620.69);
    assert_eq!(quote.first_full_month, date_from_ymd(2024, 3, 1).unwrap());
}

#[test]
fn total_is_always_the_sum_of_its_parts() {
    for day in [2, 10, 17, 28] {
        let start = date_from_ymd(2024, 7, day).unwrap();
        let quote = first_payment_quote(start, 387_500.0, 2).expect("positive rent quotes");
        assert_close(
            quote.total_first_payment,
            quote.prorated_amount + quote.first_full_month_rent + quote.security_deposit,
        );
    }
}

#[test]
fn deposit_scales_with_configured_months() {
    let start = date_from_ymd(2024, 3, 1).unwrap();
    let quote = first_payment_quote(start, 400_000.0, 2).expect("positive rent quotes");
    assert!(!quote.is_prorated);
    assert_close(quote.security_deposit, 800_000.0);
    assert_close(quote.total_first_payment, 1_200_000.0);
}

#[test]
fn last_day_of_a_thirty_day_month_is_one_prorated_day() {
    let quote = first_payment_quote_for_ymd(2024, 6, 30, 600_000.0, 1)
        .expect("date exists")
        .expect("positive rent quotes");
    assert_eq!(quote.prorated_days, 1);
    assert_close(quote.prorated_amount, 20_000.0);
}

#[test]
fn recomputation_is_referentially_transparent() {
    let start = date_from_ymd(2024, 2, 15).unwrap();
    let first = first_payment_quote(start, 500_000.0, 1).expect("quotes");
    let second = first_payment_quote(start, 500_000.0, 1).expect("quotes");
    assert_eq!(first.prorated_days, second.prorated_days);
    assert_eq!(first.prorated_amount.to_bits(), second.prorated_amount.to_bits());
    assert_eq!(
        first.total_first_payment.to_bits(),
        second.total_first_payment.to_bits()
    );
}

#[test]
fn nonexistent_start_dates_fail_with_invalid_date() {
    assert!(matches!(
        first_payment_quote_for_ymd(2024, 13, 1, 500_000.0, 1),
        Err(InvalidDateError::Nonexistent { month: 13, .. })
    ));
}

#[test]
fn display_formatting_rounds_only_at_the_edge() {
    let quote = first_payment_quote_for_ymd(2024, 2, 15, 500_000.0, 1)
        .expect("date exists")
        .expect("positive rent quotes");

    // Internal value keeps the fraction; the CLP renderer rounds it.
    assert!(quote.prorated_amount.fract() > 0.0);
    assert_eq!(format::clp(quote.prorated_amount), "$258.621");
    assert_eq!(format::clp(quote.total_first_payment), "$1.258.621");
    assert_eq!(format::month_label(quote.first_full_month), "marzo 2024");
    assert_eq!(format::month_label(quote.upcoming[0].month), "abril 2024");
    assert_eq!(format::month_label(quote.upcoming[1].month), "mayo 2024");
}
