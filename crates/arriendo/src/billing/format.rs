//! es-CL display formatting. This is the boundary where amounts are rounded:
//! everything upstream stays full precision.

use chrono::{Datelike, NaiveDate};

const MONTHS_ES: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Renders a non-negative amount as Chilean pesos, e.g. `$1.258.621`.
/// Rounds half away from zero to whole pesos and groups thousands with
/// dots, the es-CL convention.
pub fn clp(amount: f64) -> String {
    let pesos = amount.round().max(0.0) as u64;
    let digits = pesos.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}

/// Lowercase Spanish month label for a billing-month marker, e.g.
/// `"febrero 2024"`.
pub fn month_label(month: NaiveDate) -> String {
    let name = MONTHS_ES[(month.month0()) as usize];
    format!("{} {}", name, month.year())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::date_from_ymd;

    #[test]
    fn clp_groups_thousands_with_dots() {
        assert_eq!(clp(0.0), "$0");
        assert_eq!(clp(999.0), "$999");
        assert_eq!(clp(1_000.0), "$1.000");
        assert_eq!(clp(500_000.0), "$500.000");
        assert_eq!(clp(1_258_620.69), "$1.258.621");
    }

    #[test]
    fn clp_rounds_half_away_from_zero() {
        assert_eq!(clp(10_000.5), "$10.001");
        assert_eq!(clp(10_000.49), "$10.000");
    }

    #[test]
    fn month_labels_are_spanish() {
        assert_eq!(month_label(date_from_ymd(2024, 2, 1).unwrap()), "febrero 2024");
        assert_eq!(
            month_label(date_from_ymd(2025, 12, 1).unwrap()),
            "diciembre 2025"
        );
    }
}
