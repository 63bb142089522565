use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::workflows::costing::engine::{monthly_amount, rate_fraction};

#[test]
fn year_labels_divide_by_twelve() {
    for unit in ["año", "Año", "años", "ANUAL", "year", "Yearly", "annual"] {
        assert_eq!(
            monthly_amount(dec!(1200), Some(unit)),
            dec!(100),
            "unit '{unit}' should amortize per month"
        );
    }
}

#[test]
fn semester_labels_divide_by_six() {
    for unit in ["semestre", "Semestral", "semester"] {
        assert_eq!(
            monthly_amount(dec!(600), Some(unit)),
            dec!(100),
            "unit '{unit}' should amortize per month"
        );
    }
}

#[test]
fn monthly_and_unrecognized_labels_pass_through() {
    for unit in ["mes", "Mensual", "month", "quincena", ""] {
        assert_eq!(monthly_amount(dec!(250), Some(unit)), dec!(250));
    }
    assert_eq!(monthly_amount(dec!(250), None), dec!(250));
}

#[test]
fn worked_example_year_price_normalizes_first() {
    // 20000 per year is 1666.67 per month before any proration factor.
    let monthly = monthly_amount(dec!(20000), Some("año"));
    assert_eq!(monthly.round_dp(2), dec!(1666.67));
}

#[test]
fn whole_percent_values_become_fractions() {
    assert_eq!(rate_fraction(dec!(20)), dec!(0.2));
    assert_eq!(rate_fraction(dec!(100)), dec!(1));
    assert_eq!(rate_fraction(dec!(1.5)), dec!(0.015));
}

#[test]
fn fractional_values_are_kept_as_is() {
    assert_eq!(rate_fraction(dec!(0.2)), dec!(0.2));
    assert_eq!(rate_fraction(dec!(0)), Decimal::ZERO);
    // Exactly 1 reads as an already-fractional 100%.
    assert_eq!(rate_fraction(dec!(1)), dec!(1));
}
