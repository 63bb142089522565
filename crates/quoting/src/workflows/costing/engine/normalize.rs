//! Unit and rate normalization applied at every pricing boundary.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const YEAR_TOKENS: [&str; 5] = ["año", "anio", "anual", "annual", "year"];
const SEMESTER_TOKENS: [&str; 1] = ["semest"];

/// Convert a catalog price stated per billing period into a monthly
/// run-rate. Labels carrying a year token divide by 12, a semester token by
/// 6; anything else (monthly, blank, unrecognized) passes through unchanged.
pub fn monthly_amount(price: Decimal, unit: Option<&str>) -> Decimal {
    let Some(unit) = unit else {
        return price;
    };
    let normalized = unit.trim().to_lowercase();

    if YEAR_TOKENS.iter().any(|token| normalized.contains(token)) {
        price / dec!(12)
    } else if SEMESTER_TOKENS
        .iter()
        .any(|token| normalized.contains(token))
    {
        price / dec!(6)
    } else {
        price
    }
}

/// Interpret a stored percentage as a fraction. Values at or below 1 are
/// already fractions; anything larger is a whole-number percent.
pub fn rate_fraction(value: Decimal) -> Decimal {
    if value <= Decimal::ONE {
        value
    } else {
        value / dec!(100)
    }
}
