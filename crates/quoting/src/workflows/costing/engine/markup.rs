//! Self-referential markup solving and policy premium amortization.
//!
//! Margin, financing, and policy cost are each defined as a percentage of
//! the sale price itself, so the price is the closed-form solution of
//! `sale = cost_base / (1 - (margin + financial + policy))`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::super::catalog::{CatalogIndex, CatalogItemKind};
use super::super::domain::{CostItemLine, QuoteParameters};
use super::normalize::rate_fraction;

/// Normalized (fractional) markup rates applied against the sale price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkupRates {
    pub margin: Decimal,
    pub financial: Decimal,
    pub policy: Decimal,
}

impl MarkupRates {
    pub fn combined(&self) -> Decimal {
        self.margin + self.financial + self.policy
    }
}

/// Solved sale price. `degenerate` marks the fallback taken when combined
/// markup reaches 100% of the price and the equation has no finite positive
/// solution; the price then equals the cost base and carries no markup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalePrice {
    pub amount: Decimal,
    pub degenerate: bool,
}

pub fn solve_sale_price(cost_base: Decimal, rates: &MarkupRates) -> SalePrice {
    let combined = rates.combined();
    if combined >= Decimal::ONE {
        return SalePrice {
            amount: cost_base,
            degenerate: true,
        };
    }

    SalePrice {
        amount: cost_base / (Decimal::ONE - combined),
        degenerate: false,
    }
}

/// Rate carried by the first enabled cost item of the given kind, as a
/// fraction; zero when the quote has none. First match in resolved
/// (catalog-id) order is the tie-break when a tenant configures duplicates.
pub(crate) fn carried_rate(
    lines: &[CostItemLine],
    catalog: &CatalogIndex,
    kind: CatalogItemKind,
) -> Decimal {
    lines
        .iter()
        .filter(|line| line.enabled)
        .find_map(|line| {
            let item = catalog.get(line.catalog_item_id)?;
            (item.kind == kind)
                .then(|| rate_fraction(line.unit_price_override.unwrap_or(item.base_price)))
        })
        .unwrap_or(Decimal::ZERO)
}

/// Spread the contract-term-bound policy premium evenly over the commercial
/// contract. The premium is sized against `policy_contract_months` (its own
/// window), then divided across `contract_months`.
pub(crate) fn amortize_policy(
    sale_price: Decimal,
    policy_rate: Decimal,
    parameters: &QuoteParameters,
) -> Decimal {
    if parameters.contract_months == 0 {
        return Decimal::ZERO;
    }

    let coverage = rate_fraction(parameters.policy_contract_pct.unwrap_or(dec!(1)));
    let policy_contract_amount =
        sale_price * Decimal::from(parameters.policy_contract_months) * coverage;
    let policy_total = policy_contract_amount * policy_rate;

    policy_total / Decimal::from(parameters.contract_months)
}
