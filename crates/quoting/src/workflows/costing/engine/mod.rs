mod aggregate;
mod markup;
mod normalize;

pub use markup::{solve_sale_price, MarkupRates, SalePrice};
pub use normalize::{monthly_amount, rate_fraction};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::{CatalogIndex, CatalogItemKind};
use super::domain::{
    CatalogItemId, CatalogLine, CostItemLine, InfrastructureLine, MealLine, PositionSummary,
    QuoteParameters, VehicleLine,
};

/// Default-resolved quote state handed to the summarizer.
#[derive(Debug, Clone, Copy)]
pub struct CostInputs<'a> {
    pub parameters: &'a QuoteParameters,
    pub uniforms: &'a [CatalogLine],
    pub exams: &'a [CatalogLine],
    pub cost_items: &'a [CostItemLine],
    pub meals: &'a [MealLine],
    pub vehicles: &'a [VehicleLine],
    pub infrastructure: &'a [InfrastructureLine],
    pub positions: &'a [PositionSummary],
    pub catalog: &'a CatalogIndex,
}

/// Monthly totals per category plus the solved sale price. Computed on every
/// read, never persisted beyond the denormalized quote caches.
///
/// Vehicles and infrastructure are reported for display but excluded from
/// `monthly_extras`/`monthly_total`; they are billed separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub total_guards: u32,
    pub monthly_positions: Decimal,
    pub monthly_uniforms: Decimal,
    pub monthly_exams: Decimal,
    pub monthly_meals: Decimal,
    pub monthly_vehicles: Decimal,
    pub monthly_infrastructure: Decimal,
    pub monthly_cost_items: Decimal,
    pub monthly_financial: Decimal,
    pub monthly_policy: Decimal,
    pub monthly_extras: Decimal,
    pub monthly_total: Decimal,
    pub sale_price: Decimal,
    /// Combined markup reached 100% of the price; the sale price fell back
    /// to the cost base and includes no margin.
    pub degenerate_markup: bool,
    /// Line items whose catalog reference no longer resolves.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_catalog_items: Vec<CatalogItemId>,
}

/// Run the full read pipeline over resolved state: aggregate, solve the
/// markup equation, amortize the policy premium, compose the totals.
pub fn summarize(inputs: &CostInputs<'_>) -> CostSummary {
    let totals = aggregate::aggregate(inputs);

    let rates = MarkupRates {
        margin: rate_fraction(inputs.parameters.margin_pct),
        financial: markup::carried_rate(inputs.cost_items, inputs.catalog, CatalogItemKind::Financial),
        policy: markup::carried_rate(inputs.cost_items, inputs.catalog, CatalogItemKind::Policy),
    };

    let cost_base = totals.monthly_positions
        + totals.monthly_uniforms
        + totals.monthly_exams
        + totals.monthly_meals
        + totals.monthly_cost_items;

    let sale = solve_sale_price(cost_base, &rates);
    let monthly_financial = sale.amount * rates.financial;
    let monthly_policy = markup::amortize_policy(sale.amount, rates.policy, inputs.parameters);

    let monthly_extras = totals.monthly_uniforms
        + totals.monthly_exams
        + totals.monthly_meals
        + totals.monthly_cost_items
        + monthly_financial
        + monthly_policy;
    let monthly_total = totals.monthly_positions + monthly_extras;

    CostSummary {
        total_guards: totals.total_guards,
        monthly_positions: totals.monthly_positions,
        monthly_uniforms: totals.monthly_uniforms,
        monthly_exams: totals.monthly_exams,
        monthly_meals: totals.monthly_meals,
        monthly_vehicles: totals.monthly_vehicles,
        monthly_infrastructure: totals.monthly_infrastructure,
        monthly_cost_items: totals.monthly_cost_items,
        monthly_financial,
        monthly_policy,
        monthly_extras,
        monthly_total,
        sale_price: sale.amount,
        degenerate_markup: sale.degenerate,
        missing_catalog_items: totals.missing_catalog,
    }
}
