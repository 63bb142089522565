//! Monthly aggregation of a quote's resolved line items.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::super::catalog::CatalogItem;
use super::super::domain::{CalcMode, CatalogItemId};
use super::normalize::monthly_amount;
use super::CostInputs;

#[derive(Debug, Default)]
pub(crate) struct AggregateTotals {
    pub total_guards: u32,
    pub monthly_positions: Decimal,
    pub monthly_uniforms: Decimal,
    pub monthly_exams: Decimal,
    pub monthly_meals: Decimal,
    pub monthly_cost_items: Decimal,
    pub monthly_vehicles: Decimal,
    pub monthly_infrastructure: Decimal,
    pub missing_catalog: Vec<CatalogItemId>,
}

/// Resolve a line's monthly price: override over catalog base, normalized by
/// the catalog item's billing unit. A dangling reference degrades the base
/// price to zero; a quote-local override still applies.
fn resolved_monthly_price(override_price: Option<Decimal>, item: Option<&CatalogItem>) -> Decimal {
    let base = item.map(|item| item.base_price).unwrap_or(Decimal::ZERO);
    let price = override_price.unwrap_or(base);
    monthly_amount(price, item.and_then(|item| item.unit.as_deref()))
}

pub(crate) fn aggregate(inputs: &CostInputs<'_>) -> AggregateTotals {
    let catalog = inputs.catalog;
    let mut missing = BTreeSet::new();

    let total_guards: u32 = inputs
        .positions
        .iter()
        .map(|position| position.num_guards)
        .sum();
    let guards = Decimal::from(total_guards);

    let monthly_positions: Decimal = inputs
        .positions
        .iter()
        .map(|position| position.monthly_cost)
        .sum();

    let mut uniform_sum = Decimal::ZERO;
    for line in inputs.uniforms {
        let item = catalog.get(line.catalog_item_id);
        if item.is_none() {
            missing.insert(line.catalog_item_id);
        }
        if line.enabled {
            uniform_sum += resolved_monthly_price(line.unit_price_override, item);
        }
    }
    let monthly_uniforms =
        uniform_sum * inputs.parameters.uniform_changes_per_year / dec!(12) * guards;

    let mut exam_sum = Decimal::ZERO;
    for line in inputs.exams {
        let item = catalog.get(line.catalog_item_id);
        if item.is_none() {
            missing.insert(line.catalog_item_id);
        }
        if line.enabled {
            exam_sum += resolved_monthly_price(line.unit_price_override, item);
        }
    }
    // Exam panels are issued once per new hire; expected hires per year
    // follow from average tenure.
    let avg_stay = inputs.parameters.avg_stay_months;
    let entries_per_year = if avg_stay > Decimal::ZERO {
        dec!(12) / avg_stay
    } else {
        Decimal::ZERO
    };
    let monthly_exams = exam_sum * entries_per_year / dec!(12) * guards;

    let mut monthly_meals = Decimal::ZERO;
    for meal in inputs.meals.iter().filter(|meal| meal.enabled) {
        let item = catalog.meal_by_name(&meal.meal_type);
        let price = resolved_monthly_price(meal.unit_price_override, item);
        monthly_meals +=
            price * Decimal::from(meal.meals_per_day) * Decimal::from(meal.days_of_service);
    }

    let mut monthly_cost_items = Decimal::ZERO;
    for line in inputs.cost_items {
        let item = catalog.get(line.catalog_item_id);
        if item.is_none() {
            missing.insert(line.catalog_item_id);
        }
        // Financial and policy items carry markup rates, not monthly costs.
        if item.is_some_and(|item| item.kind.is_rate_source()) {
            continue;
        }
        if !line.enabled {
            continue;
        }
        let amount =
            resolved_monthly_price(line.unit_price_override, item) * Decimal::from(line.quantity);
        monthly_cost_items += match line.calc_mode {
            CalcMode::PerMonth => amount,
            CalcMode::PerGuard => amount * guards,
        };
    }

    let monthly_vehicles = inputs
        .vehicles
        .iter()
        .filter(|vehicle| vehicle.enabled)
        .map(|vehicle| vehicle.monthly_price * Decimal::from(vehicle.quantity))
        .sum();

    let monthly_infrastructure = inputs
        .infrastructure
        .iter()
        .filter(|row| row.enabled)
        .map(|row| row.monthly_price * Decimal::from(row.quantity))
        .sum();

    AggregateTotals {
        total_guards,
        monthly_positions,
        monthly_uniforms,
        monthly_exams,
        monthly_meals,
        monthly_cost_items,
        monthly_vehicles,
        monthly_infrastructure,
        missing_catalog: missing.into_iter().collect(),
    }
}
