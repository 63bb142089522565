//! Read-path response shapes, each catalog-backed entry carrying its
//! resolved catalog item for display.

use serde::Serialize;

use super::catalog::{CatalogIndex, CatalogItem};
use super::domain::{
    CatalogLine, CostItemLine, InfrastructureLine, MealLine, QuoteId, QuoteParameters, VehicleLine,
};
use super::engine::CostSummary;
use super::service::ResolvedCostState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteCostView {
    pub quote_id: QuoteId,
    pub parameters: QuoteParameters,
    pub uniforms: Vec<CatalogLineView>,
    pub exams: Vec<CatalogLineView>,
    pub cost_items: Vec<CostItemLineView>,
    pub meals: Vec<MealLineView>,
    pub vehicles: Vec<VehicleLine>,
    pub infrastructure: Vec<InfrastructureLine>,
    pub summary: CostSummary,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogLineView {
    #[serde(flatten)]
    pub line: CatalogLine,
    pub catalog_item: Option<CatalogItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostItemLineView {
    #[serde(flatten)]
    pub line: CostItemLine,
    pub catalog_item: Option<CatalogItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealLineView {
    #[serde(flatten)]
    pub line: MealLine,
    pub catalog_item: Option<CatalogItem>,
}

pub(crate) fn build_view(
    quote_id: QuoteId,
    state: &ResolvedCostState,
    catalog: &CatalogIndex,
    summary: CostSummary,
) -> QuoteCostView {
    let catalog_line_view = |line: &CatalogLine| CatalogLineView {
        line: line.clone(),
        catalog_item: catalog.get(line.catalog_item_id).cloned(),
    };

    QuoteCostView {
        quote_id,
        parameters: state.parameters.clone(),
        uniforms: state.uniforms.iter().map(catalog_line_view).collect(),
        exams: state.exams.iter().map(catalog_line_view).collect(),
        cost_items: state
            .cost_items
            .iter()
            .map(|line| CostItemLineView {
                line: line.clone(),
                catalog_item: catalog.get(line.catalog_item_id).cloned(),
            })
            .collect(),
        meals: state
            .meals
            .iter()
            .map(|line| MealLineView {
                catalog_item: catalog.meal_by_name(&line.meal_type).cloned(),
                line: line.clone(),
            })
            .collect(),
        vehicles: state.vehicles.clone(),
        infrastructure: state.infrastructure.clone(),
        summary,
    }
}
