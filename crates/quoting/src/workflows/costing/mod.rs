//! Quote cost & price composition: catalog default resolution, unit and rate
//! normalization, proration, the self-referential markup solver, policy
//! amortization, and the transactional full-replace write path.

pub mod catalog;
pub(crate) mod defaults;
pub mod domain;
pub mod engine;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use catalog::{
    CatalogCsvImporter, CatalogError, CatalogImportError, CatalogIndex, CatalogItem,
    CatalogItemKind, CatalogSource, DefaultVisibility,
};
pub use domain::{
    CalcMode, CatalogItemId, CatalogLine, CostConfigurationPayload, CostItemLine,
    InfrastructureLine, MealLine, PositionSummary, QuoteId, QuoteParameters, QuoteParametersInput,
    QuoteRecord, TenantId, VehicleLine,
};
pub use engine::{
    monthly_amount, rate_fraction, solve_sale_price, CostInputs, CostSummary, MarkupRates,
    SalePrice,
};
pub use repository::{CachedTotals, CostReplacement, QuoteCostRepository, RepositoryError};
pub use router::costing_router;
pub use service::{CostServiceError, QuoteCostService};
pub use views::{CatalogLineView, CostItemLineView, MealLineView, QuoteCostView};
