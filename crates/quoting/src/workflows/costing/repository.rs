use rust_decimal::Decimal;

use super::domain::{
    CatalogLine, CostItemLine, InfrastructureLine, MealLine, PositionSummary, QuoteId,
    QuoteParameters, QuoteRecord, VehicleLine,
};

/// Fully merged cost state written in one transaction: the parameters upsert
/// plus delete-then-insert of every line collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CostReplacement {
    pub parameters: QuoteParameters,
    pub uniforms: Vec<CatalogLine>,
    pub exams: Vec<CatalogLine>,
    pub cost_items: Vec<CostItemLine>,
    pub meals: Vec<MealLine>,
    pub vehicles: Vec<VehicleLine>,
    pub infrastructure: Vec<InfrastructureLine>,
}

/// Denormalized totals refreshed after a successful replace. Written
/// best-effort, outside the replace transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedTotals {
    pub total_guards: u32,
    pub monthly_cost: Decimal,
    pub sale_price_monthly: Decimal,
    pub contract_amount: Decimal,
}

/// Storage abstraction so the engine can be exercised with in-memory state.
///
/// `replace_cost_configuration` is the transaction boundary: implementations
/// must apply the whole replacement atomically, leaving prior state intact on
/// failure. Concurrent replaces of the same quote serialize on the storage
/// side (last committed wins); the engine adds no optimistic locking.
pub trait QuoteCostRepository: Send + Sync {
    fn fetch_quote(&self, id: QuoteId) -> Result<Option<QuoteRecord>, RepositoryError>;

    fn parameters(&self, quote: QuoteId) -> Result<Option<QuoteParameters>, RepositoryError>;

    fn uniform_lines(&self, quote: QuoteId) -> Result<Vec<CatalogLine>, RepositoryError>;

    fn exam_lines(&self, quote: QuoteId) -> Result<Vec<CatalogLine>, RepositoryError>;

    fn cost_item_lines(&self, quote: QuoteId) -> Result<Vec<CostItemLine>, RepositoryError>;

    fn meal_lines(&self, quote: QuoteId) -> Result<Vec<MealLine>, RepositoryError>;

    fn vehicle_lines(&self, quote: QuoteId) -> Result<Vec<VehicleLine>, RepositoryError>;

    fn infrastructure_lines(
        &self,
        quote: QuoteId,
    ) -> Result<Vec<InfrastructureLine>, RepositoryError>;

    fn positions(&self, quote: QuoteId) -> Result<Vec<PositionSummary>, RepositoryError>;

    fn replace_cost_configuration(
        &self,
        quote: QuoteId,
        replacement: CostReplacement,
    ) -> Result<(), RepositoryError>;

    fn refresh_cached_totals(
        &self,
        quote: QuoteId,
        totals: &CachedTotals,
    ) -> Result<(), RepositoryError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("quote not found")]
    NotFound,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("transaction aborted: {0}")]
    TransactionAborted(String),
}
