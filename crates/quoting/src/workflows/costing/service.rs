use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::warn;

use super::catalog::{CatalogError, CatalogIndex, CatalogSource};
use super::defaults;
use super::domain::{
    CatalogLine, CostConfigurationPayload, CostItemLine, InfrastructureLine, MealLine,
    PositionSummary, QuoteId, QuoteParameters, QuoteRecord, VehicleLine,
};
use super::engine::{self, CostInputs, CostSummary};
use super::repository::{CachedTotals, CostReplacement, QuoteCostRepository, RepositoryError};
use super::views::{self, QuoteCostView};

/// Service composing the catalog source, repository, and pricing engine.
///
/// Reads resolve catalog defaults over persisted rows and run the pure
/// pipeline; writes three-way-merge the submitted state, replace persisted
/// rows atomically, then re-run the read pipeline and refresh caches.
pub struct QuoteCostService<R, C> {
    repository: Arc<R>,
    catalog: Arc<C>,
}

/// Default-resolved state for one quote, as the engine consumes it.
#[derive(Debug, Clone)]
pub(crate) struct ResolvedCostState {
    pub(crate) parameters: QuoteParameters,
    pub(crate) uniforms: Vec<CatalogLine>,
    pub(crate) exams: Vec<CatalogLine>,
    pub(crate) cost_items: Vec<CostItemLine>,
    pub(crate) meals: Vec<MealLine>,
    pub(crate) vehicles: Vec<VehicleLine>,
    pub(crate) infrastructure: Vec<InfrastructureLine>,
    pub(crate) positions: Vec<PositionSummary>,
}

impl ResolvedCostState {
    pub(crate) fn inputs<'a>(&'a self, catalog: &'a CatalogIndex) -> CostInputs<'a> {
        CostInputs {
            parameters: &self.parameters,
            uniforms: &self.uniforms,
            exams: &self.exams,
            cost_items: &self.cost_items,
            meals: &self.meals,
            vehicles: &self.vehicles,
            infrastructure: &self.infrastructure,
            positions: &self.positions,
            catalog,
        }
    }
}

impl<R, C> QuoteCostService<R, C>
where
    R: QuoteCostRepository + 'static,
    C: CatalogSource + 'static,
{
    pub fn new(repository: Arc<R>, catalog: Arc<C>) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    /// Resolve the quote's cost state and compute the monthly summary.
    pub fn read(&self, quote_id: QuoteId) -> Result<QuoteCostView, CostServiceError> {
        let quote = self.fetch_quote(quote_id)?;
        let (state, catalog) = self.load_resolved(&quote)?;
        let summary = engine::summarize(&state.inputs(&catalog));
        Ok(views::build_view(quote.id, &state, &catalog, summary))
    }

    /// Replace the quote's whole cost configuration, then return the freshly
    /// computed summary. Catalog-backed collections merge submitted rows
    /// over persisted rows over catalog defaults; vehicles and
    /// infrastructure are taken verbatim from the payload.
    pub fn replace(
        &self,
        quote_id: QuoteId,
        payload: CostConfigurationPayload,
    ) -> Result<CostSummary, CostServiceError> {
        let quote = self.fetch_quote(quote_id)?;
        let catalog = CatalogIndex::new(self.catalog.active_items(quote.tenant_id)?);

        let parameters = {
            let existing = self
                .repository
                .parameters(quote_id)?
                .unwrap_or_default();
            match payload.parameters {
                Some(input) => input.apply_to(existing),
                None => existing,
            }
        };

        let uniforms = defaults::merge_by_key(
            self.repository.uniform_lines(quote_id)?,
            payload.uniforms.unwrap_or_default(),
            defaults::uniform_defaults(&catalog),
            |line| line.catalog_item_id,
        );
        let exams = defaults::merge_by_key(
            self.repository.exam_lines(quote_id)?,
            payload.exams.unwrap_or_default(),
            defaults::exam_defaults(&catalog),
            |line| line.catalog_item_id,
        );
        let cost_items = defaults::merge_by_key(
            self.repository.cost_item_lines(quote_id)?,
            payload.cost_items.unwrap_or_default(),
            defaults::cost_item_defaults(&catalog),
            |line| line.catalog_item_id,
        );
        let meals = defaults::merge_by_key(
            self.repository.meal_lines(quote_id)?,
            payload.meals.unwrap_or_default(),
            defaults::meal_defaults(&catalog),
            MealLine::key,
        );

        self.repository.replace_cost_configuration(
            quote_id,
            CostReplacement {
                parameters,
                uniforms,
                exams,
                cost_items,
                meals,
                vehicles: payload.vehicles.unwrap_or_default(),
                infrastructure: payload.infrastructure.unwrap_or_default(),
            },
        )?;

        let (state, catalog) = self.load_resolved(&quote)?;
        let summary = engine::summarize(&state.inputs(&catalog));

        // Cache refresh is best-effort; the replace already committed.
        let totals = CachedTotals {
            total_guards: summary.total_guards,
            monthly_cost: summary.monthly_total,
            sale_price_monthly: summary.sale_price,
            contract_amount: summary.sale_price
                * Decimal::from(state.parameters.contract_months),
        };
        if let Err(error) = self.repository.refresh_cached_totals(quote_id, &totals) {
            warn!(quote = quote_id.0, %error, "cached totals refresh failed after replace");
        }

        Ok(summary)
    }

    fn fetch_quote(&self, quote_id: QuoteId) -> Result<QuoteRecord, CostServiceError> {
        Ok(self
            .repository
            .fetch_quote(quote_id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    fn load_resolved(
        &self,
        quote: &QuoteRecord,
    ) -> Result<(ResolvedCostState, CatalogIndex), CostServiceError> {
        let catalog = CatalogIndex::new(self.catalog.active_items(quote.tenant_id)?);

        let state = ResolvedCostState {
            parameters: self
                .repository
                .parameters(quote.id)?
                .unwrap_or_default(),
            uniforms: defaults::resolve_uniforms(self.repository.uniform_lines(quote.id)?, &catalog),
            exams: defaults::resolve_exams(self.repository.exam_lines(quote.id)?, &catalog),
            cost_items: defaults::resolve_cost_items(
                self.repository.cost_item_lines(quote.id)?,
                &catalog,
            ),
            meals: defaults::resolve_meals(self.repository.meal_lines(quote.id)?, &catalog),
            vehicles: self.repository.vehicle_lines(quote.id)?,
            infrastructure: self.repository.infrastructure_lines(quote.id)?,
            positions: self.repository.positions(quote.id)?,
        };

        Ok((state, catalog))
    }
}

/// Error raised by the quote cost service.
#[derive(Debug, thiserror::Error)]
pub enum CostServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
