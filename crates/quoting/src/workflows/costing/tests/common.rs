use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::workflows::costing::catalog::{
    CatalogError, CatalogIndex, CatalogItem, CatalogItemKind, CatalogSource, DefaultVisibility,
};
use crate::workflows::costing::domain::{
    CatalogItemId, CatalogLine, CostItemLine, InfrastructureLine, MealLine, PositionSummary,
    QuoteId, QuoteParameters, QuoteRecord, TenantId, VehicleLine,
};
use crate::workflows::costing::repository::{
    CachedTotals, CostReplacement, QuoteCostRepository, RepositoryError,
};
use crate::workflows::costing::{costing_router, QuoteCostService};

pub(super) fn tenant() -> TenantId {
    TenantId(7)
}

pub(super) fn quote_id() -> QuoteId {
    QuoteId(1)
}

fn item(
    id: i64,
    tenant_id: Option<TenantId>,
    kind: CatalogItemKind,
    name: &str,
    unit: Option<&str>,
    base_price: Decimal,
    is_default: bool,
    active: bool,
) -> CatalogItem {
    CatalogItem {
        id: CatalogItemId(id),
        tenant_id,
        kind,
        name: name.to_string(),
        unit: unit.map(str::to_string),
        base_price,
        is_default,
        active,
        visibility: DefaultVisibility::Visible,
    }
}

pub(super) fn catalog_items() -> Vec<CatalogItem> {
    let owned = Some(tenant());
    vec![
        item(
            101,
            owned,
            CatalogItemKind::Uniform,
            "Dotación completa",
            Some("año"),
            dec!(20000),
            true,
            true,
        ),
        item(
            102,
            owned,
            CatalogItemKind::Uniform,
            "Chaqueta institucional",
            Some("mes"),
            dec!(500),
            false,
            true,
        ),
        item(
            201,
            owned,
            CatalogItemKind::Exam,
            "Examen médico de ingreso",
            None,
            dec!(120),
            true,
            true,
        ),
        item(
            202,
            None,
            CatalogItemKind::Exam,
            "Prueba psicotécnica",
            None,
            dec!(80),
            true,
            true,
        ),
        item(
            301,
            owned,
            CatalogItemKind::Meal,
            "Almuerzo",
            None,
            dec!(15),
            true,
            true,
        ),
        item(
            401,
            owned,
            CatalogItemKind::Radio,
            "Radio de comunicación",
            Some("mes"),
            dec!(80),
            true,
            true,
        ),
        item(
            402,
            owned,
            CatalogItemKind::System,
            "Plataforma de monitoreo",
            Some("año"),
            dec!(1200),
            false,
            true,
        ),
        item(
            501,
            owned,
            CatalogItemKind::Financial,
            "Costo financiero",
            None,
            dec!(2),
            false,
            true,
        ),
        item(
            502,
            owned,
            CatalogItemKind::Policy,
            "Póliza de cumplimiento",
            None,
            dec!(1.5),
            false,
            true,
        ),
        item(
            901,
            owned,
            CatalogItemKind::Uniform,
            "Dotación retirada",
            Some("año"),
            dec!(99000),
            true,
            false,
        ),
    ]
}

pub(super) fn catalog_index() -> CatalogIndex {
    CatalogIndex::new(catalog_items())
}

pub(super) fn parameters() -> QuoteParameters {
    QuoteParameters {
        margin_pct: dec!(20),
        contract_months: 12,
        policy_contract_months: 6,
        policy_contract_pct: Some(dec!(100)),
        uniform_changes_per_year: dec!(3),
        avg_stay_months: dec!(8),
        ..QuoteParameters::default()
    }
}

pub(super) fn positions() -> Vec<PositionSummary> {
    vec![PositionSummary {
        num_guards: 4,
        monthly_cost: dec!(1000000),
    }]
}

pub(super) fn quote_record() -> QuoteRecord {
    QuoteRecord {
        id: quote_id(),
        tenant_id: tenant(),
        client_name: "Centro Logístico Norte".to_string(),
        created_at: Utc
            .with_ymd_and_hms(2025, 11, 3, 14, 30, 0)
            .single()
            .expect("valid timestamp"),
        total_guards: 0,
        monthly_cost: Decimal::ZERO,
    }
}

#[derive(Default)]
pub(super) struct StoreState {
    pub(super) quotes: HashMap<QuoteId, QuoteRecord>,
    pub(super) parameters: HashMap<QuoteId, QuoteParameters>,
    pub(super) uniforms: HashMap<QuoteId, Vec<CatalogLine>>,
    pub(super) exams: HashMap<QuoteId, Vec<CatalogLine>>,
    pub(super) cost_items: HashMap<QuoteId, Vec<CostItemLine>>,
    pub(super) meals: HashMap<QuoteId, Vec<MealLine>>,
    pub(super) vehicles: HashMap<QuoteId, Vec<VehicleLine>>,
    pub(super) infrastructure: HashMap<QuoteId, Vec<InfrastructureLine>>,
    pub(super) positions: HashMap<QuoteId, Vec<PositionSummary>>,
}

/// In-memory stand-in for the storage collaborator. The single mutex makes
/// the replace naturally atomic; the failure toggles let tests exercise the
/// rollback and best-effort-cache contracts.
#[derive(Default, Clone)]
pub(super) struct MemoryQuoteStore {
    pub(super) state: Arc<Mutex<StoreState>>,
    pub(super) fail_replace: bool,
    pub(super) fail_cache_refresh: bool,
}

impl MemoryQuoteStore {
    pub(super) fn seeded() -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().expect("store mutex poisoned");
            state.quotes.insert(quote_id(), quote_record());
            state.parameters.insert(quote_id(), parameters());
            state.positions.insert(quote_id(), positions());
        }
        store
    }

}

impl QuoteCostRepository for MemoryQuoteStore {
    fn fetch_quote(&self, id: QuoteId) -> Result<Option<QuoteRecord>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.quotes.get(&id).cloned())
    }

    fn parameters(&self, quote: QuoteId) -> Result<Option<QuoteParameters>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.parameters.get(&quote).cloned())
    }

    fn uniform_lines(&self, quote: QuoteId) -> Result<Vec<CatalogLine>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.uniforms.get(&quote).cloned().unwrap_or_default())
    }

    fn exam_lines(&self, quote: QuoteId) -> Result<Vec<CatalogLine>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.exams.get(&quote).cloned().unwrap_or_default())
    }

    fn cost_item_lines(&self, quote: QuoteId) -> Result<Vec<CostItemLine>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.cost_items.get(&quote).cloned().unwrap_or_default())
    }

    fn meal_lines(&self, quote: QuoteId) -> Result<Vec<MealLine>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.meals.get(&quote).cloned().unwrap_or_default())
    }

    fn vehicle_lines(&self, quote: QuoteId) -> Result<Vec<VehicleLine>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.vehicles.get(&quote).cloned().unwrap_or_default())
    }

    fn infrastructure_lines(
        &self,
        quote: QuoteId,
    ) -> Result<Vec<InfrastructureLine>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.infrastructure.get(&quote).cloned().unwrap_or_default())
    }

    fn positions(&self, quote: QuoteId) -> Result<Vec<PositionSummary>, RepositoryError> {
        let state = self.state.lock().expect("store mutex poisoned");
        Ok(state.positions.get(&quote).cloned().unwrap_or_default())
    }

    fn replace_cost_configuration(
        &self,
        quote: QuoteId,
        replacement: CostReplacement,
    ) -> Result<(), RepositoryError> {
        if self.fail_replace {
            return Err(RepositoryError::TransactionAborted(
                "constraint violation".to_string(),
            ));
        }
        let mut state = self.state.lock().expect("store mutex poisoned");
        state.parameters.insert(quote, replacement.parameters);
        state.uniforms.insert(quote, replacement.uniforms);
        state.exams.insert(quote, replacement.exams);
        state.cost_items.insert(quote, replacement.cost_items);
        state.meals.insert(quote, replacement.meals);
        state.vehicles.insert(quote, replacement.vehicles);
        state
            .infrastructure
            .insert(quote, replacement.infrastructure);
        Ok(())
    }

    fn refresh_cached_totals(
        &self,
        quote: QuoteId,
        totals: &CachedTotals,
    ) -> Result<(), RepositoryError> {
        if self.fail_cache_refresh {
            return Err(RepositoryError::Unavailable("cache write lost".to_string()));
        }
        let mut state = self.state.lock().expect("store mutex poisoned");
        if let Some(record) = state.quotes.get_mut(&quote) {
            record.total_guards = totals.total_guards;
            record.monthly_cost = totals.monthly_cost;
        }
        if let Some(parameters) = state.parameters.get_mut(&quote) {
            parameters.sale_price_monthly = totals.sale_price_monthly;
            parameters.contract_amount = totals.contract_amount;
        }
        Ok(())
    }
}

#[derive(Clone)]
pub(super) struct MemoryCatalog {
    items: Vec<CatalogItem>,
}

impl MemoryCatalog {
    pub(super) fn with_fixture() -> Self {
        Self {
            items: catalog_items(),
        }
    }
}

impl CatalogSource for MemoryCatalog {
    fn active_items(&self, tenant: TenantId) -> Result<Vec<CatalogItem>, CatalogError> {
        Ok(self
            .items
            .iter()
            .filter(|item| item.active)
            .filter(|item| item.tenant_id.is_none() || item.tenant_id == Some(tenant))
            .cloned()
            .collect())
    }
}

/// Storage fake that rejects every call.
pub(super) struct UnavailableStore;

impl QuoteCostRepository for UnavailableStore {
    fn fetch_quote(&self, _id: QuoteId) -> Result<Option<QuoteRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn parameters(&self, _quote: QuoteId) -> Result<Option<QuoteParameters>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn uniform_lines(&self, _quote: QuoteId) -> Result<Vec<CatalogLine>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn exam_lines(&self, _quote: QuoteId) -> Result<Vec<CatalogLine>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn cost_item_lines(&self, _quote: QuoteId) -> Result<Vec<CostItemLine>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn meal_lines(&self, _quote: QuoteId) -> Result<Vec<MealLine>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn vehicle_lines(&self, _quote: QuoteId) -> Result<Vec<VehicleLine>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn infrastructure_lines(
        &self,
        _quote: QuoteId,
    ) -> Result<Vec<InfrastructureLine>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn positions(&self, _quote: QuoteId) -> Result<Vec<PositionSummary>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn replace_cost_configuration(
        &self,
        _quote: QuoteId,
        _replacement: CostReplacement,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn refresh_cached_totals(
        &self,
        _quote: QuoteId,
        _totals: &CachedTotals,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    QuoteCostService<MemoryQuoteStore, MemoryCatalog>,
    Arc<MemoryQuoteStore>,
) {
    let store = Arc::new(MemoryQuoteStore::seeded());
    let catalog = Arc::new(MemoryCatalog::with_fixture());
    let service = QuoteCostService::new(store.clone(), catalog);
    (service, store)
}

pub(super) fn seeded_router() -> axum::Router {
    let (service, _store) = build_service();
    costing_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_close(actual: Decimal, expected: Decimal) {
    assert_eq!(
        actual.round_dp(2),
        expected,
        "expected {expected} (±0.005), got {actual}"
    );
}
