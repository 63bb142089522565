use chrono::{TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::fs::File;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use quoting::config::CatalogConfig;
use quoting::error::AppError;
use quoting::workflows::costing::{
    CachedTotals, CatalogCsvImporter, CatalogError, CatalogItem, CatalogItemId, CatalogItemKind,
    CatalogLine, CatalogSource, CostItemLine, CostReplacement, DefaultVisibility,
    InfrastructureLine, MealLine, PositionSummary, QuoteCostRepository, QuoteId, QuoteParameters,
    QuoteRecord, RepositoryError, TenantId, VehicleLine,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) const DEMO_TENANT: TenantId = TenantId(1);
pub(crate) const DEMO_QUOTE: QuoteId = QuoteId(1);

#[derive(Default)]
struct StoreState {
    quotes: HashMap<QuoteId, QuoteRecord>,
    parameters: HashMap<QuoteId, QuoteParameters>,
    uniforms: HashMap<QuoteId, Vec<CatalogLine>>,
    exams: HashMap<QuoteId, Vec<CatalogLine>>,
    cost_items: HashMap<QuoteId, Vec<CostItemLine>>,
    meals: HashMap<QuoteId, Vec<MealLine>>,
    vehicles: HashMap<QuoteId, Vec<VehicleLine>>,
    infrastructure: HashMap<QuoteId, Vec<InfrastructureLine>>,
    positions: HashMap<QuoteId, Vec<PositionSummary>>,
}

/// In-memory storage adapter. One mutex over the whole state makes the
/// full-replace naturally atomic, mirroring the single-transaction contract
/// a database-backed implementation must honor.
#[derive(Default, Clone)]
pub(crate) struct InMemoryQuoteStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryQuoteStore {
    pub(crate) fn with_demo_quote() -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().expect("store mutex poisoned");
            state.quotes.insert(
                DEMO_QUOTE,
                QuoteRecord {
                    id: DEMO_QUOTE,
                    tenant_id: DEMO_TENANT,
                    client_name: "Centro Logístico Norte".to_string(),
                    created_at: Utc
                        .with_ymd_and_hms(2026, 2, 2, 15, 0, 0)
                        .single()
                        .expect("valid timestamp"),
                    total_guards: 0,
                    monthly_cost: Decimal::ZERO,
                },
            );
            state.positions.insert(
                DEMO_QUOTE,
                vec![
                    PositionSummary {
                        num_guards: 4,
                        monthly_cost: dec!(6200000),
                    },
                    PositionSummary {
                        num_guards: 2,
                        monthly_cost: dec!(3400000),
                    },
                ],
            );
        }
        store
    }
}

impl QuoteCostRepository for InMemoryQuoteStore {
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
pub(crate) struct InMemoryCatalog {
    items: Vec<CatalogItem>,
}

impl InMemoryCatalog {
    pub(crate) fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }
}

impl CatalogSource for InMemoryCatalog {
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

/// Catalog from the configured CSV seed, falling back to the built-in one.
pub(crate) fn load_catalog(config: &CatalogConfig) -> Result<Vec<CatalogItem>, AppError> {
    match &config.seed_path {
        Some(path) => {
            let file = File::open(path)?;
            Ok(CatalogCsvImporter::from_reader(file)?)
        }
        None => Ok(builtin_catalog()),
    }
}

fn item(
    id: i64,
    tenant_id: Option<TenantId>,
    kind: CatalogItemKind,
    name: &str,
    unit: Option<&str>,
    base_price: Decimal,
    is_default: bool,
) -> CatalogItem {
    CatalogItem {
        id: CatalogItemId(id),
        tenant_id,
        kind,
        name: name.to_string(),
        unit: unit.map(str::to_string),
        base_price,
        is_default,
        active: true,
        visibility: DefaultVisibility::Visible,
    }
}

pub(crate) fn builtin_catalog() -> Vec<CatalogItem> {
    let owned = Some(DEMO_TENANT);
    vec![
        item(
            1,
            owned,
            CatalogItemKind::Uniform,
            "Dotación estándar",
            Some("año"),
            dec!(240000),
            true,
        ),
        item(
            2,
            owned,
            CatalogItemKind::Exam,
            "Examen médico de ingreso",
            None,
            dec!(90000),
            true,
        ),
        item(
            3,
            None,
            CatalogItemKind::Exam,
            "Prueba psicotécnica",
            None,
            dec!(60000),
            true,
        ),
        item(
            4,
            owned,
            CatalogItemKind::Meal,
            "Almuerzo",
            None,
            dec!(12000),
            true,
        ),
        item(
            5,
            owned,
            CatalogItemKind::Radio,
            "Radio portátil",
            Some("mes"),
            dec!(45000),
            true,
        ),
        item(
            6,
            owned,
            CatalogItemKind::System,
            "Central de monitoreo",
            Some("año"),
            dec!(600000),
            false,
        ),
        item(
            7,
            owned,
            CatalogItemKind::Financial,
            "Costo financiero",
            None,
            dec!(3),
            true,
        ),
        item(
            8,
            owned,
            CatalogItemKind::Policy,
            "Póliza todo riesgo",
            None,
            dec!(2),
            true,
        ),
    ]
}
