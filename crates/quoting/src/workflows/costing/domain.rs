use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for tenants (security service companies).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TenantId(pub i64);

/// Identifier wrapper for quotes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct QuoteId(pub i64);

/// Identifier wrapper for catalog items.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CatalogItemId(pub i64);

/// Quote header row. `total_guards` and `monthly_cost` are denormalized
/// caches refreshed after each successful cost replace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub id: QuoteId,
    pub tenant_id: TenantId,
    pub client_name: String,
    pub created_at: DateTime<Utc>,
    pub total_guards: u32,
    pub monthly_cost: Decimal,
}

/// Per-quote pricing parameters, upserted as one row.
///
/// Percentage fields accept either fraction (0.2) or whole-percent (20) form
/// and always pass through rate normalization before use.
/// `policy_admin_rate_pct` and `monthly_hours_standard` are carried for the
/// policy-administration and payroll subsystems and do not enter the pricing
/// formulas here. `sale_price_monthly` and `contract_amount` are caches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteParameters {
    pub margin_pct: Decimal,
    pub financial_rate_pct: Decimal,
    pub policy_rate_pct: Decimal,
    pub policy_admin_rate_pct: Decimal,
    pub contract_months: u32,
    pub policy_contract_months: u32,
    pub policy_contract_pct: Option<Decimal>,
    pub uniform_changes_per_year: Decimal,
    pub avg_stay_months: Decimal,
    pub monthly_hours_standard: Decimal,
    pub sale_price_monthly: Decimal,
    pub contract_amount: Decimal,
}

impl Default for QuoteParameters {
    fn default() -> Self {
        Self {
            margin_pct: Decimal::ZERO,
            financial_rate_pct: Decimal::ZERO,
            policy_rate_pct: Decimal::ZERO,
            policy_admin_rate_pct: Decimal::ZERO,
            contract_months: 12,
            policy_contract_months: 12,
            policy_contract_pct: None,
            uniform_changes_per_year: Decimal::ZERO,
            avg_stay_months: Decimal::ZERO,
            monthly_hours_standard: Decimal::ZERO,
            sale_price_monthly: Decimal::ZERO,
            contract_amount: Decimal::ZERO,
        }
    }
}

/// Editable subset of [`QuoteParameters`] accepted on writes. Cache fields
/// are owned by the engine and never taken from clients.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuoteParametersInput {
    pub margin_pct: Decimal,
    pub financial_rate_pct: Decimal,
    pub policy_rate_pct: Decimal,
    pub policy_admin_rate_pct: Decimal,
    pub contract_months: u32,
    pub policy_contract_months: u32,
    pub policy_contract_pct: Option<Decimal>,
    pub uniform_changes_per_year: Decimal,
    pub avg_stay_months: Decimal,
    pub monthly_hours_standard: Decimal,
}

impl Default for QuoteParametersInput {
    fn default() -> Self {
        let defaults = QuoteParameters::default();
        Self {
            margin_pct: defaults.margin_pct,
            financial_rate_pct: defaults.financial_rate_pct,
            policy_rate_pct: defaults.policy_rate_pct,
            policy_admin_rate_pct: defaults.policy_admin_rate_pct,
            contract_months: defaults.contract_months,
            policy_contract_months: defaults.policy_contract_months,
            policy_contract_pct: defaults.policy_contract_pct,
            uniform_changes_per_year: defaults.uniform_changes_per_year,
            avg_stay_months: defaults.avg_stay_months,
            monthly_hours_standard: defaults.monthly_hours_standard,
        }
    }
}

impl QuoteParametersInput {
    /// Apply the editable fields onto an existing row, keeping its caches.
    pub fn apply_to(self, mut parameters: QuoteParameters) -> QuoteParameters {
        parameters.margin_pct = self.margin_pct;
        parameters.financial_rate_pct = self.financial_rate_pct;
        parameters.policy_rate_pct = self.policy_rate_pct;
        parameters.policy_admin_rate_pct = self.policy_admin_rate_pct;
        parameters.contract_months = self.contract_months;
        parameters.policy_contract_months = self.policy_contract_months;
        parameters.policy_contract_pct = self.policy_contract_pct;
        parameters.uniform_changes_per_year = self.uniform_changes_per_year;
        parameters.avg_stay_months = self.avg_stay_months;
        parameters.monthly_hours_standard = self.monthly_hours_standard;
        parameters
    }
}

/// Catalog-backed row used by both the uniform and exam collections.
/// At most one row exists per `(quote, catalog_item_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogLine {
    pub catalog_item_id: CatalogItemId,
    pub unit_price_override: Option<Decimal>,
    pub enabled: bool,
}

/// How a generic cost item multiplies into the monthly total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalcMode {
    PerMonth,
    PerGuard,
}

/// Generic cost item row (equipment, transport, infrastructure fees, system
/// fees, financing and policy rate carriers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostItemLine {
    pub catalog_item_id: CatalogItemId,
    pub unit_price_override: Option<Decimal>,
    pub enabled: bool,
    pub calc_mode: CalcMode,
    pub quantity: u32,
}

/// Meal row, keyed by `meal_type` case-insensitively. Price falls back to the
/// catalog meal with the same (case-insensitive) name when no override is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealLine {
    pub meal_type: String,
    pub unit_price_override: Option<Decimal>,
    pub enabled: bool,
    pub meals_per_day: u32,
    pub days_of_service: u32,
}

impl MealLine {
    /// Natural key for merge and dedup.
    pub fn key(&self) -> String {
        self.meal_type.trim().to_lowercase()
    }
}

/// Vehicle row. No catalog linkage; replaced verbatim on writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleLine {
    pub description: String,
    pub monthly_price: Decimal,
    pub quantity: u32,
    pub enabled: bool,
}

/// Infrastructure row (posts, booths, lighting). No catalog linkage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureLine {
    pub description: String,
    pub monthly_price: Decimal,
    pub quantity: u32,
    pub enabled: bool,
}

/// Already-priced staffing position, summarized upstream. Read-only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSummary {
    pub num_guards: u32,
    pub monthly_cost: Decimal,
}

/// Full desired cost state submitted on a replace. Every field is optional;
/// an omitted catalog-backed array keeps persisted rows and catalog defaults,
/// an omitted vehicle/infrastructure array clears that collection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostConfigurationPayload {
    pub parameters: Option<QuoteParametersInput>,
    pub uniforms: Option<Vec<CatalogLine>>,
    pub exams: Option<Vec<CatalogLine>>,
    pub cost_items: Option<Vec<CostItemLine>>,
    pub meals: Option<Vec<MealLine>>,
    pub vehicles: Option<Vec<VehicleLine>>,
    pub infrastructure: Option<Vec<InfrastructureLine>>,
}
