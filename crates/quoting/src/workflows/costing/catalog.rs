use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::domain::{CatalogItemId, TenantId};

/// Category of a priced catalog SKU. Uniforms, exams, and meals live in their
/// own quote collections; every other kind lands in the generic cost-item
/// bucket, with `financial` and `policy` acting as markup rate carriers
/// rather than summed costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogItemKind {
    Uniform,
    Exam,
    Meal,
    Phone,
    Radio,
    Flashlight,
    Infrastructure,
    Fuel,
    Transport,
    System,
    Financial,
    Policy,
}

impl CatalogItemKind {
    pub const fn label(self) -> &'static str {
        match self {
            CatalogItemKind::Uniform => "uniform",
            CatalogItemKind::Exam => "exam",
            CatalogItemKind::Meal => "meal",
            CatalogItemKind::Phone => "phone",
            CatalogItemKind::Radio => "radio",
            CatalogItemKind::Flashlight => "flashlight",
            CatalogItemKind::Infrastructure => "infrastructure",
            CatalogItemKind::Fuel => "fuel",
            CatalogItemKind::Transport => "transport",
            CatalogItemKind::System => "system",
            CatalogItemKind::Financial => "financial",
            CatalogItemKind::Policy => "policy",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.label() == normalized)
    }

    /// Whether items of this kind carry a markup rate instead of a cost.
    pub const fn is_rate_source(self) -> bool {
        matches!(self, CatalogItemKind::Financial | CatalogItemKind::Policy)
    }

    /// Whether items of this kind populate the generic cost-item collection.
    pub const fn in_cost_item_bucket(self) -> bool {
        !matches!(
            self,
            CatalogItemKind::Uniform | CatalogItemKind::Exam | CatalogItemKind::Meal
        )
    }

    const ALL: [CatalogItemKind; 12] = [
        CatalogItemKind::Uniform,
        CatalogItemKind::Exam,
        CatalogItemKind::Meal,
        CatalogItemKind::Phone,
        CatalogItemKind::Radio,
        CatalogItemKind::Flashlight,
        CatalogItemKind::Infrastructure,
        CatalogItemKind::Fuel,
        CatalogItemKind::Transport,
        CatalogItemKind::System,
        CatalogItemKind::Financial,
        CatalogItemKind::Policy,
    ];
}

/// Whether an auto-included default is shown to the quoting user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultVisibility {
    #[default]
    Visible,
    Hidden,
}

/// Tenant- or platform-level priced SKU usable across many quotes.
/// `tenant_id = None` marks a global item shared by every tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: CatalogItemId,
    pub tenant_id: Option<TenantId>,
    pub kind: CatalogItemKind,
    pub name: String,
    /// Free-form billing period label ("mes", "semestre", "año", "year", …).
    pub unit: Option<String>,
    pub base_price: Decimal,
    pub is_default: bool,
    pub active: bool,
    pub visibility: DefaultVisibility,
}

/// Read-only catalog lookup injected into the engine. Implementations return
/// the tenant's active items plus the active global ones; the engine never
/// caches or mutates catalog state.
pub trait CatalogSource: Send + Sync {
    fn active_items(&self, tenant: TenantId) -> Result<Vec<CatalogItem>, CatalogError>;
}

/// Catalog lookup failure.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Point-in-time index over a tenant's active catalog, built once per request.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    items: BTreeMap<CatalogItemId, CatalogItem>,
}

impl CatalogIndex {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        let items = items
            .into_iter()
            .filter(|item| item.active)
            .map(|item| (item.id, item))
            .collect();
        Self { items }
    }

    pub fn get(&self, id: CatalogItemId) -> Option<&CatalogItem> {
        self.items.get(&id)
    }

    /// Items of one kind, in catalog-id order.
    pub fn of_kind(&self, kind: CatalogItemKind) -> impl Iterator<Item = &CatalogItem> {
        self.items.values().filter(move |item| item.kind == kind)
    }

    /// Items belonging to the generic cost-item bucket, in catalog-id order.
    pub fn cost_bucket(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items
            .values()
            .filter(|item| item.kind.in_cost_item_bucket())
    }

    /// Case-insensitive lookup of a meal item by name.
    pub fn meal_by_name(&self, name: &str) -> Option<&CatalogItem> {
        let wanted = name.trim().to_lowercase();
        self.of_kind(CatalogItemKind::Meal)
            .find(|item| item.name.trim().to_lowercase() == wanted)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogCsvRow {
    id: i64,
    #[serde(default)]
    tenant_id: Option<i64>,
    kind: String,
    name: String,
    #[serde(default)]
    unit: Option<String>,
    base_price: Decimal,
    is_default: bool,
    active: bool,
}

/// Loads catalog seed files shaped as
/// `id,tenant_id,kind,name,unit,base_price,is_default,active`.
pub struct CatalogCsvImporter;

impl CatalogCsvImporter {
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CatalogItem>, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut items = Vec::new();

        for (index, record) in csv_reader.deserialize::<CatalogCsvRow>().enumerate() {
            // Header occupies line 1, so data rows start at line 2.
            let line = index + 2;
            let row = record.map_err(|source| CatalogImportError::Malformed { line, source })?;
            let kind = CatalogItemKind::parse(&row.kind)
                .ok_or_else(|| CatalogImportError::UnknownKind {
                    line,
                    kind: row.kind.clone(),
                })?;

            items.push(CatalogItem {
                id: CatalogItemId(row.id),
                tenant_id: row.tenant_id.map(TenantId),
                kind,
                name: row.name,
                unit: row.unit.filter(|unit| !unit.is_empty()),
                base_price: row.base_price,
                is_default: row.is_default,
                active: row.active,
                visibility: DefaultVisibility::Visible,
            });
        }

        Ok(items)
    }
}

/// Catalog seed parsing failure.
#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("line {line}: malformed catalog record")]
    Malformed {
        line: usize,
        #[source]
        source: csv::Error,
    },
    #[error("line {line}: unknown catalog item kind '{kind}'")]
    UnknownKind { line: usize, kind: String },
}
