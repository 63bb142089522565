//! Catalog default resolution and the three-way replace merge.
//!
//! Both the read path and the write path go through [`merge_by_key`]:
//! persisted rows first, submitted rows overlaid (submitted wins), catalog
//! defaults last and only where the key is still absent. An explicitly
//! disabled persisted row therefore blocks its default from coming back.

use std::collections::BTreeMap;

use super::catalog::{CatalogIndex, CatalogItem, CatalogItemKind};
use super::domain::{CalcMode, CatalogLine, CostItemLine, MealLine};

/// Three-way merge keyed by the collection's natural key. Later insertions
/// under the same key win for `persisted`/`submitted`; `defaults` fill gaps
/// only. Output is in key order so repeated merges are row-for-row stable.
pub(crate) fn merge_by_key<T, K, F>(
    persisted: Vec<T>,
    submitted: Vec<T>,
    defaults: Vec<T>,
    key: F,
) -> Vec<T>
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut merged = BTreeMap::new();
    for row in persisted {
        merged.insert(key(&row), row);
    }
    for row in submitted {
        merged.insert(key(&row), row);
    }
    for row in defaults {
        merged.entry(key(&row)).or_insert(row);
    }
    merged.into_values().collect()
}

fn default_catalog_line(item: &CatalogItem) -> CatalogLine {
    CatalogLine {
        catalog_item_id: item.id,
        unit_price_override: None,
        enabled: true,
    }
}

pub(crate) fn uniform_defaults(catalog: &CatalogIndex) -> Vec<CatalogLine> {
    catalog
        .of_kind(CatalogItemKind::Uniform)
        .filter(|item| item.is_default)
        .map(default_catalog_line)
        .collect()
}

pub(crate) fn exam_defaults(catalog: &CatalogIndex) -> Vec<CatalogLine> {
    catalog
        .of_kind(CatalogItemKind::Exam)
        .filter(|item| item.is_default)
        .map(default_catalog_line)
        .collect()
}

pub(crate) fn cost_item_defaults(catalog: &CatalogIndex) -> Vec<CostItemLine> {
    catalog
        .cost_bucket()
        .filter(|item| item.is_default)
        .map(|item| CostItemLine {
            catalog_item_id: item.id,
            unit_price_override: None,
            enabled: true,
            calc_mode: CalcMode::PerMonth,
            quantity: 1,
        })
        .collect()
}

pub(crate) fn meal_defaults(catalog: &CatalogIndex) -> Vec<MealLine> {
    catalog
        .of_kind(CatalogItemKind::Meal)
        .filter(|item| item.is_default)
        .map(|item| MealLine {
            meal_type: item.name.clone(),
            unit_price_override: None,
            enabled: true,
            meals_per_day: 1,
            days_of_service: 30,
        })
        .collect()
}

pub(crate) fn resolve_uniforms(
    persisted: Vec<CatalogLine>,
    catalog: &CatalogIndex,
) -> Vec<CatalogLine> {
    merge_by_key(persisted, Vec::new(), uniform_defaults(catalog), |line| {
        line.catalog_item_id
    })
}

pub(crate) fn resolve_exams(
    persisted: Vec<CatalogLine>,
    catalog: &CatalogIndex,
) -> Vec<CatalogLine> {
    merge_by_key(persisted, Vec::new(), exam_defaults(catalog), |line| {
        line.catalog_item_id
    })
}

pub(crate) fn resolve_cost_items(
    persisted: Vec<CostItemLine>,
    catalog: &CatalogIndex,
) -> Vec<CostItemLine> {
    merge_by_key(persisted, Vec::new(), cost_item_defaults(catalog), |line| {
        line.catalog_item_id
    })
}

pub(crate) fn resolve_meals(persisted: Vec<MealLine>, catalog: &CatalogIndex) -> Vec<MealLine> {
    merge_by_key(persisted, Vec::new(), meal_defaults(catalog), MealLine::key)
}
