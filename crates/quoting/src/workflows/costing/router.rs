use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tracing::error;

use super::catalog::CatalogSource;
use super::domain::{CostConfigurationPayload, QuoteId};
use super::repository::{QuoteCostRepository, RepositoryError};
use super::service::{CostServiceError, QuoteCostService};

/// Router builder exposing the quote cost read and full-replace endpoints.
pub fn costing_router<R, C>(service: Arc<QuoteCostService<R, C>>) -> Router
where
    R: QuoteCostRepository + 'static,
    C: CatalogSource + 'static,
{
    Router::new()
        .route(
            "/api/v1/quotes/:quote_id/costs",
            get(read_costs_handler::<R, C>).put(replace_costs_handler::<R, C>),
        )
        .with_state(service)
}

pub(crate) async fn read_costs_handler<R, C>(
    State(service): State<Arc<QuoteCostService<R, C>>>,
    Path(quote_id): Path<i64>,
) -> Response
where
    R: QuoteCostRepository + 'static,
    C: CatalogSource + 'static,
{
    match service.read(QuoteId(quote_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => failure_response(quote_id, error),
    }
}

pub(crate) async fn replace_costs_handler<R, C>(
    State(service): State<Arc<QuoteCostService<R, C>>>,
    Path(quote_id): Path<i64>,
    axum::Json(payload): axum::Json<CostConfigurationPayload>,
) -> Response
where
    R: QuoteCostRepository + 'static,
    C: CatalogSource + 'static,
{
    match service.replace(QuoteId(quote_id), payload) {
        Ok(summary) => {
            let payload = json!({ "summary": summary });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => failure_response(quote_id, error),
    }
}

/// Storage detail stays in the logs; callers get an opaque failure.
fn failure_response(quote_id: i64, error: CostServiceError) -> Response {
    match error {
        CostServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "quote not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        other => {
            error!(quote = quote_id, %other, "quote cost request failed");
            let payload = json!({ "error": "cost configuration unavailable" });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
