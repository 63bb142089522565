use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemoryCatalog, InMemoryQuoteStore};
use crate::routes::with_costing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

use quoting::config::AppConfig;
use quoting::error::AppError;
use quoting::telemetry;
use quoting::workflows::costing::QuoteCostService;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = Arc::new(InMemoryCatalog::new(load_catalog(&config.catalog)?));
    let store = Arc::new(InMemoryQuoteStore::with_demo_quote());
    let costing_service = Arc::new(QuoteCostService::new(store, catalog));

    let app = with_costing_routes(costing_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "quote costing service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
