use crate::infra::{builtin_catalog, InMemoryCatalog, InMemoryQuoteStore, DEMO_QUOTE};
use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use quoting::error::AppError;
use quoting::workflows::costing::{
    CatalogCsvImporter, CostConfigurationPayload, CostSummary, QuoteCostService, QuoteCostView,
    QuoteParametersInput, VehicleLine,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional catalog CSV seed to price the demo quote against.
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Margin applied in the demo save (fraction or whole percent).
    #[arg(long)]
    pub(crate) margin: Option<Decimal>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        catalog_csv,
        margin,
    } = args;

    let items = match catalog_csv {
        Some(path) => {
            let file = File::open(path)?;
            CatalogCsvImporter::from_reader(file)?
        }
        None => builtin_catalog(),
    };

    let store = Arc::new(InMemoryQuoteStore::with_demo_quote());
    let service = QuoteCostService::new(store, Arc::new(InMemoryCatalog::new(items)));

    println!("Quote costing demo");

    let view = service.read(DEMO_QUOTE)?;
    render_view("Initial state (catalog defaults only)", &view);

    let payload = CostConfigurationPayload {
        parameters: Some(QuoteParametersInput {
            margin_pct: margin.unwrap_or(dec!(8)),
            uniform_changes_per_year: dec!(2),
            avg_stay_months: dec!(6),
            contract_months: 12,
            policy_contract_months: 12,
            policy_contract_pct: Some(dec!(100)),
            ..QuoteParametersInput::default()
        }),
        vehicles: Some(vec![VehicleLine {
            description: "Camioneta de supervisión".to_string(),
            monthly_price: dec!(3800000),
            quantity: 1,
            enabled: true,
        }]),
        ..CostConfigurationPayload::default()
    };

    let summary = service.replace(DEMO_QUOTE, payload)?;
    println!();
    render_summary("After saving commercial parameters", &summary);

    Ok(())
}

fn render_view(title: &str, view: &QuoteCostView) {
    println!("\n{title}");
    println!(
        "  resolved lines: {} uniform(s), {} exam(s), {} cost item(s), {} meal(s)",
        view.uniforms.len(),
        view.exams.len(),
        view.cost_items.len(),
        view.meals.len()
    );
    render_summary("Monthly composition", &view.summary);
}

fn render_summary(title: &str, summary: &CostSummary) {
    println!("{title}");
    println!("  guards            {:>16}", summary.total_guards);
    println!(
        "  positions         {:>16}",
        summary.monthly_positions.round_dp(2)
    );
    println!(
        "  uniforms          {:>16}",
        summary.monthly_uniforms.round_dp(2)
    );
    println!(
        "  exams             {:>16}",
        summary.monthly_exams.round_dp(2)
    );
    println!(
        "  meals             {:>16}",
        summary.monthly_meals.round_dp(2)
    );
    println!(
        "  cost items        {:>16}",
        summary.monthly_cost_items.round_dp(2)
    );
    println!(
        "  financing         {:>16}",
        summary.monthly_financial.round_dp(2)
    );
    println!(
        "  policy            {:>16}",
        summary.monthly_policy.round_dp(2)
    );
    println!(
        "  vehicles (aside)  {:>16}",
        summary.monthly_vehicles.round_dp(2)
    );
    println!(
        "  monthly total     {:>16}",
        summary.monthly_total.round_dp(2)
    );
    println!(
        "  sale price        {:>16}",
        summary.sale_price.round_dp(2)
    );
    if summary.degenerate_markup {
        println!("  warning: combined markup reaches 100%; price held at cost");
    }
    if !summary.missing_catalog_items.is_empty() {
        println!(
            "  warning: {} line(s) reference retired catalog items",
            summary.missing_catalog_items.len()
        );
    }
}
