use sales_forecast::config::StatisticsConfig;
use sales_forecast::logging::init_tracing;
use sales_forecast::source::CsvSalesDataSource;
use sales_forecast::statistics::{StatisticsMode, StatisticsService};
use sales_forecast::RemoteForecastClient;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Settings from config/sales_stats.* and SALES_STATS__* variables
    let config = StatisticsConfig::load()?;
    init_tracing(&config.logging)?;

    let csv_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("examples")
        .join("csv")
        .join("daily_sales.csv");

    // Sales come from the CSV file; forecasts from the configured service,
    // falling back to the local engine when it cannot be reached
    let predictor = RemoteForecastClient::new(&config.predict_url, config.request_timeout())?;
    let service = StatisticsService::new(
        Arc::new(CsvSalesDataSource::new(&csv_path)),
        Arc::new(predictor),
        &config,
    );

    let data = service
        .get_statistics_data(StatisticsMode::Historical)
        .await?;
    println!("Products:");
    for product in &data.products {
        println!("  {} ({})", product.name, product.id);
    }

    for product in &data.products {
        let report = service
            .product_report(StatisticsMode::Historical, &product.id, 7)
            .await?;

        println!("\n== {} ==", report.product.name);
        println!("Forecast source: {:?}", report.outcome.source);
        print!("{}", report.accuracy);
        println!("Chart:\n{}", serde_json::to_string_pretty(&report.chart)?);
    }

    Ok(())
}
