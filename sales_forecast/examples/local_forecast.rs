use sales_forecast::data::GapPolicy;
use sales_forecast::metrics::evaluate_accuracy;
use sales_forecast::source::{CsvSalesDataSource, SalesDataSource};
use sales_forecast::{ArimaOrder, LocalForecastEngine, SalesAggregator};
use sales_math::stats::summarize;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load sales records from CSV
    let csv_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("examples")
        .join("csv")
        .join("daily_sales.csv");

    println!("Loading sales from: {}", csv_path.display());
    let payload = CsvSalesDataSource::new(&csv_path)
        .fetch_historical_sales()
        .await?;

    // Overall daily totals, treating days without records as zero sales
    let batches = SalesAggregator::parse_batches(&payload["data"]);
    let series = SalesAggregator::total_series(&batches);
    println!(
        "Loaded {} days ({} without records)",
        series.len(),
        series.missing_count()
    );
    let history = series.fill_gaps(GapPolicy::Zero);

    let summary = summarize(&history)?;
    println!(
        "Daily volume: mean {:.2}, min {:.0}, max {:.0}",
        summary.mean, summary.min, summary.max
    );

    // Forecast the next 7 days
    let engine = LocalForecastEngine::default();
    let forecast = engine.forecast(&history, 7)?;

    println!("Forecast for the next 7 days using {}:", engine.order());
    for (i, value) in forecast.values().iter().enumerate() {
        match value {
            Some(v) => println!("Day {}: {:.2}", i + 1, v),
            None => println!("Day {}: n/a", i + 1),
        }
    }

    // How well would one-step-ahead forecasts have done?
    let backtest = engine.rolling_one_step(&history, ArimaOrder::single_step());
    let actual: Vec<Option<f64>> = history.iter().copied().map(Some).collect();
    println!("\n{}", evaluate_accuracy(&actual, backtest.values()));

    Ok(())
}
