use sales_forecast::chart::ForecastChart;
use sales_forecast::config::StatisticsConfig;
use sales_forecast::data::GapPolicy;
use sales_forecast::metrics::accuracy_score;
use sales_forecast::source::{CsvSalesDataSource, SalesDataSource};
use sales_forecast::statistics::{ForecastSource, StatisticsMode, StatisticsService};
use sales_forecast::{LocalForecastEngine, RemoteForecastClient, SalesAggregator};
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const HISTORY: [f64; 14] = [
    5.0, 6.0, 5.0, 7.0, 8.0, 6.0, 5.0, 9.0, 10.0, 8.0, 7.0, 9.0, 11.0, 10.0,
];

// Helper function to write HISTORY as daily sales of one product
fn create_sales_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "date,itemId,name,num").unwrap();
    for (i, num) in HISTORY.iter().enumerate() {
        writeln!(file, "2024-01-{:02},42,Oolong,{}", i + 1, num).unwrap();
    }
    file
}

#[test]
fn test_forecast_then_score() {
    let engine = LocalForecastEngine::default();
    let forecast = engine.forecast(&HISTORY, 3).unwrap();

    assert_eq!(forecast.values().len(), 3);
    assert!(forecast.observed().iter().all(|v| *v >= 0.0));

    let actual = vec![Some(11.0), Some(12.0), Some(10.0)];
    let score = accuracy_score(&actual, forecast.values());
    assert!(score <= 1.0);
}

#[tokio::test]
async fn test_csv_to_chart_workflow() {
    // 1. Load the raw payload
    let file = create_sales_file();
    let source = CsvSalesDataSource::new(file.path());
    let payload = source.fetch_historical_sales().await.unwrap();

    // 2. Aggregate
    let batches = SalesAggregator::parse_batches(&payload["data"]);
    let products = SalesAggregator::products_from_batches(&batches);
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Oolong");

    let series = SalesAggregator::product_series(&batches, "42");
    let history = series.require_complete().unwrap();
    assert_eq!(history, HISTORY.to_vec());
    assert_eq!(series.fill_gaps(GapPolicy::Zero), history);

    // 3. Forecast and chart
    let forecast = LocalForecastEngine::default().forecast(&history, 4).unwrap();
    let chart = ForecastChart::overlay(&series, &forecast);
    assert_eq!(chart.len(), 18);
    assert_eq!(chart.actual.data.len(), chart.predicted.data.len());
}

#[tokio::test]
async fn test_service_with_remote_forecaster() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "predictions": [10.5, 11.0] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let file = create_sales_file();
    let config = StatisticsConfig::default();
    let predictor =
        RemoteForecastClient::new(format!("{}/predict", server.uri()), Duration::from_secs(2))
            .unwrap();
    let svc = StatisticsService::new(
        Arc::new(CsvSalesDataSource::new(file.path())),
        Arc::new(predictor),
        &config,
    );

    let report = svc
        .product_report(StatisticsMode::Historical, "42", 2)
        .await
        .unwrap();

    assert_eq!(report.outcome.source, ForecastSource::Remote);
    assert_eq!(report.outcome.forecast.observed(), vec![10.5, 11.0]);
    assert_eq!(report.chart.len(), 16);
    // History is exactly the minimum, so no back-test slot is filled
    assert_eq!(report.accuracy.paired, 0);
}
