//! Statistics service
//!
//! Ties the data source, the aggregator, the local engine and the remote
//! predictor together into the operations the admin dashboard calls.

use crate::chart::ForecastChart;
use crate::config::StatisticsConfig;
use crate::data::{DailySalesBatch, GapPolicy, Product, SalesAggregator, SalesSeries};
use crate::engine::LocalForecastEngine;
use crate::error::{ForecastError, Result};
use crate::metrics::{evaluate_accuracy, AccuracyReport};
use crate::models::arima::ArimaOrder;
use crate::models::ForecastResult;
use crate::remote::{RemoteForecastClient, SalesPredictor};
use crate::source::{HttpSalesDataSource, SalesDataSource};
use crate::utils::past_date;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Which slice of the sales history to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatisticsMode {
    /// Every retained day
    Historical,
    /// A trailing window ending today
    Realtime,
}

impl fmt::Display for StatisticsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatisticsMode::Historical => write!(f, "historical"),
            StatisticsMode::Realtime => write!(f, "realtime"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsData {
    pub series: Vec<DailySalesBatch>,
    pub products: Vec<Product>,
}

/// Where a forecast came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastSource {
    Remote,
    Local,
    /// Neither side produced a value
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastOutcome {
    pub forecast: ForecastResult,
    pub source: ForecastSource,
}

/// Everything the dashboard shows for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductReport {
    pub mode: StatisticsMode,
    pub product: Product,
    pub history: SalesSeries,
    pub backtest: ForecastResult,
    pub accuracy: AccuracyReport,
    pub outcome: ForecastOutcome,
    pub chart: ForecastChart,
}

/// First and last day of the realtime window ending on `today`
pub fn realtime_window(today: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
    (past_date(today, days), today)
}

pub struct StatisticsService {
    source: Arc<dyn SalesDataSource>,
    predictor: Arc<dyn SalesPredictor>,
    engine: LocalForecastEngine,
    request_timeout: Duration,
    realtime_window_days: i64,
}

impl fmt::Debug for StatisticsService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatisticsService")
            .field("engine", &self.engine)
            .field("request_timeout", &self.request_timeout)
            .field("realtime_window_days", &self.realtime_window_days)
            .finish_non_exhaustive()
    }
}

impl StatisticsService {
    pub fn new(
        source: Arc<dyn SalesDataSource>,
        predictor: Arc<dyn SalesPredictor>,
        config: &StatisticsConfig,
    ) -> Self {
        Self {
            source,
            predictor,
            engine: config.engine(),
            request_timeout: config.request_timeout(),
            realtime_window_days: config.realtime_window_days,
        }
    }

    /// Service talking HTTP to both the data-access API and the forecast service
    pub fn from_config(config: &StatisticsConfig) -> Result<Self> {
        let source = HttpSalesDataSource::from_config(config)?;
        let predictor = RemoteForecastClient::new(&config.predict_url, config.request_timeout())?;
        Ok(Self::new(Arc::new(source), Arc::new(predictor), config))
    }

    pub fn engine(&self) -> &LocalForecastEngine {
        &self.engine
    }

    /// Fetch sales for `mode` and extract its product catalog.
    ///
    /// A payload without a `data` array is a `DataFormatError`. Any
    /// other failure, timeouts included, is a `TransportError` naming the mode.
    #[instrument(skip(self))]
    pub async fn get_statistics_data(&self, mode: StatisticsMode) -> Result<StatisticsData> {
        let payload = self.fetch(mode).await.map_err(|e| match e {
            ForecastError::DataFormatError(_) => e,
            other => ForecastError::TransportError(format!(
                "failed to fetch {} sales data: {}",
                mode, other
            )),
        })?;

        let Some(data) = payload.get("data").filter(|d| d.is_array()) else {
            return Err(ForecastError::DataFormatError(format!(
                "{} sales data is not an array",
                mode
            )));
        };

        let series = SalesAggregator::parse_batches(data);
        let products = SalesAggregator::extract_products(data);
        info!(%mode, days = series.len(), products = products.len(), "sales data loaded");
        Ok(StatisticsData { series, products })
    }

    async fn fetch(&self, mode: StatisticsMode) -> Result<serde_json::Value> {
        let request = async {
            match mode {
                StatisticsMode::Historical => self.source.fetch_historical_sales().await,
                StatisticsMode::Realtime => {
                    let today = Utc::now().date_naive();
                    let (start, end) = realtime_window(today, self.realtime_window_days);
                    debug!(%start, %end, "fetching realtime window");
                    self.source.fetch_windowed_sales(start, end).await
                }
            }
        };

        tokio::time::timeout(self.request_timeout, request)
            .await
            .map_err(|_| {
                ForecastError::TransportError(format!(
                    "timed out after {}s",
                    self.request_timeout.as_secs()
                ))
            })?
    }

    /// Remote forecast, or `None` without a call when `history` is empty
    #[instrument(skip(self, history), fields(observations = history.len()))]
    pub async fn get_sales_prediction(&self, history: &[f64], horizon: usize) -> Option<Vec<f64>> {
        if history.is_empty() {
            return None;
        }
        match self.predictor.predict_sales(history, horizon).await {
            Ok(predictions) => Some(predictions),
            Err(e) => {
                warn!(error = %e, "sales prediction failed");
                None
            }
        }
    }

    /// Remote forecast first, the local engine when the remote yields nothing.
    ///
    /// A remote answer whose length differs from `horizon` counts as no
    /// answer; accepted remote values are clamped at zero.
    pub async fn forecast_with_fallback(&self, history: &[f64], horizon: usize) -> ForecastOutcome {
        if let Some(predictions) = self.get_sales_prediction(history, horizon).await {
            let slots = predictions.into_iter().map(Some).collect();
            match ForecastResult::new(slots, horizon) {
                Ok(forecast) => {
                    return ForecastOutcome {
                        forecast: forecast.clamp_non_negative(),
                        source: ForecastSource::Remote,
                    };
                }
                Err(e) => warn!(error = %e, "remote forecast has the wrong length, using local engine"),
            }
        }

        let forecast = self.engine.forecast_resilient(history, horizon);
        let source = if horizon > 0 && forecast.is_all_missing() {
            ForecastSource::Unavailable
        } else {
            ForecastSource::Local
        };
        ForecastOutcome { forecast, source }
    }

    /// Fetch, back-test, score and forecast one product
    #[instrument(skip(self))]
    pub async fn product_report(
        &self,
        mode: StatisticsMode,
        product_id: &str,
        horizon: usize,
    ) -> Result<ProductReport> {
        let data = self.get_statistics_data(mode).await?;
        let product = data
            .products
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or_else(|| {
                ForecastError::ValidationError(format!(
                    "product '{}' has no {} sales",
                    product_id, mode
                ))
            })?;

        let history = SalesAggregator::product_series(&data.series, product_id);
        let filled = history.fill_gaps(GapPolicy::Zero);
        let complete = SalesSeries::new(
            history.dates().to_vec(),
            filled.iter().copied().map(Some).collect(),
        )?;

        let backtest = self
            .engine
            .rolling_one_step(&filled, ArimaOrder::single_step());
        let accuracy = evaluate_accuracy(complete.values(), backtest.values());
        let outcome = self.forecast_with_fallback(&filled, horizon).await;
        let chart = ForecastChart::overlay(&complete, &outcome.forecast);

        Ok(ProductReport {
            mode,
            product,
            history: complete,
            backtest,
            accuracy,
            outcome,
            chart,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_display() {
        assert_eq!(StatisticsMode::Historical.to_string(), "historical");
        assert_eq!(StatisticsMode::Realtime.to_string(), "realtime");
    }

    #[test]
    fn test_realtime_window() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let (start, end) = realtime_window(today, 14);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(end, today);
    }
}
