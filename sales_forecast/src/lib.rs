//! # Sales Forecast
//!
//! Daily sales statistics and forecasting for the commodity admin dashboard.
//!
//! ## Features
//!
//! - Aggregation of raw daily sales records into per-product and overall series
//! - Local ARIMA(p, d, q) forecasting with a minimum-history policy
//! - Optional delegation to a remote forecasting service, with local fallback
//! - Accuracy scoring of forecasts against realized sales
//! - Chart-ready line series for actual and predicted values
//!
//! ## Missing values
//!
//! Series carry `Option<f64>`: `None` marks a day without records or a
//! forecast slot with no value, and is never confused with zero sales.
//!
//! ## Quick Start
//!
//! ```rust
//! use sales_forecast::engine::LocalForecastEngine;
//! use sales_forecast::metrics::accuracy_score;
//!
//! let history = [5.0, 6.0, 5.0, 7.0, 8.0, 6.0, 5.0, 9.0, 10.0, 8.0, 7.0, 9.0, 11.0, 10.0];
//!
//! // Forecast the next three days
//! let engine = LocalForecastEngine::default();
//! let forecast = engine.forecast_resilient(&history, 3);
//! assert_eq!(forecast.horizon(), 3);
//!
//! // Score it once the real numbers are in
//! let actual = [Some(11.0), Some(12.0), Some(10.0)];
//! let score = accuracy_score(&actual, forecast.values());
//! assert!(score <= 1.0);
//! ```
//!
//! Fetching from the data-access API and the remote forecaster goes through
//! [`statistics::StatisticsService`], configured by [`config::StatisticsConfig`].

pub mod chart;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod remote;
pub mod source;
pub mod statistics;
pub mod utils;

// Re-export commonly used types
pub use crate::chart::{ChartSeriesDescriptor, ForecastChart};
pub use crate::config::StatisticsConfig;
pub use crate::data::{DailySalesBatch, Product, SaleLineItem, SalesAggregator, SalesSeries};
pub use crate::engine::LocalForecastEngine;
pub use crate::error::ForecastError;
pub use crate::metrics::{accuracy_score, AccuracyReport};
pub use crate::models::arima::ArimaOrder;
pub use crate::models::{ForecastModel, ForecastResult};
pub use crate::remote::{RemoteForecastClient, SalesPredictor};
pub use crate::source::{CsvSalesDataSource, HttpSalesDataSource, SalesDataSource};
pub use crate::statistics::{StatisticsMode, StatisticsService};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
