//! Runtime configuration for the statistics service
//!
//! Values are layered with the `config` crate: built-in defaults, then an
//! optional `config/sales_stats.{toml,json,yaml}` file, then `SALES_STATS__*`
//! environment variables. The result is checked with `validator`.

use crate::engine::{LocalForecastEngine, MIN_HISTORY};
use crate::error::{ForecastError, Result};
use crate::models::arima::ArimaOrder;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};
use validator::{Validate, ValidationError};

const CONFIG_FILE: &str = "config/sales_stats";
const ENV_PREFIX: &str = "SALES_STATS";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_HISTORICAL_PATH: &str = "/pays/history";
pub const DEFAULT_WINDOWED_PATH: &str = "/pays/statistic";
pub const DEFAULT_PREDICT_URL: &str = "http://localhost:8000/predict";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REALTIME_WINDOW_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    #[validate(custom = "validate_log_level")]
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StatisticsConfig {
    /// Base URL of the data-access API
    #[validate(url)]
    pub api_base_url: String,
    pub historical_path: String,
    pub windowed_path: String,
    /// Remote forecasting endpoint
    #[validate(url)]
    pub predict_url: String,
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
    #[validate(range(min = 1, max = 366))]
    pub realtime_window_days: i64,
    #[validate(range(min = 1))]
    pub min_history: usize,
    #[validate(custom = "validate_order")]
    pub default_order: ArimaOrder,
    #[validate]
    pub logging: LoggingConfig,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            historical_path: DEFAULT_HISTORICAL_PATH.to_string(),
            windowed_path: DEFAULT_WINDOWED_PATH.to_string(),
            predict_url: DEFAULT_PREDICT_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            realtime_window_days: DEFAULT_REALTIME_WINDOW_DAYS,
            min_history: MIN_HISTORY,
            default_order: ArimaOrder::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl StatisticsConfig {
    /// Load from the default file location and the environment
    pub fn load() -> Result<Self> {
        if !Path::new("config").exists() {
            info!("config directory not found; using defaults and environment variables");
        }
        Self::from_builder(
            defaults()?
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(Environment::with_prefix(ENV_PREFIX).separator("__")),
        )
    }

    /// Load from an explicit file, without consulting the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_builder(defaults()?.add_source(File::from(path.as_ref())))
    }

    fn from_builder(builder: ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let loaded: StatisticsConfig = builder.build()?.try_deserialize()?;
        loaded.validate().map_err(|e| {
            error!("statistics configuration failed validation: {:?}", e);
            ForecastError::from(e)
        })?;
        Ok(loaded)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn historical_url(&self) -> String {
        join_url(&self.api_base_url, &self.historical_path)
    }

    pub fn windowed_url(&self) -> String {
        join_url(&self.api_base_url, &self.windowed_path)
    }

    /// Local engine configured with this order and minimum history
    pub fn engine(&self) -> LocalForecastEngine {
        LocalForecastEngine::new(self.default_order).with_min_history(self.min_history)
    }
}

fn defaults() -> Result<ConfigBuilder<config::builder::DefaultState>> {
    let d = StatisticsConfig::default();
    Ok(Config::builder()
        .set_default("api_base_url", d.api_base_url)?
        .set_default("historical_path", d.historical_path)?
        .set_default("windowed_path", d.windowed_path)?
        .set_default("predict_url", d.predict_url)?
        .set_default("request_timeout_secs", d.request_timeout_secs)?
        .set_default("realtime_window_days", d.realtime_window_days)?
        .set_default("min_history", d.min_history as u64)?
        .set_default("default_order.p", d.default_order.p as u64)?
        .set_default("default_order.d", d.default_order.d as u64)?
        .set_default("default_order.q", d.default_order.q as u64)?
        .set_default("logging.level", d.logging.level)?
        .set_default("logging.json", d.logging.json)?)
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn validate_log_level(level: &str) -> std::result::Result<(), ValidationError> {
    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if valid_levels.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        let mut err = ValidationError::new("log_level");
        err.message = Some("Must be one of: trace, debug, info, warn, error".into());
        Err(err)
    }
}

fn validate_order(order: &ArimaOrder) -> std::result::Result<(), ValidationError> {
    if order.d > 2 || order.p > 10 || order.q > 10 {
        let mut err = ValidationError::new("default_order");
        err.message = Some("p and q must be at most 10, d at most 2".into());
        return Err(err);
    }
    Ok(())
}
