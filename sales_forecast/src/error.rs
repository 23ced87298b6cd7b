//! Error types for the sales_forecast crate

use polars::prelude::PolarsError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Malformed numeric input handed to the local engine
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Model training or prediction failed
    #[error("Forecasting error: {0}")]
    ForecastingError(String),

    /// Payload from the data-access collaborator has the wrong shape
    #[error("Data format error: {0}")]
    DataFormatError(String),

    /// Network, server or timeout failure while talking to a collaborator
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Invalid or unloadable configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error from the numeric building blocks
    #[error("Math error: {0}")]
    MathError(#[from] sales_math::MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV decoding
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from Polars operations
    #[error("Polars error: {0}")]
    PolarsError(String),
}

impl ForecastError {
    /// Whether the failure came from a malformed payload rather than transport
    pub fn is_data_format(&self) -> bool {
        matches!(self, ForecastError::DataFormatError(_))
    }

    /// Whether the failure came from the network or the remote server
    pub fn is_transport(&self) -> bool {
        matches!(self, ForecastError::TransportError(_))
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<PolarsError> for ForecastError {
    fn from(err: PolarsError) -> Self {
        ForecastError::PolarsError(err.to_string())
    }
}

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<reqwest::Error> for ForecastError {
    fn from(err: reqwest::Error) -> Self {
        ForecastError::TransportError(err.to_string())
    }
}

impl From<config::ConfigError> for ForecastError {
    fn from(err: config::ConfigError) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ForecastError {
    fn from(err: validator::ValidationErrors) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}
