//! # Sales Math
//!
//! Numeric building blocks used by the sales forecasting engine.
//! This crate provides series differencing and integration, a bounded
//! Nelder-Mead simplex optimizer, and summary statistics over finite values.

use thiserror::Error;

pub mod differencing;
pub mod optimization;
pub mod stats;

/// Errors that can occur in series calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for series math operations
pub type Result<T> = std::result::Result<T, MathError>;
