//! Summary statistics over daily quantity series

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Basic description of a series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Check that every value is finite, reporting the first offending index
pub fn ensure_finite(values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(MathError::InvalidInput(format!(
            "Value at index {} is not a finite number ({})",
            idx, values[idx]
        ))),
        None => Ok(()),
    }
}

/// Largest value of a non-empty series
pub fn max_value(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the maximum of an empty series".to_string(),
        ));
    }
    Ok(values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Arithmetic mean of a non-empty series
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot take the mean of an empty series".to_string(),
        ));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Count, sum, mean and range of a non-empty series
pub fn summarize(values: &[f64]) -> Result<Summary> {
    let mean = mean(values)?;
    let max = max_value(values)?;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);

    Ok(Summary {
        count: values.len(),
        sum: values.iter().sum(),
        mean,
        min,
        max,
    })
}
