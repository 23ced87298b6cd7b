//! Forecasting models for daily sales series

use crate::error::{ForecastError, Result};
use serde::Serialize;
use std::fmt::Debug;

/// Forecast result: one slot per future period, `None` where no forecast exists
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastResult {
    /// Forecasted values
    values: Vec<Option<f64>>,
    /// Number of periods forecasted
    horizon: usize,
}

impl ForecastResult {
    /// Create a new forecast result
    pub fn new(values: Vec<Option<f64>>, horizon: usize) -> Result<Self> {
        if values.len() != horizon {
            return Err(ForecastError::ValidationError(format!(
                "Values length ({}) doesn't match horizon ({})",
                values.len(),
                horizon
            )));
        }

        Ok(Self { values, horizon })
    }

    /// A forecast in which every period carries a value
    pub fn from_values(values: Vec<f64>) -> Self {
        let horizon = values.len();
        Self {
            values: values.into_iter().map(Some).collect(),
            horizon,
        }
    }

    /// A forecast whose horizon is the number of slots given
    pub fn from_slots(values: Vec<Option<f64>>) -> Self {
        let horizon = values.len();
        Self { values, horizon }
    }

    /// A forecast of `horizon` missing markers, meaning "no forecast available"
    pub fn missing(horizon: usize) -> Self {
        Self {
            values: vec![None; horizon],
            horizon,
        }
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Get the number of periods forecasted
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// True when no period carries a value (also true for a zero horizon)
    pub fn is_all_missing(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// The values that are present, in order
    pub fn observed(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }

    /// Clamp every present value at zero; sales volume cannot be negative
    pub fn clamp_non_negative(mut self) -> Self {
        for v in self.values.iter_mut().flatten() {
            if *v < 0.0 {
                *v = 0.0;
            }
        }
        self
    }

    pub fn into_values(self) -> Vec<Option<f64>> {
        self.values
    }
}

/// Trained forecast model
pub trait TrainedForecastModel: Debug {
    /// Generate forecast for future periods
    fn forecast(&self, horizon: usize) -> Result<ForecastResult>;

    /// Name of the model
    fn name(&self) -> &str;
}

/// Forecast model that can be trained on a numeric series
pub trait ForecastModel: Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedForecastModel;

    /// Train the model on the full series
    fn train(&self, data: &[f64]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

pub mod arima;
