//! Local forecasting engine
//!
//! Wraps the ARIMA model with the policies callers rely on: a minimum
//! history length, rescaling of large magnitudes, and clamping of negative
//! forecasts. Two entry points are exposed on purpose: [`LocalForecastEngine::forecast`]
//! reports failures, [`LocalForecastEngine::forecast_resilient`] degrades to a
//! forecast of missing markers.

use crate::error::{ForecastError, Result};
use crate::models::arima::{ArimaModel, ArimaOrder};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use sales_math::stats::{ensure_finite, max_value};
use tracing::{error, warn};

/// Shortest history the engine will forecast from
pub const MIN_HISTORY: usize = 14;

/// Inputs whose maximum exceeds this are divided by that maximum before training
pub const SCALE_THRESHOLD: f64 = 1e6;

/// ARIMA-backed forecaster for daily sales volumes
#[derive(Debug, Clone)]
pub struct LocalForecastEngine {
    order: ArimaOrder,
    min_history: usize,
}

impl Default for LocalForecastEngine {
    fn default() -> Self {
        Self::new(ArimaOrder::default())
    }
}

impl LocalForecastEngine {
    pub fn new(order: ArimaOrder) -> Self {
        Self {
            order,
            min_history: MIN_HISTORY,
        }
    }

    pub fn with_min_history(mut self, min_history: usize) -> Self {
        self.min_history = min_history;
        self
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn min_history(&self) -> usize {
        self.min_history
    }

    /// Forecast `horizon` days with the engine's order.
    ///
    /// A history shorter than the minimum yields `horizon` missing markers.
    /// Non-finite input is a `ValidationError`; model failures are a
    /// `ForecastingError`.
    pub fn forecast(&self, history: &[f64], horizon: usize) -> Result<ForecastResult> {
        self.forecast_with_order(history, horizon, self.order)
    }

    /// Strict forecast with an explicit order
    pub fn forecast_with_order(
        &self,
        history: &[f64],
        horizon: usize,
        order: ArimaOrder,
    ) -> Result<ForecastResult> {
        if history.len() < self.min_history {
            warn!(
                observations = history.len(),
                required = self.min_history,
                "insufficient history, returning an empty forecast"
            );
            return Ok(ForecastResult::missing(horizon));
        }

        let values = train_and_predict(history, horizon, order)?;
        Ok(ForecastResult::from_values(values).clamp_non_negative())
    }

    /// Forecast that never fails: any error becomes `horizon` missing markers
    pub fn forecast_resilient(&self, history: &[f64], horizon: usize) -> ForecastResult {
        match self.forecast(history, horizon) {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, horizon, "local forecast failed, returning an empty forecast");
                ForecastResult::missing(horizon)
            }
        }
    }

    /// Predict the next single day, clamped at zero.
    ///
    /// Unlike [`forecast`](Self::forecast) this does not apply the minimum
    /// history policy; the model's own minimum still applies.
    pub fn predict_one(&self, history: &[f64], order: ArimaOrder) -> Result<f64> {
        let values = train_and_predict(history, 1, order)?;
        let predicted = values.first().copied().ok_or_else(|| {
            ForecastError::ForecastingError("Model returned no value for one step".to_string())
        })?;
        Ok(predicted.max(0.0))
    }

    /// One-step-ahead back-test over the whole history.
    ///
    /// Slot `i` holds the prediction for day `i` made from `history[..i]`,
    /// for every `i` at or past the minimum history; earlier slots and failed
    /// fits are missing.
    pub fn rolling_one_step(&self, history: &[f64], order: ArimaOrder) -> ForecastResult {
        let values: Vec<Option<f64>> = (0..history.len())
            .map(|i| {
                if i < self.min_history {
                    return None;
                }
                match self.predict_one(&history[..i], order) {
                    Ok(v) => Some(v),
                    Err(e) => {
                        warn!(error = %e, day = i, "one-step back-test prediction failed");
                        None
                    }
                }
            })
            .collect();

        ForecastResult::from_slots(values)
    }
}

/// Validate, rescale, fit and forecast `steps` values on the input's scale
fn train_and_predict(history: &[f64], steps: usize, order: ArimaOrder) -> Result<Vec<f64>> {
    ensure_finite(history).map_err(|e| {
        ForecastError::ValidationError(format!("training data contains an invalid number: {}", e))
    })?;

    let max_val =
        max_value(history).map_err(|e| ForecastError::ForecastingError(e.to_string()))?;
    let scale = if max_val > SCALE_THRESHOLD { max_val } else { 1.0 };
    let normalized: Vec<f64> = if scale != 1.0 {
        history.iter().map(|x| x / scale).collect()
    } else {
        history.to_vec()
    };

    let model = ArimaModel::new(order);
    let forecast = model
        .train(&normalized)
        .and_then(|trained| trained.forecast(steps))
        .map_err(|e| {
            error!(model = %order, error = %e, "ARIMA training or prediction failed");
            match e {
                ForecastError::ForecastingError(_) => e,
                other => ForecastError::ForecastingError(other.to_string()),
            }
        })?;

    let values = forecast.observed();
    if values.len() != steps {
        return Err(ForecastError::ForecastingError(format!(
            "{} returned {} values for {} steps",
            order,
            values.len(),
            steps
        )));
    }

    Ok(if scale != 1.0 {
        values.into_iter().map(|x| x * scale).collect()
    } else {
        values
    })
}
