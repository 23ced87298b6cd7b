//! ARIMA models for daily sales forecasting

use crate::error::{ForecastError, Result};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use sales_math::differencing::{difference, integrate};
use sales_math::optimization::SimplexOptimizer;
use sales_math::stats::{ensure_finite, mean};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// AR and MA coefficients are kept inside the stationary/invertible region
const COEFFICIENT_BOUND: f64 = 0.99;

/// ARIMA order parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }

    /// Order used by the single-step helper
    pub fn single_step() -> Self {
        Self::new(1, 1, 1)
    }

    /// Smallest series length the order can be fitted on
    pub fn min_observations(&self) -> usize {
        self.d + self.p.max(self.q) + 2
    }
}

impl Default for ArimaOrder {
    fn default() -> Self {
        Self::new(3, 1, 1)
    }
}

impl std::fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

/// ARIMA model (AutoRegressive Integrated Moving Average)
#[derive(Debug, Clone)]
pub struct ArimaModel {
    /// Name of the model
    name: String,
    order: ArimaOrder,
    optimizer: SimplexOptimizer,
}

/// Trained ARIMA model
#[derive(Debug, Clone)]
pub struct TrainedArimaModel {
    /// Name of the model
    name: String,
    order: ArimaOrder,
    /// Mean of the differenced series
    intercept: f64,
    /// Fitted AR coefficients
    ar_coefficients: Vec<f64>,
    /// Fitted MA coefficients
    ma_coefficients: Vec<f64>,
    /// Training series on its original scale
    history: Vec<f64>,
    /// Training series after differencing
    differenced: Vec<f64>,
    /// Residuals on the differenced scale
    residuals: Vec<f64>,
    residual_variance: f64,
}

impl ArimaModel {
    /// Create a new ARIMA model
    pub fn new(order: ArimaOrder) -> Self {
        Self {
            name: order.to_string(),
            order,
            optimizer: SimplexOptimizer::default(),
        }
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    /// Estimate intercept, AR and MA coefficients by conditional least squares
    fn estimate(&self, differenced: &[f64]) -> Result<(f64, Vec<f64>, Vec<f64>)> {
        let ArimaOrder { p, q, .. } = self.order;
        let center = mean(differenced)?;

        if p == 0 && q == 0 {
            return Ok((center, Vec::new(), Vec::new()));
        }

        let mut initial = Vec::with_capacity(1 + p + q);
        initial.push(center);
        initial.extend((0..p).map(|i| 0.1 / (i + 1) as f64));
        initial.extend((0..q).map(|i| 0.1 / (i + 1) as f64));

        let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
        bounds.extend(std::iter::repeat((-COEFFICIENT_BOUND, COEFFICIENT_BOUND)).take(p + q));

        let solution = self
            .optimizer
            .minimize(
                |params| {
                    let (_, css) = conditional_residuals(
                        differenced,
                        params[0],
                        &params[1..1 + p],
                        &params[1 + p..],
                    );
                    css
                },
                &initial,
                Some(&bounds),
            )
            .map_err(|e| {
                ForecastError::ForecastingError(format!("{} failed to fit: {}", self.name, e))
            })?;

        debug!(
            model = %self.name,
            iterations = solution.iterations,
            converged = solution.converged,
            css = solution.value,
            "fitted ARIMA coefficients"
        );

        let point = solution.point;
        Ok((point[0], point[1..1 + p].to_vec(), point[1 + p..].to_vec()))
    }
}

impl Default for ArimaModel {
    fn default() -> Self {
        Self::new(ArimaOrder::default())
    }
}

impl ForecastModel for ArimaModel {
    type Trained = TrainedArimaModel;

    fn train(&self, data: &[f64]) -> Result<TrainedArimaModel> {
        let needed = self.order.min_observations();
        if data.len() < needed {
            return Err(ForecastError::ForecastingError(format!(
                "Insufficient data for {}. Need at least {} observations, have {}.",
                self.name,
                needed,
                data.len()
            )));
        }
        ensure_finite(data).map_err(|e| ForecastError::ValidationError(e.to_string()))?;

        let differenced = difference(data, self.order.d)?;
        let (intercept, ar_coefficients, ma_coefficients) = self.estimate(&differenced)?;

        if !intercept.is_finite()
            || ar_coefficients.iter().chain(ma_coefficients.iter()).any(|c| !c.is_finite())
        {
            return Err(ForecastError::ForecastingError(format!(
                "{} produced non-finite coefficients",
                self.name
            )));
        }

        let (residuals, css) =
            conditional_residuals(&differenced, intercept, &ar_coefficients, &ma_coefficients);
        let start = self.order.p.max(self.order.q);
        let residual_variance = css / differenced.len().saturating_sub(start).max(1) as f64;

        Ok(TrainedArimaModel {
            name: self.name.clone(),
            order: self.order,
            intercept,
            ar_coefficients,
            ma_coefficients,
            history: data.to_vec(),
            differenced,
            residuals,
            residual_variance,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedArimaModel {
    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn ar_coefficients(&self) -> &[f64] {
        &self.ar_coefficients
    }

    pub fn ma_coefficients(&self) -> &[f64] {
        &self.ma_coefficients
    }

    pub fn residual_variance(&self) -> f64 {
        self.residual_variance
    }

    /// Recursive forecast on the differenced scale; future shocks are zero
    fn forecast_differenced(&self, horizon: usize) -> Vec<f64> {
        let mut series = self.differenced.clone();
        let mut shocks = self.residuals.clone();

        for _ in 0..horizon {
            let t = series.len();
            let mut next = self.intercept;
            for (i, coef) in self.ar_coefficients.iter().enumerate() {
                if t > i {
                    next += coef * (series[t - 1 - i] - self.intercept);
                }
            }
            for (i, coef) in self.ma_coefficients.iter().enumerate() {
                if t > i {
                    next += coef * shocks[t - 1 - i];
                }
            }
            series.push(next);
            shocks.push(0.0);
        }

        series.split_off(self.differenced.len())
    }
}

impl TrainedForecastModel for TrainedArimaModel {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        if horizon == 0 {
            return Ok(ForecastResult::missing(0));
        }

        let differenced = self.forecast_differenced(horizon);
        let forecasts = integrate(&differenced, &self.history, self.order.d)?;

        if let Some(bad) = forecasts.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::ForecastingError(format!(
                "{} produced a non-finite forecast ({})",
                self.name, bad
            )));
        }

        Ok(ForecastResult::from_values(forecasts))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Residuals and their sum of squares for the given parameters.
///
/// The first `max(p, q)` residuals are held at zero. A series too short to
/// produce any residual scores `f64::MAX` so the optimizer steers away.
fn conditional_residuals(series: &[f64], intercept: f64, ar: &[f64], ma: &[f64]) -> (Vec<f64>, f64) {
    let n = series.len();
    let start = ar.len().max(ma.len());
    let mut residuals = vec![0.0; n];

    if n <= start {
        return (residuals, f64::MAX);
    }

    let mut css = 0.0;
    for t in start..n {
        let mut predicted = intercept;
        for (i, coef) in ar.iter().enumerate() {
            predicted += coef * (series[t - 1 - i] - intercept);
        }
        for (i, coef) in ma.iter().enumerate() {
            predicted += coef * residuals[t - 1 - i];
        }
        let error = series[t] - predicted;
        residuals[t] = error;
        css += error * error;
    }

    (residuals, css)
}
