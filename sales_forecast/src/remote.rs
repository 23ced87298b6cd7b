//! Client for the remote forecasting service
//!
//! The service takes `{ historical_data, days_to_predict }` and answers
//! `{ predictions }`. A single attempt is made per call; there are no retries.

use crate::error::{ForecastError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Anything that can turn a sales history into future values
#[async_trait]
pub trait SalesPredictor: Send + Sync {
    async fn predict_sales(&self, history: &[f64], horizon: usize) -> Result<Vec<f64>>;
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    historical_data: &'a [f64],
    days_to_predict: usize,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predictions: Vec<f64>,
}

/// HTTP client for the remote forecasting endpoint
#[derive(Debug, Clone)]
pub struct RemoteForecastClient {
    client: reqwest::Client,
    url: String,
}

impl RemoteForecastClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Ask the service for `horizon` predictions.
    ///
    /// Returns `None` on any failure: connection error, timeout, non-2xx
    /// status, or a body that is not `{ "predictions": [number, ...] }`.
    /// The predictions are returned as received.
    pub async fn request_forecast(&self, history: &[f64], horizon: usize) -> Option<Vec<f64>> {
        match self.predict_sales(history, horizon).await {
            Ok(predictions) => Some(predictions),
            Err(e) => {
                warn!(url = %self.url, error = %e, "remote forecast unavailable");
                None
            }
        }
    }
}

#[async_trait]
impl SalesPredictor for RemoteForecastClient {
    #[instrument(skip(self, history), fields(url = %self.url, observations = history.len()))]
    async fn predict_sales(&self, history: &[f64], horizon: usize) -> Result<Vec<f64>> {
        let body = PredictRequest {
            historical_data: history,
            days_to_predict: horizon,
        };

        let response = self.client.post(&self.url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::TransportError(format!(
                "forecast service answered {}",
                status
            )));
        }

        let parsed: PredictResponse = response.json().await.map_err(|e| {
            ForecastError::DataFormatError(format!("unexpected forecast response: {}", e))
        })?;

        debug!(predictions = parsed.predictions.len(), "remote forecast received");
        Ok(parsed.predictions)
    }
}
