//! Sales data sources
//!
//! A source hands back the raw payload `{ "data": [ { date, payDetailList } ] }`
//! exactly as the data-access API would; shape checks happen in the caller.

use crate::config::StatisticsConfig;
use crate::error::{ForecastError, Result};
use crate::utils::{format_day, parse_day};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Envelope codes at or above this are not treated as application errors
const ENVELOPE_CODE_LIMIT: i64 = 1000;

#[async_trait]
pub trait SalesDataSource: Send + Sync {
    /// Every recorded day
    async fn fetch_historical_sales(&self) -> Result<Value>;

    /// Days in `start..=end`
    async fn fetch_windowed_sales(&self, start: NaiveDate, end: NaiveDate) -> Result<Value>;
}

/// Data-access API over HTTP
#[derive(Debug, Clone)]
pub struct HttpSalesDataSource {
    client: reqwest::Client,
    historical_url: String,
    windowed_url: String,
}

impl HttpSalesDataSource {
    pub fn new(
        historical_url: impl Into<String>,
        windowed_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            historical_url: historical_url.into(),
            windowed_url: windowed_url.into(),
        })
    }

    pub fn from_config(config: &StatisticsConfig) -> Result<Self> {
        Self::new(
            config.historical_url(),
            config.windowed_url(),
            config.request_timeout(),
        )
    }

    async fn get_json(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ForecastError::TransportError(format!(
                "sales API answered {}",
                status
            )));
        }

        let payload: Value = response.json().await.map_err(|e| {
            ForecastError::DataFormatError(format!("sales API returned invalid JSON: {}", e))
        })?;
        check_envelope(&payload)?;
        Ok(payload)
    }
}

#[async_trait]
impl SalesDataSource for HttpSalesDataSource {
    #[instrument(skip(self), fields(url = %self.historical_url))]
    async fn fetch_historical_sales(&self) -> Result<Value> {
        self.get_json(self.client.get(&self.historical_url)).await
    }

    #[instrument(skip(self), fields(url = %self.windowed_url))]
    async fn fetch_windowed_sales(&self, start: NaiveDate, end: NaiveDate) -> Result<Value> {
        let request = self.client.get(&self.windowed_url).query(&[
            ("startDate", format_day(start)),
            ("endDate", format_day(end)),
        ]);
        self.get_json(request).await
    }
}

/// The API wraps results as `{ code, msg, data }`; a present code other
/// than 200 (and below 1000) is an application-level failure
fn check_envelope(payload: &Value) -> Result<()> {
    let Some(code) = payload.get("code").and_then(Value::as_i64) else {
        return Ok(());
    };
    if code == 200 || code >= ENVELOPE_CODE_LIMIT {
        return Ok(());
    }
    let msg = payload
        .get("msg")
        .and_then(Value::as_str)
        .unwrap_or("request failed");
    Err(ForecastError::TransportError(format!(
        "sales API error {}: {}",
        code, msg
    )))
}

#[derive(Debug, Deserialize)]
struct CsvSaleRow {
    date: String,
    #[serde(rename = "itemId")]
    item_id: String,
    #[serde(default)]
    name: Option<String>,
    num: f64,
}

/// Sales records read from a `date,itemId,name,num` CSV file
#[derive(Debug, Clone)]
pub struct CsvSalesDataSource {
    path: PathBuf,
}

impl CsvSalesDataSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Group rows into daily batches, keeping only days accepted by `keep`
    fn load<F>(&self, keep: F) -> Result<Value>
    where
        F: Fn(NaiveDate) -> bool,
    {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut days: BTreeMap<NaiveDate, Vec<Value>> = BTreeMap::new();

        for row in reader.deserialize() {
            let row: CsvSaleRow = row.map_err(|e| {
                ForecastError::DataFormatError(format!(
                    "invalid sales row in {}: {}",
                    self.path.display(),
                    e
                ))
            })?;
            let date = parse_day(&row.date)
                .map_err(|e| ForecastError::DataFormatError(e.to_string()))?;
            if !keep(date) {
                continue;
            }

            let mut item = json!({ "itemId": row.item_id, "num": row.num });
            if let Some(name) = row.name.filter(|n| !n.is_empty()) {
                item["name"] = Value::String(name);
            }
            days.entry(date).or_default().push(item);
        }

        debug!(path = %self.path.display(), days = days.len(), "loaded sales CSV");

        let data: Vec<Value> = days
            .into_iter()
            .map(|(date, items)| json!({ "date": format_day(date), "payDetailList": items }))
            .collect();
        Ok(json!({ "data": data }))
    }
}

#[async_trait]
impl SalesDataSource for CsvSalesDataSource {
    async fn fetch_historical_sales(&self) -> Result<Value> {
        self.load(|_| true)
    }

    async fn fetch_windowed_sales(&self, start: NaiveDate, end: NaiveDate) -> Result<Value> {
        self.load(|date| date >= start && date <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_codes() {
        assert!(check_envelope(&json!({ "data": [] })).is_ok());
        assert!(check_envelope(&json!({ "code": 200, "data": [] })).is_ok());
        assert!(check_envelope(&json!({ "code": 1001, "data": [] })).is_ok());

        let err = check_envelope(&json!({ "code": 500, "msg": "db down" })).unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("db down"));
    }
}
