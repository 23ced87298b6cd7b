//! Daily sales records and their aggregation into time series
//!
//! Raw payloads arrive as `[{ date, payDetailList: [{ itemId, name?, num }] }]`.
//! [`SalesAggregator`] turns them into a deduplicated product catalog and into
//! per-product or overall daily series with explicit missing markers.

use crate::error::{ForecastError, Result};
use crate::utils::{date_range, format_day, parse_day};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// One line of a day's sales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLineItem {
    /// Join key across batches
    #[serde(rename = "itemId")]
    pub product_id: String,
    #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(rename = "num")]
    pub quantity: f64,
}

impl SaleLineItem {
    /// Display name, falling back to a label synthesized from the id
    pub fn display_name(&self) -> String {
        match self.product_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => placeholder_name(&self.product_id),
        }
    }
}

/// All sales recorded on one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySalesBatch {
    pub date: NaiveDate,
    #[serde(rename = "payDetailList", default)]
    pub line_items: Vec<SaleLineItem>,
}

impl DailySalesBatch {
    pub fn new(date: NaiveDate, line_items: Vec<SaleLineItem>) -> Self {
        Self { date, line_items }
    }

    /// Decode one raw batch, tolerating missing or malformed line items.
    ///
    /// Returns `None` when the batch has no parseable `date`.
    pub fn from_value(raw: &Value) -> Option<Self> {
        let date = raw
            .get("date")
            .and_then(Value::as_str)
            .and_then(|s| parse_day(s).ok())?;

        let line_items = raw
            .get("payDetailList")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(line_item_from_value).collect())
            .unwrap_or_default();

        Some(Self { date, line_items })
    }

    /// Total quantity sold of one product on this day
    pub fn quantity_of(&self, product_id: &str) -> f64 {
        self.line_items
            .iter()
            .filter(|item| item.product_id == product_id)
            .map(|item| item.quantity)
            .sum()
    }

    /// Total quantity sold across every product on this day
    pub fn total_quantity(&self) -> f64 {
        self.line_items.iter().map(|item| item.quantity).sum()
    }
}

/// A product seen in the sales records
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
}

/// How gaps in a series are resolved before training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPolicy {
    /// A day without records counts as zero sales
    Zero,
    /// Days without records are left out of the training window
    Drop,
}

/// Daily series over a contiguous date range; `None` marks a missing day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSeries {
    dates: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

impl SalesSeries {
    /// Create a series, checking that every date has exactly one value
    pub fn new(dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> Result<Self> {
        if dates.len() != values.len() {
            return Err(ForecastError::ValidationError(format!(
                "Dates length ({}) doesn't match values length ({})",
                dates.len(),
                values.len()
            )));
        }
        Ok(Self { dates, values })
    }

    /// An empty series
    pub fn empty() -> Self {
        Self {
            dates: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Number of days carrying a missing marker
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Resolve missing markers into a numeric training series
    pub fn fill_gaps(&self, policy: GapPolicy) -> Vec<f64> {
        match policy {
            GapPolicy::Zero => self.values.iter().map(|v| v.unwrap_or(0.0)).collect(),
            GapPolicy::Drop => self.values.iter().flatten().copied().collect(),
        }
    }

    /// The numeric values, failing if any day is still missing
    pub fn require_complete(&self) -> Result<Vec<f64>> {
        require_complete(&self.values)
    }
}

/// Convert a series with missing markers into plain numbers, rejecting gaps
pub fn require_complete(values: &[Option<f64>]) -> Result<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(idx, v)| {
            v.ok_or_else(|| {
                ForecastError::ValidationError(format!(
                    "Series has a missing value at index {}; resolve gaps before training",
                    idx
                ))
            })
        })
        .collect()
}

/// Aggregation of raw daily sales records
#[derive(Debug)]
pub struct SalesAggregator;

impl SalesAggregator {
    /// Extract the deduplicated product catalog from a raw payload.
    ///
    /// Malformed input never fails: a non-array payload yields an empty
    /// catalog and batches or line items of the wrong shape are skipped.
    /// The first name seen for an id wins; output is in first-seen order.
    pub fn extract_products(raw: &Value) -> Vec<Product> {
        let Some(batches) = raw.as_array() else {
            debug!("product extraction received a non-array payload");
            return Vec::new();
        };

        let mut catalog = Catalog::default();
        for batch in batches {
            let Some(items) = batch.get("payDetailList").and_then(Value::as_array) else {
                continue;
            };
            for item in items {
                let Some(id) = item.get("itemId").and_then(truthy_id) else {
                    continue;
                };
                let name = item
                    .get("name")
                    .and_then(Value::as_str)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string);
                catalog.insert(id, name);
            }
        }
        catalog.into_products()
    }

    /// Extract the product catalog from typed batches
    pub fn products_from_batches(batches: &[DailySalesBatch]) -> Vec<Product> {
        let mut catalog = Catalog::default();
        for item in batches.iter().flat_map(|b| b.line_items.iter()) {
            if item.product_id.is_empty() {
                continue;
            }
            catalog.insert(item.product_id.clone(), item.product_name.clone());
        }
        catalog.into_products()
    }

    /// Decode a raw payload into typed batches, dropping batches without a date
    pub fn parse_batches(raw: &Value) -> Vec<DailySalesBatch> {
        let Some(batches) = raw.as_array() else {
            return Vec::new();
        };

        batches
            .iter()
            .filter_map(|batch| {
                let parsed = DailySalesBatch::from_value(batch);
                if parsed.is_none() {
                    debug!(?batch, "dropping sales batch without a parseable date");
                }
                parsed
            })
            .collect()
    }

    /// Daily quantities of one product across the batches' date range
    pub fn product_series(batches: &[DailySalesBatch], product_id: &str) -> SalesSeries {
        Self::build_series(batches, |batch| batch.quantity_of(product_id))
    }

    /// Daily quantities of all products combined
    pub fn total_series(batches: &[DailySalesBatch]) -> SalesSeries {
        Self::build_series(batches, DailySalesBatch::total_quantity)
    }

    /// One series per catalog product, all sharing the same dates
    pub fn series_by_product(
        batches: &[DailySalesBatch],
        products: &[Product],
    ) -> Vec<(Product, SalesSeries)> {
        products
            .iter()
            .map(|p| (p.clone(), Self::product_series(batches, &p.id)))
            .collect()
    }

    /// Tabular view: a `date` column plus one quantity column per product
    pub fn to_dataframe(series: &[(Product, SalesSeries)]) -> Result<DataFrame> {
        let dates: Vec<NaiveDate> = series
            .first()
            .map(|(_, s)| s.dates().to_vec())
            .unwrap_or_default();

        let mut columns = Vec::with_capacity(series.len() + 1);
        columns.push(Series::new(
            "date",
            dates.iter().map(|d| format_day(*d)).collect::<Vec<String>>(),
        ));

        for (product, s) in series {
            if s.dates() != dates.as_slice() {
                return Err(ForecastError::ValidationError(format!(
                    "Series for product '{}' does not share the common date range",
                    product.id
                )));
            }
            columns.push(Series::new(&product.id, s.values().to_vec()));
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Sum `per_day` over every batch of a day; days without any batch are missing
    fn build_series<F>(batches: &[DailySalesBatch], per_day: F) -> SalesSeries
    where
        F: Fn(&DailySalesBatch) -> f64,
    {
        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for batch in batches {
            *totals.entry(batch.date).or_insert(0.0) += per_day(batch);
        }

        let (Some(first), Some(last)) = (
            totals.keys().next().copied(),
            totals.keys().next_back().copied(),
        ) else {
            return SalesSeries::empty();
        };

        let dates = date_range(first, last);
        let values = dates.iter().map(|d| totals.get(d).copied()).collect();
        SalesSeries { dates, values }
    }
}

/// Insertion-ordered product map, local to one extraction
#[derive(Default)]
struct Catalog {
    seen: HashSet<String>,
    products: Vec<Product>,
}

impl Catalog {
    fn insert(&mut self, id: String, name: Option<String>) {
        if self.seen.contains(&id) {
            return;
        }
        let name = name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| placeholder_name(&id));
        self.seen.insert(id.clone());
        self.products.push(Product { id, name });
    }

    fn into_products(self) -> Vec<Product> {
        self.products
    }
}

fn placeholder_name(product_id: &str) -> String {
    format!("Product {}", product_id)
}

/// Product ids arrive as strings or numbers; empty strings and zero are no id
fn truthy_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().map_or(false, |v| v != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn line_item_from_value(raw: &Value) -> Option<SaleLineItem> {
    let product_id = raw.get("itemId").and_then(truthy_id)?;
    let product_name = raw
        .get("name")
        .and_then(Value::as_str)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    let quantity = match raw.get("num") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    };

    Some(SaleLineItem {
        product_id,
        product_name,
        quantity,
    })
}
