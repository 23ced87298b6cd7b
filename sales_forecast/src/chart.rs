//! Chart-ready series descriptors
//!
//! Wraps actual and forecast sequences in line-series descriptors for the
//! rendering layer. Values pass through untouched; a missing marker becomes
//! `null` in JSON and renders as a gap.

use crate::data::SalesSeries;
use crate::models::ForecastResult;
use crate::utils::future_dates;
use chrono::NaiveDate;
use serde::Serialize;

pub const ACTUAL_SERIES_NAME: &str = "Actual Sales";
pub const PREDICTED_SERIES_NAME: &str = "Predicted Sales";

/// Chart series kind; only line charts are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Line,
}

/// Which palette entry a series draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorRole {
    Actual,
    Predicted,
}

impl ColorRole {
    pub fn hex(&self) -> &'static str {
        match self {
            ColorRole::Actual => "#5470C6",
            ColorRole::Predicted => "#91CC75",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStyle {
    pub smoothing: bool,
    pub dashed: bool,
    pub color_role: ColorRole,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeriesDescriptor {
    pub name: String,
    pub kind: SeriesKind,
    pub data: Vec<Option<f64>>,
    pub style: SeriesStyle,
}

/// Smoothed solid line for realized sales
pub fn build_actual_series(data: &[Option<f64>]) -> ChartSeriesDescriptor {
    ChartSeriesDescriptor {
        name: ACTUAL_SERIES_NAME.to_string(),
        kind: SeriesKind::Line,
        data: data.to_vec(),
        style: SeriesStyle {
            smoothing: true,
            dashed: false,
            color_role: ColorRole::Actual,
        },
    }
}

/// Smoothed dashed line for forecast values
pub fn build_predicted_series(data: &[Option<f64>]) -> ChartSeriesDescriptor {
    build_predicted_series_named(data, PREDICTED_SERIES_NAME)
}

pub fn build_predicted_series_named(data: &[Option<f64>], name: &str) -> ChartSeriesDescriptor {
    ChartSeriesDescriptor {
        name: name.to_string(),
        kind: SeriesKind::Line,
        data: data.to_vec(),
        style: SeriesStyle {
            smoothing: true,
            dashed: true,
            color_role: ColorRole::Predicted,
        },
    }
}

/// Actual and predicted series laid over one shared date axis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastChart {
    pub dates: Vec<NaiveDate>,
    pub actual: ChartSeriesDescriptor,
    pub predicted: ChartSeriesDescriptor,
}

impl ForecastChart {
    /// Overlay a forecast that continues `actual` past its last date.
    ///
    /// The axis is the actual dates followed by one day per forecast slot;
    /// each series is padded with missing markers where it has no value.
    pub fn overlay(actual: &SalesSeries, forecast: &ForecastResult) -> Self {
        let history_len = actual.len();
        let horizon = forecast.horizon();

        let mut dates = actual.dates().to_vec();
        if let Some(last) = actual.last_date() {
            dates.extend(future_dates(last, horizon));
        }

        let mut actual_data = actual.values().to_vec();
        actual_data.resize(history_len + horizon, None);

        let mut predicted_data = vec![None; history_len];
        predicted_data.extend_from_slice(forecast.values());

        Self {
            dates,
            actual: build_actual_series(&actual_data),
            predicted: build_predicted_series(&predicted_data),
        }
    }

    /// Overlay a back-test that covers the same days as `actual`
    pub fn backtest(actual: &SalesSeries, fitted: &ForecastResult, name: &str) -> Self {
        let mut predicted_data = fitted.values().to_vec();
        predicted_data.resize(actual.len(), None);

        Self {
            dates: actual.dates().to_vec(),
            actual: build_actual_series(actual.values()),
            predicted: build_predicted_series_named(&predicted_data, name),
        }
    }

    /// Number of time slots shared by both series
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_actual_series_style() {
        let series = build_actual_series(&[Some(1.0), None, Some(3.0)]);
        assert_eq!(series.name, ACTUAL_SERIES_NAME);
        assert!(series.style.smoothing);
        assert!(!series.style.dashed);
        assert_eq!(series.style.color_role, ColorRole::Actual);
        assert_eq!(series.data, vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn test_predicted_series_style() {
        let series = build_predicted_series(&[Some(2.0)]);
        assert_eq!(series.name, PREDICTED_SERIES_NAME);
        assert!(series.style.dashed);
        assert_eq!(series.style.color_role, ColorRole::Predicted);

        let named = build_predicted_series_named(&[], "Remote forecast");
        assert_eq!(named.name, "Remote forecast");
    }

    #[test]
    fn test_descriptor_json_shape() {
        let series = build_predicted_series(&[Some(1.5), None]);
        let value = serde_json::to_value(&series).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Predicted Sales",
                "kind": "line",
                "data": [1.5, null],
                "style": { "smoothing": true, "dashed": true, "colorRole": "predicted" }
            })
        );
    }

    #[test]
    fn test_palette() {
        assert_eq!(ColorRole::Actual.hex(), "#5470C6");
        assert_eq!(ColorRole::Predicted.hex(), "#91CC75");
    }
}
