//! Utility functions for the sales_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{Duration, NaiveDate};

/// Date `days` days after `date`
pub fn date_after(date: NaiveDate, days: i64) -> NaiveDate {
    date + Duration::days(days)
}

/// Date `days_ago` days before `today`
pub fn past_date(today: NaiveDate, days_ago: i64) -> NaiveDate {
    today - Duration::days(days_ago)
}

/// Every calendar day from `start` to `end`, both inclusive
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if end < start {
        return Vec::new();
    }
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// `count` consecutive days following `last`
pub fn future_dates(last: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (1..=count as i64).map(|i| date_after(last, i)).collect()
}

/// Parse the calendar date at the start of a `YYYY-MM-DD[...]` string.
///
/// Anything after the first ten characters (a time component, a `T`
/// separator) is ignored.
pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let day = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| ForecastError::ValidationError(format!("Invalid date '{}': {}", raw, e)))
}

/// Format a date the way the data endpoints expect it
pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
