//! # Sales Stats
//!
//! Umbrella crate for the sales statistics workspace. It re-exports the
//! member crates so applications can depend on a single package.
//!
//! ## Example
//!
//! ```
//! use sales_stats_workspace::forecast::StatisticsMode;
//!
//! assert_eq!(StatisticsMode::Realtime.to_string(), "realtime");
//! ```

pub use sales_forecast as forecast;
pub use sales_math as math;

pub use sales_forecast::{
    accuracy_score, ForecastError, ForecastResult, LocalForecastEngine, StatisticsConfig,
    StatisticsMode, StatisticsService,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_reach_both_crates() {
        let mean = math::stats::mean(&[2.0, 4.0]).unwrap();
        assert_eq!(mean, 3.0);
        assert_eq!(accuracy_score(&[Some(4.0)], &[Some(4.0)]), 1.0);
    }
}
