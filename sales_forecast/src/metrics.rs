//! Metrics for evaluating forecast accuracy against realized sales

use serde::Serialize;

/// Score a forecast against realized values.
///
/// Returns `1 - Σ|actual - predicted| / Σ actual` over the positions where
/// both sides are present; positions with a missing marker on either side
/// are skipped. Sequences of different length, or a zero actual total,
/// score `0`. The score can go negative when the error exceeds total demand.
pub fn accuracy_score(actual: &[Option<f64>], predicted: &[Option<f64>]) -> f64 {
    if actual.len() != predicted.len() {
        return 0.0;
    }
    let (total_error, total_actual, _) = paired_totals(actual, predicted);
    if total_actual == 0.0 {
        return 0.0;
    }
    1.0 - total_error / total_actual
}

/// Evaluate a forecast, reporting the score alongside the paired error
pub fn evaluate_accuracy(actual: &[Option<f64>], predicted: &[Option<f64>]) -> AccuracyReport {
    let score = accuracy_score(actual, predicted);
    if actual.len() != predicted.len() {
        return AccuracyReport {
            score,
            mae: None,
            paired: 0,
        };
    }

    let (total_error, _, paired) = paired_totals(actual, predicted);
    AccuracyReport {
        score,
        mae: (paired > 0).then(|| total_error / paired as f64),
        paired,
    }
}

/// Sum of absolute error, sum of actual and count over fully present pairs
fn paired_totals(actual: &[Option<f64>], predicted: &[Option<f64>]) -> (f64, f64, usize) {
    actual
        .iter()
        .zip(predicted.iter())
        .filter_map(|(a, p)| Some(((*a)?, (*p)?)))
        .fold((0.0, 0.0, 0), |(err, total, n), (a, p)| {
            (err + (a - p).abs(), total + a, n + 1)
        })
}

/// Forecast accuracy summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccuracyReport {
    /// Normalized absolute-error score, at most 1
    pub score: f64,
    /// Mean absolute error over the paired positions
    pub mae: Option<f64>,
    /// Number of positions where both sides were present
    pub paired: usize,
}

impl std::fmt::Display for AccuracyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Forecast Accuracy:")?;
        writeln!(f, "  Score:   {:.4}", self.score)?;
        match self.mae {
            Some(mae) => writeln!(f, "  MAE:     {:.4}", mae)?,
            None => writeln!(f, "  MAE:     n/a")?,
        }
        writeln!(f, "  Paired:  {}", self.paired)?;
        Ok(())
    }
}
