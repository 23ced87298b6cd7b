use approx::assert_abs_diff_eq;
use rstest::rstest;
use sales_forecast::metrics::{accuracy_score, evaluate_accuracy};

fn some(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

#[rstest]
#[case(&[10.0, 20.0, 30.0], &[10.0, 20.0, 30.0], 1.0)]
#[case(&[10.0, 20.0], &[10.0, 20.0, 30.0], 0.0)]
#[case(&[0.0, 0.0], &[5.0, 5.0], 0.0)]
#[case(&[100.0], &[150.0], 0.5)]
fn test_accuracy_score(#[case] actual: &[f64], #[case] predicted: &[f64], #[case] expected: f64) {
    let score = accuracy_score(&some(actual), &some(predicted));
    assert_abs_diff_eq!(score, expected, epsilon = 1e-12);
}

#[test]
fn test_score_can_be_negative() {
    // Error of 30 against a total of 10
    let score = accuracy_score(&some(&[10.0]), &some(&[40.0]));
    assert_abs_diff_eq!(score, -2.0, epsilon = 1e-12);
}

#[test]
fn test_missing_on_either_side_is_skipped() {
    let actual = vec![Some(10.0), None, Some(20.0), Some(5.0)];
    let predicted = vec![Some(12.0), Some(99.0), Some(18.0), None];

    // Only positions 0 and 2 count: error 4 over total 30
    let score = accuracy_score(&actual, &predicted);
    assert_abs_diff_eq!(score, 1.0 - 4.0 / 30.0, epsilon = 1e-12);
}

#[test]
fn test_all_missing_scores_zero() {
    let actual = vec![None, None];
    let predicted = vec![Some(1.0), Some(2.0)];
    assert_eq!(accuracy_score(&actual, &predicted), 0.0);
}

#[test]
fn test_empty_sequences() {
    assert_eq!(accuracy_score(&[], &[]), 0.0);
}

#[test]
fn test_evaluate_accuracy_report() {
    let actual = vec![Some(10.0), Some(20.0), None];
    let predicted = vec![Some(12.0), Some(17.0), Some(3.0)];

    let report = evaluate_accuracy(&actual, &predicted);
    assert_eq!(report.paired, 2);
    assert_abs_diff_eq!(report.score, 1.0 - 5.0 / 30.0, epsilon = 1e-12);
    assert_abs_diff_eq!(report.mae.unwrap(), 2.5, epsilon = 1e-12);

    let text = report.to_string();
    assert!(text.contains("Forecast Accuracy"));
    assert!(text.contains("2.5000"));
}

#[test]
fn test_evaluate_accuracy_length_mismatch() {
    let report = evaluate_accuracy(&some(&[1.0, 2.0]), &some(&[1.0]));
    assert_eq!(report.score, 0.0);
    assert_eq!(report.mae, None);
    assert_eq!(report.paired, 0);
    assert!(report.to_string().contains("n/a"));
}
