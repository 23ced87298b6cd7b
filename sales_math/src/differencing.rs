//! Differencing and integration of daily series
//!
//! `difference` removes trend by taking successive deltas `d` times and
//! `integrate` undoes it, anchored on the tail of the original series.

use crate::{MathError, Result};

/// Difference a series `d` times.
///
/// Each pass shortens the series by one element.
pub fn difference(series: &[f64], d: usize) -> Result<Vec<f64>> {
    if series.len() <= d {
        return Err(MathError::InsufficientData(format!(
            "Differencing of order {} needs more than {} values, have {}",
            d,
            d,
            series.len()
        )));
    }

    let mut result = series.to_vec();
    for _ in 0..d {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    Ok(result)
}

/// Integrate forecasts made on the `d`-times differenced scale back to the
/// scale of `original`.
///
/// The last value of each intermediate difference of `original` seeds the
/// cumulative sum at that level.
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Result<Vec<f64>> {
    if d == 0 || differenced.is_empty() {
        return Ok(differenced.to_vec());
    }
    if original.len() <= d {
        return Err(MathError::InsufficientData(format!(
            "Integration of order {} needs more than {} original values, have {}",
            d,
            d,
            original.len()
        )));
    }

    let mut result = differenced.to_vec();
    for level in (0..d).rev() {
        let anchor = if level == 0 {
            original[original.len() - 1]
        } else {
            let intermediate = difference(original, level)?;
            intermediate[intermediate.len() - 1]
        };

        let mut cumsum = anchor;
        for value in result.iter_mut() {
            cumsum += *value;
            *value = cumsum;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_difference() {
        let diff = difference(&[5.0, 6.0, 5.0, 7.0], 1).unwrap();
        assert_eq!(diff, vec![1.0, -1.0, 2.0]);
    }

    #[test]
    fn test_second_difference() {
        let diff = difference(&[1.0, 4.0, 9.0, 16.0], 2).unwrap();
        assert_eq!(diff, vec![2.0, 2.0]);
    }

    #[test]
    fn test_difference_too_short() {
        assert!(difference(&[1.0], 1).is_err());
        assert_eq!(difference(&[1.0], 0).unwrap(), vec![1.0]);
    }

    #[test]
    fn test_integrate_continues_from_last_value() {
        let original = [10.0, 12.0, 15.0];
        let restored = integrate(&[1.0, 1.0], &original, 1).unwrap();
        assert_eq!(restored, vec![16.0, 17.0]);
    }

    #[test]
    fn test_integrate_second_order_quadratic() {
        // Squares have a constant second difference of 2
        let original = [1.0, 4.0, 9.0, 16.0];
        let restored = integrate(&[2.0, 2.0], &original, 2).unwrap();
        assert_eq!(restored, vec![25.0, 36.0]);
    }
}
