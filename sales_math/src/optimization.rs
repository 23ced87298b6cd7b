//! Derivative-free minimization for model fitting
//!
//! Contains a bounded Nelder-Mead simplex search used to estimate ARIMA
//! coefficients by minimizing the conditional sum of squares.

use crate::{MathError, Result};
use std::cmp::Ordering;

/// Reflection, expansion, contraction and shrink coefficients
const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Outcome of a simplex search
#[derive(Debug, Clone, PartialEq)]
pub struct SimplexSolution {
    /// Best point found
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Number of iterations performed
    pub iterations: usize,
    /// Whether the tolerance was reached before `max_iter`
    pub converged: bool,
}

/// Bounded Nelder-Mead simplex optimizer
#[derive(Debug, Clone)]
pub struct SimplexOptimizer {
    max_iter: usize,
    tolerance: f64,
    initial_step: f64,
}

impl Default for SimplexOptimizer {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            initial_step: 0.05,
        }
    }
}

impl SimplexOptimizer {
    /// Create an optimizer with the given iteration cap and tolerance
    pub fn new(max_iter: usize, tolerance: f64) -> Result<Self> {
        if max_iter == 0 {
            return Err(MathError::InvalidInput(
                "Iteration cap must be greater than zero".to_string(),
            ));
        }
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(MathError::InvalidInput(format!(
                "Tolerance must be a positive finite number, got {}",
                tolerance
            )));
        }

        Ok(Self {
            max_iter,
            tolerance,
            ..Self::default()
        })
    }

    /// Minimize `objective` starting from `initial`.
    ///
    /// `bounds`, when given, must hold one `(min, max)` pair per dimension;
    /// every candidate vertex is clamped into the box before evaluation.
    pub fn minimize<F>(
        &self,
        objective: F,
        initial: &[f64],
        bounds: Option<&[(f64, f64)]>,
    ) -> Result<SimplexSolution>
    where
        F: Fn(&[f64]) -> f64,
    {
        let n = initial.len();
        if n == 0 {
            return Err(MathError::InvalidInput(
                "Cannot optimize over zero dimensions".to_string(),
            ));
        }
        if let Some(b) = bounds {
            if b.len() != n {
                return Err(MathError::InvalidInput(format!(
                    "Expected {} bounds, got {}",
                    n,
                    b.len()
                )));
            }
        }

        let clamp = |point: Vec<f64>| -> Vec<f64> {
            match bounds {
                None => point,
                Some(b) => point
                    .into_iter()
                    .zip(b.iter())
                    .map(|(x, &(lo, hi))| x.clamp(lo, hi))
                    .collect(),
            }
        };

        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
        simplex.push(clamp(initial.to_vec()));
        for i in 0..n {
            let mut vertex = initial.to_vec();
            vertex[i] += if initial[i].abs() > 1e-10 {
                self.initial_step * initial[i].abs()
            } else {
                self.initial_step
            };
            simplex.push(clamp(vertex));
        }
        let mut values: Vec<f64> = simplex.iter().map(|v| objective(v)).collect();

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iter {
            iterations += 1;

            let mut order: Vec<usize> = (0..=n).collect();
            order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
            let best = order[0];
            let worst = order[n];
            let second_worst = order[n - 1];

            if (values[worst] - values[best]).abs() < self.tolerance {
                converged = true;
                break;
            }

            let centroid = centroid_excluding(&simplex, worst);
            let spread = simplex
                .iter()
                .map(|v| distance(v, &centroid))
                .fold(0.0, f64::max);
            if spread < self.tolerance {
                converged = true;
                break;
            }

            let reflected = clamp(towards(&centroid, &simplex[worst], -REFLECTION));
            let reflected_value = objective(&reflected);

            if reflected_value < values[best] {
                let expanded = clamp(towards(&centroid, &reflected, EXPANSION));
                let expanded_value = objective(&expanded);
                if expanded_value < reflected_value {
                    simplex[worst] = expanded;
                    values[worst] = expanded_value;
                } else {
                    simplex[worst] = reflected;
                    values[worst] = reflected_value;
                }
                continue;
            }

            if reflected_value < values[second_worst] {
                simplex[worst] = reflected;
                values[worst] = reflected_value;
                continue;
            }

            // Outside contraction when the reflection beat the worst vertex, inside otherwise
            let (anchor, anchor_value) = if reflected_value < values[worst] {
                (reflected, reflected_value)
            } else {
                (simplex[worst].clone(), values[worst])
            };
            let contracted = clamp(towards(&centroid, &anchor, CONTRACTION));
            let contracted_value = objective(&contracted);
            if contracted_value < anchor_value {
                simplex[worst] = contracted;
                values[worst] = contracted_value;
                continue;
            }

            let best_vertex = simplex[best].clone();
            for i in 0..=n {
                if i != best {
                    let shrunk = towards(&best_vertex, &simplex[i], SHRINK);
                    simplex[i] = clamp(shrunk);
                    values[i] = objective(&simplex[i]);
                }
            }
        }

        let best = values
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);

        if !values[best].is_finite() {
            return Err(MathError::CalculationError(format!(
                "Objective is not finite at the best vertex after {} iterations",
                iterations
            )));
        }

        Ok(SimplexSolution {
            point: simplex[best].clone(),
            value: values[best],
            iterations,
            converged,
        })
    }
}

/// Centroid of every vertex except `exclude`
fn centroid_excluding(simplex: &[Vec<f64>], exclude: usize) -> Vec<f64> {
    let dims = simplex[0].len();
    let count = (simplex.len() - 1) as f64;
    let mut centroid = vec![0.0; dims];

    for (i, vertex) in simplex.iter().enumerate() {
        if i != exclude {
            for (c, v) in centroid.iter_mut().zip(vertex.iter()) {
                *c += v;
            }
        }
    }
    for c in centroid.iter_mut() {
        *c /= count;
    }
    centroid
}

/// `origin + factor * (point - origin)`
fn towards(origin: &[f64], point: &[f64], factor: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point.iter())
        .map(|(o, p)| o + factor * (p - o))
        .collect()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
