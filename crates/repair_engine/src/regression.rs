//! Weighted least squares and robust (Huber) linear regression.

use contracts::ContractError;
use nalgebra::{DMatrix, DVector};

use crate::stats::median;

const HUBER_K: f64 = 1.345;
/// MAD -> standard deviation for normal errors
const MAD_CONSISTENCY: f64 = 0.6745;
const DEFAULT_MAX_ITERATIONS: usize = 50;
const DEFAULT_TOLERANCE: f64 = 1e-10;
/// Singular values below this fraction of the largest are treated as zero
const SVD_RELATIVE_EPS: f64 = 1e-12;

/// Solve `min Σ wᵢ (yᵢ - Xᵢβ)²` through the SVD of the row-scaled design.
///
/// Rank-deficient designs get the minimum-norm solution.
pub(crate) fn weighted_least_squares(
    design: &DMatrix<f64>,
    y: &DVector<f64>,
    weights: &[f64],
) -> Result<DVector<f64>, ContractError> {
    let mut a = design.clone();
    let mut b = y.clone();
    for (i, w) in weights.iter().enumerate() {
        let sw = w.max(0.0).sqrt();
        for j in 0..a.ncols() {
            a[(i, j)] *= sw;
        }
        b[i] *= sw;
    }

    let svd = a.svd(true, true);
    let eps = svd.singular_values.max() * SVD_RELATIVE_EPS;
    let beta = svd
        .solve(&b, eps)
        .map_err(|e| ContractError::numeric("weighted least squares", e))?;

    if beta.iter().all(|v| v.is_finite()) {
        Ok(beta)
    } else {
        Err(ContractError::numeric(
            "weighted least squares",
            "non-finite coefficients",
        ))
    }
}

/// `y = intercept + slope·x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub intercept: f64,
    pub slope: f64,
    /// Reweighting rounds performed
    pub iterations: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }

    pub fn residuals(&self, x: &[f64], y: &[f64]) -> Vec<f64> {
        x.iter()
            .zip(y)
            .map(|(xi, yi)| yi - self.predict(*xi))
            .collect()
    }
}

/// Huber M-estimator fitted by iteratively reweighted least squares.
///
/// Scale is re-estimated every round as `median|r| / 0.6745`; iteration stops when the
/// relative change of the residual vector drops below `tolerance`, when the scale collapses
/// to zero (the majority of points lie exactly on the line), or after `max_iterations`.
#[derive(Debug, Clone, Copy)]
pub struct HuberRegression {
    k: f64,
    max_iterations: usize,
    tolerance: f64,
}

impl Default for HuberRegression {
    fn default() -> Self {
        Self {
            k: HUBER_K,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl HuberRegression {
    pub fn fit(&self, x: &[f64], y: &[f64]) -> Result<LinearFit, ContractError> {
        let n = x.len().min(y.len());
        if n < 2 {
            return Err(ContractError::insufficient_data("robust regression", 2, n));
        }

        let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { x[i] });
        let target = DVector::from_column_slice(&y[..n]);
        let mut weights = vec![1.0; n];

        let mut beta = weighted_least_squares(&design, &target, &weights)?;
        let mut residuals = &target - &design * &beta;
        let mut iterations = 0;

        while iterations < self.max_iterations {
            let abs: Vec<f64> = residuals.iter().map(|r| r.abs()).collect();
            let scale = median(&abs).unwrap_or(0.0) / MAD_CONSISTENCY;
            if !(scale > 0.0 && scale.is_finite()) {
                break;
            }

            let cutoff = self.k * scale;
            for (w, r) in weights.iter_mut().zip(&abs) {
                *w = if *r <= cutoff { 1.0 } else { cutoff / r };
            }

            beta = weighted_least_squares(&design, &target, &weights)?;
            let next = &target - &design * &beta;
            let change = (&next - &residuals).norm() / residuals.norm().max(1e-20);
            residuals = next;
            iterations += 1;

            if change < self.tolerance {
                break;
            }
        }

        Ok(LinearFit {
            intercept: beta[0],
            slope: beta[1],
            iterations,
        })
    }
}
