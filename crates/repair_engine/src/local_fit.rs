//! Locally weighted quadratic regression.
//!
//! For every point the fit uses its `q` nearest neighbours along the abscissa,
//! `q = max(ceil(span·n), min_points)` capped at `n`, weighted by
//! `prior_weight · tricube(distance / bandwidth)` where the bandwidth is the distance to the
//! farthest of those neighbours. The local design is centred on the point and scaled by the
//! bandwidth, and the fitted value is the local intercept.
//!
//! Abscissae are processed in sorted order so the neighbour window slides monotonically.

use contracts::ContractError;
use nalgebra::{DMatrix, DVector};

use crate::regression::weighted_least_squares;

const MAX_DEGREE: usize = 2;

/// Degree-2 local regression smoother
#[derive(Debug, Clone, Copy)]
pub struct LocalQuadratic {
    span: f64,
    min_points: usize,
}

impl LocalQuadratic {
    pub fn new(span: f64, min_points: usize) -> Self {
        Self { span, min_points }
    }

    /// Neighbourhood size for `n` points, at least one point whenever `n > 0`
    pub fn neighbours(&self, n: usize) -> usize {
        let by_span = (self.span * n as f64).ceil() as usize;
        by_span.max(self.min_points).max(1).min(n)
    }

    /// Fitted values at each `x`, in input order.
    pub fn fit(&self, x: &[f64], y: &[f64], weights: &[f64]) -> Result<Vec<f64>, ContractError> {
        let n = x.len();
        if y.len() != n || weights.len() != n {
            return Err(ContractError::invalid_parameter(
                "local fit",
                "x, y and weights must have equal length",
            ));
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|a, b| x[*a].total_cmp(&x[*b]));
        let xs: Vec<f64> = order.iter().map(|&i| x[i]).collect();

        let q = self.neighbours(n);
        let mut fitted = vec![0.0; n];
        let mut lo = 0;

        for (p, &target) in order.iter().enumerate() {
            while lo + q < n && xs[p] - xs[lo] > xs[lo + q] - xs[p] {
                lo += 1;
            }
            let window = &order[lo..lo + q];
            let bandwidth = (xs[p] - xs[lo]).max(xs[lo + q - 1] - xs[p]);
            fitted[target] = local_value(x[target], bandwidth, window, x, y, weights)?;
        }

        Ok(fitted)
    }
}

fn tricube(u: f64) -> f64 {
    if u >= 1.0 {
        0.0
    } else {
        let t = 1.0 - u * u * u;
        t * t * t
    }
}

fn local_value(
    center: f64,
    bandwidth: f64,
    window: &[usize],
    x: &[f64],
    y: &[f64],
    prior: &[f64],
) -> Result<f64, ContractError> {
    let mut points: Vec<(f64, f64, f64)> = window
        .iter()
        .filter_map(|&j| {
            let kernel = if bandwidth > 0.0 {
                tricube((x[j] - center).abs() / bandwidth)
            } else {
                1.0
            };
            let w = kernel * prior[j];
            (w > 0.0 && w.is_finite()).then_some((x[j], y[j], w))
        })
        .collect();

    if points.is_empty() {
        return Err(ContractError::numeric(
            "local fit",
            format!("no positively weighted neighbours at x={center}"),
        ));
    }

    // Rescale so the heaviest point has weight 1
    let max_w = points.iter().map(|p| p.2).fold(0.0, f64::max);
    for p in &mut points {
        p.2 /= max_w;
    }

    let mut distinct: Vec<f64> = points.iter().map(|p| p.0).collect();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    let degree = MAX_DEGREE.min(distinct.len() - 1);

    if degree == 0 || bandwidth <= 0.0 {
        let total: f64 = points.iter().map(|p| p.2).sum();
        return Ok(points.iter().map(|p| p.1 * p.2).sum::<f64>() / total);
    }

    let design = DMatrix::from_fn(points.len(), degree + 1, |i, k| {
        ((points[i].0 - center) / bandwidth).powi(k as i32)
    });
    let target = DVector::from_iterator(points.len(), points.iter().map(|p| p.1));
    let weights: Vec<f64> = points.iter().map(|p| p.2).collect();

    let beta = weighted_least_squares(&design, &target, &weights)?;
    Ok(beta[0])
}
