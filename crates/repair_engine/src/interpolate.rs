//! Gap filling between anchors: piecewise linear or natural cubic spline.
//!
//! Neither method extrapolates; queries outside `[first anchor, last anchor]` yield `None`.

use contracts::InterpolationMethod;

/// Sorted anchor points with unique abscissae
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Anchors {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Anchors {
    /// Sort by abscissa; points sharing an abscissa collapse to their mean ordinate.
    /// Non-finite points are dropped.
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut points: Vec<(f64, f64)> = points
            .into_iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut xs: Vec<f64> = Vec::with_capacity(points.len());
        let mut ys: Vec<f64> = Vec::with_capacity(points.len());
        let mut run = 0usize;
        for (x, y) in points {
            if xs.last() == Some(&x) {
                run += 1;
                if let Some(mean) = ys.last_mut() {
                    *mean += (y - *mean) / run as f64;
                }
            } else {
                xs.push(x);
                ys.push(y);
                run = 1;
            }
        }
        Self { xs, ys }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Whether `x` lies between the first and last anchor (inclusive)
    pub fn covers(&self, x: f64) -> bool {
        match (self.xs.first(), self.xs.last()) {
            (Some(lo), Some(hi)) => x >= *lo && x <= *hi,
            _ => false,
        }
    }

    /// Index `i` of the segment `[xs[i], xs[i+1]]` holding `x`; requires `covers(x)` and two anchors.
    fn segment(&self, x: f64) -> usize {
        let upper = self.xs.partition_point(|a| *a <= x);
        upper.saturating_sub(1).min(self.xs.len() - 2)
    }
}

/// Interpolant built once over a set of anchors
#[derive(Debug, Clone)]
pub enum Interpolator {
    Linear(Anchors),
    /// Anchors plus second derivatives at each anchor
    Spline(Anchors, Vec<f64>),
}

impl Interpolator {
    pub fn new(method: InterpolationMethod, anchors: Anchors) -> Self {
        match method {
            InterpolationMethod::Linear => Self::Linear(anchors),
            InterpolationMethod::Spline => {
                let second = natural_second_derivatives(&anchors);
                Self::Spline(anchors, second)
            }
        }
    }

    pub fn anchors(&self) -> &Anchors {
        match self {
            Self::Linear(anchors) | Self::Spline(anchors, _) => anchors,
        }
    }

    /// Interpolated value at `x`, `None` outside the anchor range.
    pub fn eval(&self, x: f64) -> Option<f64> {
        let anchors = self.anchors();
        if !x.is_finite() || !anchors.covers(x) {
            return None;
        }
        if anchors.len() == 1 {
            return Some(anchors.ys[0]);
        }

        let i = anchors.segment(x);
        let (x0, x1) = (anchors.xs[i], anchors.xs[i + 1]);
        let (y0, y1) = (anchors.ys[i], anchors.ys[i + 1]);
        let h = x1 - x0;

        let value = match self {
            Self::Linear(_) => y0 + (y1 - y0) * (x - x0) / h,
            Self::Spline(_, m) => {
                let a = x1 - x;
                let b = x - x0;
                m[i] * a.powi(3) / (6.0 * h)
                    + m[i + 1] * b.powi(3) / (6.0 * h)
                    + (y0 / h - m[i] * h / 6.0) * a
                    + (y1 / h - m[i + 1] * h / 6.0) * b
            }
        };
        Some(value)
    }
}

/// Second derivatives of the natural cubic spline (zero at both ends), Thomas algorithm.
fn natural_second_derivatives(anchors: &Anchors) -> Vec<f64> {
    let n = anchors.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }

    let xs = &anchors.xs;
    let ys = &anchors.ys;
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();

    // interior unknowns m[1..n-1]
    let size = n - 2;
    let mut diag = vec![0.0; size];
    let mut upper = vec![0.0; size];
    let mut rhs = vec![0.0; size];
    for k in 0..size {
        let i = k + 1;
        diag[k] = 2.0 * (h[i - 1] + h[i]);
        upper[k] = h[i];
        rhs[k] = 6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]);
    }

    for k in 1..size {
        let lower = h[k];
        let factor = lower / diag[k - 1];
        diag[k] -= factor * upper[k - 1];
        rhs[k] -= factor * rhs[k - 1];
    }

    let mut solution = vec![0.0; size];
    solution[size - 1] = rhs[size - 1] / diag[size - 1];
    for k in (0..size - 1).rev() {
        solution[k] = (rhs[k] - upper[k] * solution[k + 1]) / diag[k];
    }

    m[1..n - 1].copy_from_slice(&solution);
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interp(method: InterpolationMethod, points: &[(f64, f64)]) -> Interpolator {
        Interpolator::new(method, Anchors::new(points.iter().copied()))
    }

    #[test]
    fn test_linear_between_anchors() {
        let f = interp(InterpolationMethod::Linear, &[(0.0, 0.0), (10.0, 5.0), (20.0, 25.0)]);
        assert_eq!(f.eval(5.0), Some(2.5));
        assert_eq!(f.eval(15.0), Some(15.0));
        assert_eq!(f.eval(10.0), Some(5.0));
        assert_eq!(f.eval(20.0), Some(25.0));
    }

    #[test]
    fn test_no_extrapolation() {
        for method in [InterpolationMethod::Linear, InterpolationMethod::Spline] {
            let f = interp(method, &[(1.0, 1.0), (2.0, 4.0), (3.0, 9.0)]);
            assert_eq!(f.eval(0.5), None);
            assert_eq!(f.eval(3.5), None);
        }
        let empty = interp(InterpolationMethod::Linear, &[]);
        assert_eq!(empty.eval(0.0), None);
    }

    #[test]
    fn test_single_anchor() {
        let f = interp(InterpolationMethod::Spline, &[(2.0, 7.0)]);
        assert_eq!(f.eval(2.0), Some(7.0));
        assert_eq!(f.eval(2.1), None);
    }

    #[test]
    fn test_duplicate_abscissa_collapses_to_mean() {
        let anchors = Anchors::new(vec![(1.0, 2.0), (0.0, 0.0), (1.0, 4.0), (2.0, 6.0)]);
        assert_eq!(anchors.len(), 3);
        let f = Interpolator::new(InterpolationMethod::Linear, anchors);
        assert_eq!(f.eval(1.0), Some(3.0));
    }

    #[test]
    fn test_spline_passes_through_anchors_and_reproduces_line() {
        let points: Vec<(f64, f64)> = (0..6).map(|i| (i as f64, 3.0 * i as f64 - 1.0)).collect();
        let f = interp(InterpolationMethod::Spline, &points);
        for (x, y) in &points {
            let v = f.eval(*x).unwrap();
            assert!((v - y).abs() < 1e-9, "at {x}: {v} vs {y}");
        }
        let v = f.eval(2.5).unwrap();
        assert!((v - 6.5).abs() < 1e-9, "midpoint {v}");
    }

    #[test]
    fn test_spline_smooth_curve() {
        let points: Vec<(f64, f64)> = (0..=20)
            .map(|i| {
                let x = i as f64 * 0.25;
                (x, x.sin())
            })
            .collect();
        let f = interp(InterpolationMethod::Spline, &points);
        let v = f.eval(2.6).unwrap();
        assert!((v - 2.6f64.sin()).abs() < 1e-3, "spline {v}");
    }
}
