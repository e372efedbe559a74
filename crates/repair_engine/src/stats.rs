//! Order statistics and the IQR outlier rule.

/// Which side of the bounds counts as an outlier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlierRule {
    /// Below `median - s·IQR` or above `median + s·IQR`
    TwoSided,
    /// Above `median + s·IQR` only
    UpperOnly,
}

/// `median ± scale·IQR` bounds of a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlierBounds {
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    /// Bounds of `values`, or `None` for an empty sample.
    pub fn from_values(values: &[f64], scale: f64) -> Option<Self> {
        let sorted = sorted_copy(values);
        let median = quantile_sorted(&sorted, 0.5)?;
        let iqr = quantile_sorted(&sorted, 0.75)? - quantile_sorted(&sorted, 0.25)?;
        Some(Self {
            lower: median - scale * iqr,
            upper: median + scale * iqr,
        })
    }

    pub fn is_outlier(&self, value: f64, rule: OutlierRule) -> bool {
        match rule {
            OutlierRule::TwoSided => value > self.upper || value < self.lower,
            OutlierRule::UpperOnly => value > self.upper,
        }
    }
}

/// Sample quantile with linear interpolation between order statistics.
///
/// `p` is clamped to `[0, 1]`; returns `None` for an empty sample.
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    quantile_sorted(&sorted_copy(values), p)
}

pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

fn quantile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let h = last as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(last);
    Some(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}
