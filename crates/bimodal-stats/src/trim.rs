//! Quantile-based outlier trimming.
//!
//! Timing measurements collected on a live machine carry rare, huge spikes
//! (interrupts, SMIs, page faults). Trimming by a pair of quantile cutoffs removes
//! them without assuming anything about the shape of the distribution.
//!
//! # Examples
//!
//! ```
//! use bimodal_stats::trim::QuantileTrim;
//!
//! let values = [100.0, 101.0, 99.0, 100.0, 9000.0];
//! let trim = QuantileTrim::compute(&values, 0.0, 0.75).unwrap();
//! assert_eq!(trim.hi, 101.0);
//! assert_eq!(trim.apply(&values), vec![100.0, 101.0, 99.0, 100.0]);
//! ```

use serde::Serialize;

use crate::{error::StatsError, percentiles};

/// Cutoffs derived from a pair of quantile fractions.
///
/// `q_lo`/`q_hi` are the fractions actually used (after clamping to `[0, 1]`),
/// `lo`/`hi` the corresponding values of the untrimmed data. A value is retained
/// when `lo <= x <= hi`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantileTrim {
    pub q_lo: f64,
    pub q_hi: f64,
    pub lo: f64,
    pub hi: f64,
}

impl QuantileTrim {
    /// Computes the cutoff values for `values` (in any order).
    ///
    /// NaN values are ignored when computing the cutoffs and are never
    /// retained by [`QuantileTrim::contains`].
    ///
    /// # Errors
    ///
    /// * [`StatsError::InvalidRange`] - if `q_hi <= q_lo` after clamping, or
    ///   either fraction is NaN
    /// * [`StatsError::EmptySeries`] - if `values` has no non-NaN value
    pub fn compute(values: &[f64], q_lo: f64, q_hi: f64) -> Result<Self, StatsError> {
        let (q_lo, q_hi) = clamp_fractions(q_lo, q_hi)?;
        let mut sorted = values
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .collect::<Vec<_>>();
        if sorted.is_empty() {
            return Err(StatsError::EmptySeries {
                operation: "quantile trimming",
            });
        }
        sorted.sort_by(f64::total_cmp);
        let lo = percentiles::compute_quantile(&sorted, q_lo);
        let hi = percentiles::compute_quantile(&sorted, q_hi);
        tracing::debug!(q_lo, q_hi, lo, hi, n = sorted.len(), "computed trim cutoffs");

        Ok(Self { q_lo, q_hi, lo, hi })
    }

    /// Whether `value` lies inside the closed interval `[lo, hi]`.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.lo <= value && value <= self.hi
    }

    /// Keeps the values inside `[lo, hi]`, in their original order.
    #[must_use]
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        values.iter().copied().filter(|&v| self.contains(v)).collect()
    }
}

/// Trims `values` in one step, returning the retained values and the cutoffs.
///
/// # Errors
///
/// See [`QuantileTrim::compute`].
pub fn trim(values: &[f64], q_lo: f64, q_hi: f64) -> Result<(Vec<f64>, QuantileTrim), StatsError> {
    let cutoffs = QuantileTrim::compute(values, q_lo, q_hi)?;
    Ok((cutoffs.apply(values), cutoffs))
}

fn clamp_fractions(q_lo: f64, q_hi: f64) -> Result<(f64, f64), StatsError> {
    let invalid = || StatsError::InvalidRange { q_lo, q_hi };
    if q_lo.is_nan() || q_hi.is_nan() {
        return Err(invalid());
    }
    let lo = q_lo.clamp(0.0, 1.0);
    let hi = q_hi.clamp(0.0, 1.0);
    if hi <= lo {
        return Err(invalid());
    }
    Ok((lo, hi))
}
