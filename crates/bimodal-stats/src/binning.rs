//! Shared histogram binning.
//!
//! Grouped and ungrouped histograms are only comparable when they share one axis
//! and one bin width. [`BinPlan`] fixes both from the combined (trimmed,
//! ungrouped) series, and every histogram of the analysis is built from it.
//!
//! # Examples
//!
//! ```
//! use bimodal_stats::binning::BinPlan;
//!
//! let all = [100.0, 101.0, 99.0, 500.0, 502.0];
//! let plan = BinPlan::new(&all, 200).unwrap();
//! assert_eq!((plan.range_min, plan.range_max, plan.bin_count), (99.0, 502.0, 200));
//!
//! // requested counts below the floor are raised
//! assert_eq!(BinPlan::new(&all, 10).unwrap().bin_count, BinPlan::MIN_BIN_COUNT);
//! ```

use serde::Serialize;

use crate::error::StatsError;

/// Range and bin count shared across all histograms being compared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BinPlan {
    /// Minimum of the combined series.
    pub range_min: f64,
    /// Maximum of the combined series.
    pub range_max: f64,
    /// Number of equal-width bins; never below [`BinPlan::MIN_BIN_COUNT`].
    pub bin_count: usize,
}

impl BinPlan {
    /// Floor on the bin count; coarser binning hides the structure of the peaks.
    pub const MIN_BIN_COUNT: usize = 40;

    /// Plans bins over the full range of `values`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::EmptySeries`] if `values` is empty, since no range
    /// can be established.
    pub fn new(values: &[f64], requested_bin_count: usize) -> Result<Self, StatsError> {
        if values.is_empty() {
            return Err(StatsError::EmptySeries {
                operation: "bin planning",
            });
        }
        let range_min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let range_max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let plan = Self {
            range_min,
            range_max,
            bin_count: requested_bin_count.max(Self::MIN_BIN_COUNT),
        };
        tracing::debug!(
            range_min,
            range_max,
            bin_count = plan.bin_count,
            requested_bin_count,
            "planned histogram bins"
        );
        Ok(plan)
    }

    /// The interval actually covered by the bin edges.
    ///
    /// Equal to `[range_min, range_max]`, except that a zero-width range is
    /// widened by 0.5 on each side so the bins have a positive width.
    #[must_use]
    pub fn edge_range(&self) -> (f64, f64) {
        if self.range_max > self.range_min {
            (self.range_min, self.range_max)
        } else {
            (self.range_min - 0.5, self.range_max + 0.5)
        }
    }

    /// Width of each bin.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn bin_width(&self) -> f64 {
        let (lo, hi) = self.edge_range();
        (hi - lo) / self.bin_count as f64
    }

    /// The `bin_count + 1` bin edges; the last one is exactly the upper bound.
    #[must_use]
    pub fn edges(&self) -> Vec<f64> {
        (0..=self.bin_count).map(|k| self.edge(k)).collect()
    }

    /// Edge `k` of [`BinPlan::edges`], for `k <= bin_count`.
    #[expect(clippy::cast_precision_loss)]
    fn edge(&self, k: usize) -> f64 {
        let (lo, hi) = self.edge_range();
        if k == self.bin_count {
            hi
        } else {
            lo + self.bin_width() * k as f64
        }
    }

    /// Index of the bin containing `value`, or `None` if it falls outside the
    /// covered range.
    ///
    /// Bin `k` is `[edges[k], edges[k + 1])`, except the last, which includes
    /// the upper bound. The index is checked against the edges themselves, so a
    /// value equal to an edge always lands in the bin that edge opens.
    #[expect(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    #[must_use]
    pub fn bin_index(&self, value: f64) -> Option<usize> {
        let (lo, hi) = self.edge_range();
        if !(lo..=hi).contains(&value) {
            return None;
        }
        let position = (value - lo) / self.bin_width();
        let mut idx = (position.floor() as usize).min(self.bin_count - 1);
        while idx > 0 && value < self.edge(idx) {
            idx -= 1;
        }
        while idx + 1 < self.bin_count && value >= self.edge(idx + 1) {
            idx += 1;
        }
        Some(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bin_floor() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(BinPlan::new(&values, 10).unwrap().bin_count, 40);
        assert_eq!(BinPlan::new(&values, 0).unwrap().bin_count, 40);
        assert_eq!(BinPlan::new(&values, 40).unwrap().bin_count, 40);
        assert_eq!(BinPlan::new(&values, 500).unwrap().bin_count, 500);
    }

    #[test]
    fn test_empty_series_is_rejected() {
        let err = BinPlan::new(&[], 200).unwrap_err();
        assert_eq!(
            err,
            StatsError::EmptySeries {
                operation: "bin planning"
            }
        );
    }

    #[test]
    fn test_range_is_order_independent() {
        let plan = BinPlan::new(&[5.0, -2.0, 9.0, 0.0], 40).unwrap();
        assert_eq!(plan.range_min, -2.0);
        assert_eq!(plan.range_max, 9.0);
        assert!((plan.bin_width() - 11.0 / 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_edges() {
        let plan = BinPlan::new(&[0.0, 40.0], 40).unwrap();
        let edges = plan.edges();
        assert_eq!(edges.len(), 41);
        assert_eq!(edges[0], 0.0);
        assert_eq!(edges[1], 1.0);
        assert_eq!(edges[40], 40.0);
    }

    #[test]
    fn test_bin_index_boundaries() {
        let plan = BinPlan::new(&[0.0, 40.0], 40).unwrap();
        assert_eq!(plan.bin_index(0.0), Some(0));
        assert_eq!(plan.bin_index(0.999), Some(0));
        assert_eq!(plan.bin_index(1.0), Some(1));
        assert_eq!(plan.bin_index(39.5), Some(39));
        // upper bound belongs to the last bin
        assert_eq!(plan.bin_index(40.0), Some(39));
        assert_eq!(plan.bin_index(-0.1), None);
        assert_eq!(plan.bin_index(40.1), None);
        assert_eq!(plan.bin_index(f64::NAN), None);
    }

    #[test]
    fn test_edges_open_their_own_bin() {
        for (lo, hi, bins) in [(99.0, 502.0, 40), (0.1, 0.7, 200), (-3.3, 1.0e4, 333), (1.0, 2.0, 49)] {
            let plan = BinPlan::new(&[lo, hi], bins).unwrap();
            let edges = plan.edges();
            for (k, &edge) in edges.iter().enumerate().take(plan.bin_count) {
                assert_eq!(plan.bin_index(edge), Some(k), "edge {k} = {edge} of [{lo}, {hi}]");
            }
            assert_eq!(plan.bin_index(hi), Some(plan.bin_count - 1));
        }
    }

    #[test]
    fn test_bin_index_agrees_with_edges() {
        let plan = BinPlan::new(&[99.0, 502.0], 40).unwrap();
        let edges = plan.edges();
        let mut value = 99.0;
        while value <= 502.0 {
            let idx = plan.bin_index(value).unwrap();
            assert!(edges[idx] <= value);
            assert!(value < edges[idx + 1] || idx == plan.bin_count - 1);
            value += 0.075;
        }
    }

    #[test]
    fn test_constant_series_widens_range() {
        let plan = BinPlan::new(&[7.0, 7.0, 7.0], 40).unwrap();
        assert_eq!((plan.range_min, plan.range_max), (7.0, 7.0));
        assert_eq!(plan.edge_range(), (6.5, 7.5));
        assert!((plan.bin_width() - 1.0 / 40.0).abs() < 1e-12);
        assert_eq!(plan.bin_index(7.0), Some(20));
    }
}
