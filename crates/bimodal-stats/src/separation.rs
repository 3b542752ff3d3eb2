use serde::Serialize;

use crate::percentiles;

/// Quick checks of how distinguishable two groups are.
///
/// Group 0 is the expected "fast" condition and group 1 the "slow" one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeparationReport {
    /// `median(group1) - median(group0)`.
    pub median_diff: f64,
    /// `p10(group1) - p90(group0)`; positive means the bulk of the two groups
    /// do not overlap.
    pub tail_gap: f64,
}

impl SeparationReport {
    /// Compares two groups given in any order.
    ///
    /// Returns `None` if either group is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use bimodal_stats::separation::SeparationReport;
    ///
    /// let report = SeparationReport::compute(&[1.0; 5], &[100.0; 5]).unwrap();
    /// assert_eq!(report.median_diff, 99.0);
    /// assert_eq!(report.tail_gap, 99.0);
    /// assert!(report.is_well_separated());
    ///
    /// assert!(SeparationReport::compute(&[1.0], &[]).is_none());
    /// ```
    #[must_use]
    pub fn compute(group0: &[f64], group1: &[f64]) -> Option<Self> {
        if group0.is_empty() || group1.is_empty() {
            return None;
        }
        let g0 = sorted(group0);
        let g1 = sorted(group1);
        Some(Self {
            median_diff: percentiles::median(&g1) - percentiles::median(&g0),
            tail_gap: percentiles::compute_percentile(&g1, 10.0)
                - percentiles::compute_percentile(&g0, 90.0),
        })
    }

    #[must_use]
    pub fn is_well_separated(&self) -> bool {
        self.tail_gap > 0.0
    }
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}
