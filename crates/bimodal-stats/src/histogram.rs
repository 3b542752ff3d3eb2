use std::ops::Range;

use serde::Serialize;

use crate::binning::BinPlan;

/// A histogram representation of a dataset's distribution.
///
/// Every histogram is built from a [`BinPlan`], so histograms of different
/// groups built from the same plan have identical bins and can be overlaid
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order.
    pub bins: Vec<HistogramBin>,
    /// Number of values that fell outside the planned range.
    pub outside: u64,
}

/// A single bin in a histogram.
///
/// Each bin represents a range of values and the count of data points falling
/// within that range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end;
    /// the last bin also includes its end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl Histogram {
    /// Counts `values` into the bins of `plan`.
    ///
    /// Values outside the plan's range (including NaN) are not binned and are
    /// tallied in [`Histogram::outside`] instead.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bimodal_stats::{binning::BinPlan, histogram::Histogram};
    /// let all = [1.0, 2.0, 3.0, 4.0];
    /// let plan = BinPlan::new(&all, 40).unwrap();
    /// let histogram = Histogram::from_plan(&plan, [1.0, 4.0, 9.0]);
    /// assert_eq!(histogram.bins.len(), 40);
    /// assert_eq!(histogram.total(), 2);
    /// assert_eq!(histogram.outside, 1);
    /// ```
    #[must_use]
    pub fn from_plan<I>(plan: &BinPlan, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let edges = plan.edges();
        let mut bins = edges
            .windows(2)
            .map(|w| HistogramBin {
                range: w[0]..w[1],
                count: 0,
            })
            .collect::<Vec<_>>();

        let mut outside = 0;
        for value in values {
            match plan.bin_index(value) {
                Some(idx) => bins[idx].count += 1,
                None => outside += 1,
            }
        }

        Self { bins, outside }
    }

    /// Total number of binned values.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).sum()
    }

    /// Counts of every bin, in order.
    #[must_use]
    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|bin| bin.count).collect()
    }
}
