use serde::Serialize;

use crate::percentiles::{self, Percentiles, REPORT_PERCENTILES};

/// Scale factor that makes the MAD a consistent estimator of the standard
/// deviation for normally distributed data.
pub const MAD_TO_SIGMA: f64 = 1.4826;

/// Descriptive statistics summarizing one series of measurements.
///
/// The quantile table always covers [`REPORT_PERCENTILES`], so `quantiles.get(25.0)`
/// and friends are guaranteed to be present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSummary {
    /// Number of values in the series.
    pub count: usize,
    /// The arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (N-1 denominator); 0 for a single value.
    pub std: f64,
    /// Linearly interpolated quantiles at the report breakpoints.
    pub quantiles: Percentiles,
    /// Interquartile range (`P75 - P25`).
    pub iqr: f64,
    /// Median absolute deviation scaled by [`MAD_TO_SIGMA`].
    pub mad_scaled: f64,
}

impl StatsSummary {
    /// Computes the summary from unsorted values.
    ///
    /// # Returns
    ///
    /// * `Some(StatsSummary)` - if the series contains at least one value
    /// * `None` - if the series is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use bimodal_stats::descriptive::StatsSummary;
    /// let stats = StatsSummary::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median(), 3.0);
    /// assert_eq!(stats.iqr, 2.0);
    /// assert!((stats.mad_scaled - 1.4826).abs() < 1e-12);
    ///
    /// assert!(StatsSummary::new(Vec::<f64>::new()).is_none());
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes the summary from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );
        if sorted_values.is_empty() {
            return None;
        }

        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let std = if count > 1 {
            let sum_sq = sorted_values
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>();
            (sum_sq / (n - 1.0)).sqrt()
        } else {
            0.0
        };

        let quantiles = Percentiles::from_sorted(sorted_values, &REPORT_PERCENTILES);
        let p25 = percentiles::compute_percentile(sorted_values, 25.0);
        let p75 = percentiles::compute_percentile(sorted_values, 75.0);
        let median = percentiles::median(sorted_values);

        Some(Self {
            count,
            mean,
            std,
            quantiles,
            iqr: p75 - p25,
            mad_scaled: MAD_TO_SIGMA * median_absolute_deviation(sorted_values, median),
        })
    }

    /// Value at one of the report breakpoints.
    ///
    /// Returns `None` for a percentile outside [`REPORT_PERCENTILES`].
    #[must_use]
    pub fn quantile(&self, percentile: f64) -> Option<f64> {
        self.quantiles.get(percentile)
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.quantile_or_nan(0.0)
    }

    #[must_use]
    pub fn median(&self) -> f64 {
        self.quantile_or_nan(50.0)
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.quantile_or_nan(100.0)
    }

    fn quantile_or_nan(&self, percentile: f64) -> f64 {
        self.quantile(percentile).unwrap_or(f64::NAN)
    }
}

/// Unscaled median of `|x - center|`.
fn median_absolute_deviation(values: &[f64], center: f64) -> f64 {
    let mut deviations = values
        .iter()
        .map(|v| (v - center).abs())
        .collect::<Vec<_>>();
    deviations.sort_by(f64::total_cmp);
    percentiles::median(&deviations)
}
