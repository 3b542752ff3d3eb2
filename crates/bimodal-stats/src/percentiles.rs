use serde::Serialize;

/// Percentile breakpoints reported for every series, in percent.
pub const REPORT_PERCENTILES: [f64; 11] = [
    0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 75.0, 90.0, 95.0, 99.0, 100.0,
];

/// Precomputed percentile values for a dataset.
///
/// This structure stores percentile-value pairs for efficient lookup
/// of commonly used percentile points.
///
/// # Examples
///
/// ```
/// use bimodal_stats::percentiles::Percentiles;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
/// let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]);
///
/// assert_eq!(percentiles.get(50.0), Some(3.0));
/// assert_eq!(percentiles.get(25.0), Some(2.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Percentiles {
    /// Percentile-value pairs, in the order the points were requested.
    /// Each tuple contains (percentile, value) where percentile is 0.0-100.0.
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Computes percentiles from sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bimodal_stats::percentiles::Percentiles;
    ///
    /// let mut values = vec![5.0, 2.0, 8.0, 1.0, 9.0];
    /// values.sort_by(f64::total_cmp);
    /// let percentiles = Percentiles::from_sorted(&values, &[50.0, 90.0]);
    /// assert_eq!(percentiles.get(50.0), Some(5.0));
    /// ```
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let values = percentile_points
            .iter()
            .map(|&p| (p, compute_percentile(sorted_values, p)))
            .collect();
        Self { values }
    }

    /// Computes percentiles from unsorted values.
    ///
    /// This method will sort the values internally before computing percentiles.
    #[must_use]
    pub fn new(values: &[f64], percentile_points: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Gets the value at a specific percentile.
    ///
    /// Returns `None` if the percentile was not precomputed.
    ///
    /// # Examples
    ///
    /// ```
    /// use bimodal_stats::percentiles::Percentiles;
    ///
    /// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    /// let percentiles = Percentiles::new(&values, &[50.0, 95.0]);
    ///
    /// assert_eq!(percentiles.get(50.0), Some(3.0));
    /// assert_eq!(percentiles.get(25.0), None); // Not precomputed
    /// ```
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values.iter().find_map(|(p, value)| {
            if (*p - percentile).abs() < f64::EPSILON {
                Some(*value)
            } else {
                None
            }
        })
    }

    /// Returns an iterator over all (percentile, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }

    /// Returns all percentile-value pairs as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[(f64, f64)] {
        &self.values
    }
}

/// Computes a quantile from sorted data by linear interpolation.
///
/// For `n` values the quantile `q` sits at fractional rank `(n - 1) * q`; the
/// result interpolates between the two order statistics around that rank.
/// `q` is clamped to `[0, 1]`.
///
/// Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use bimodal_stats::percentiles::compute_quantile;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(compute_quantile(&values, 0.5), 2.5);
/// assert_eq!(compute_quantile(&values, 0.0), 1.0);
/// assert_eq!(compute_quantile(&values, 1.0), 4.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn compute_quantile(sorted_values: &[f64], q: f64) -> f64 {
    interpolate_rank(sorted_values, (sorted_values.len().max(1) - 1) as f64 * q.clamp(0.0, 1.0))
}

/// Computes a percentile (0.0 to 100.0) from sorted data.
///
/// Same method as [`compute_quantile`], with the rank computed directly from the
/// percent value so that breakpoints such as 10 or 90 land on exact ranks.
///
/// # Examples
///
/// ```
/// use bimodal_stats::percentiles::compute_percentile;
///
/// let values = [99.0, 100.0, 100.0, 101.0, 102.0];
/// assert!((compute_percentile(&values, 90.0) - 101.6).abs() < 1e-9);
/// assert_eq!(compute_percentile(&values, 50.0), 100.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    let rank = (sorted_values.len().max(1) - 1) as f64 * percentile.clamp(0.0, 100.0) / 100.0;
    interpolate_rank(sorted_values, rank)
}

/// Median of sorted data (the 0.5 quantile); `NAN` if empty.
#[must_use]
pub fn median(sorted_values: &[f64]) -> f64 {
    compute_quantile(sorted_values, 0.5)
}

#[expect(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn interpolate_rank(sorted_values: &[f64], rank: f64) -> f64 {
    let Some(&last) = sorted_values.last() else {
        return f64::NAN;
    };
    let lower = rank.floor() as usize;
    if lower + 1 >= sorted_values.len() {
        return last;
    }
    let frac = rank - rank.floor();
    let lo = sorted_values[lower];
    let hi = sorted_values[lower + 1];
    if frac == 0.0 {
        return lo;
    }
    // Rounding must never step outside the bracketing order statistics.
    (lo + (hi - lo) * frac).max(lo).min(hi)
}
