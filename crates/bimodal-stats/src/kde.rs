//! Gaussian kernel density estimation.
//!
//! The estimator sums one Gaussian kernel per sample at every grid point. It is
//! `O(n * m)` for `n` samples and `m` grid points and never truncates kernel
//! tails, so keep the grid modest (a few hundred points) for large samples.
//!
//! # Examples
//!
//! ```
//! use bimodal_stats::kde::{self, DensityCurve};
//!
//! let samples = [0.0, 1.0, 2.0, 3.0, 4.0];
//! let grid = kde::linspace(-10.0, 14.0, 500);
//! let curve = DensityCurve::estimate(&samples, &grid, None).unwrap();
//!
//! assert_eq!(curve.grid.len(), curve.density.len());
//! assert!((curve.integral() - 1.0).abs() < 0.05);
//! ```

use std::f64::consts::PI;

use serde::Serialize;

use crate::error::StatsError;

/// A probability density sampled at a set of grid positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityCurve {
    /// Grid positions, in the order they were supplied.
    pub grid: Vec<f64>,
    /// Estimated density at each grid position; always `>= 0`.
    pub density: Vec<f64>,
    /// Kernel bandwidth used; `None` when the sample was empty.
    pub bandwidth: Option<f64>,
}

impl DensityCurve {
    /// Estimates the density of `samples` at every point of `grid`.
    ///
    /// With `bandwidth == None` the bandwidth follows [`silverman_bandwidth`].
    /// An empty sample yields an all-zero curve.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidBandwidth`] if an explicit `bandwidth` is
    /// not a positive finite number, whether or not `samples` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bimodal_stats::{error::StatsError, kde::DensityCurve};
    /// let err = DensityCurve::estimate(&[0.0], &[0.0], Some(0.0)).unwrap_err();
    /// assert_eq!(err, StatsError::InvalidBandwidth { bandwidth: 0.0 });
    /// ```
    #[expect(clippy::cast_precision_loss)]
    pub fn estimate(
        samples: &[f64],
        grid: &[f64],
        bandwidth: Option<f64>,
    ) -> Result<Self, StatsError> {
        if let Some(bandwidth) = bandwidth {
            validate_bandwidth(bandwidth)?;
        }
        if samples.is_empty() {
            return Ok(Self {
                grid: grid.to_vec(),
                density: vec![0.0; grid.len()],
                bandwidth: None,
            });
        }

        let bw = bandwidth.unwrap_or_else(|| silverman_bandwidth(samples));
        let norm = 1.0 / (samples.len() as f64 * bw * (2.0 * PI).sqrt());
        let density = grid
            .iter()
            .map(|&g| {
                let mut sum = 0.0_f64;
                for &x in samples {
                    let z = (g - x) / bw;
                    sum += (-0.5 * z * z).exp();
                }
                sum * norm
            })
            .collect();

        Ok(Self {
            grid: grid.to_vec(),
            density,
            bandwidth: Some(bw),
        })
    }

    /// Returns the curve multiplied by `factor`.
    ///
    /// Overlaying a density on a histogram uses
    /// `factor = group_size * bin_width`, which turns density into expected
    /// counts per bin.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            grid: self.grid.clone(),
            density: self.density.iter().map(|d| d * factor).collect(),
            bandwidth: self.bandwidth,
        }
    }

    /// Trapezoidal integral of the density over the grid.
    #[must_use]
    pub fn integral(&self) -> f64 {
        self.grid
            .windows(2)
            .zip(self.density.windows(2))
            .map(|(g, d)| (g[1] - g[0]) * (d[0] + d[1]) / 2.0)
            .sum()
    }
}

/// Accepts only positive finite bandwidths.
pub fn validate_bandwidth(bandwidth: f64) -> Result<(), StatsError> {
    if bandwidth > 0.0 && bandwidth.is_finite() {
        Ok(())
    } else {
        Err(StatsError::InvalidBandwidth { bandwidth })
    }
}

/// Silverman's rule-of-thumb bandwidth: `1.06 * std * n^(-1/5)`.
///
/// `std` is the population standard deviation. A zero standard deviation is
/// replaced by 1.0, and a non-positive or non-finite result by 1.0, so the
/// returned bandwidth is always positive and finite for a non-empty sample.
///
/// # Examples
///
/// ```
/// use bimodal_stats::kde::silverman_bandwidth;
///
/// // constant sample: std falls back to 1.0
/// let bw = silverman_bandwidth(&[5.0; 32]);
/// assert!((bw - 1.06 * 32.0_f64.powf(-0.2)).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn silverman_bandwidth(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 1.0;
    }
    let n = samples.len() as f64;
    let mut std = population_std(samples);
    if std == 0.0 {
        tracing::warn!(n = samples.len(), "zero variance sample, using std = 1.0 for bandwidth");
        std = 1.0;
    }
    let bw = 1.06 * std * n.powf(-0.2);
    if bw > 0.0 && bw.is_finite() {
        bw
    } else {
        tracing::warn!(bw, "degenerate Silverman bandwidth, using 1.0");
        1.0
    }
}

/// Population standard deviation (N denominator); 0 for an empty slice.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}

/// `num` evenly spaced points from `start` to `stop` inclusive.
///
/// Returns `[start]` for `num == 1` and an empty grid for `num == 0`.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}
