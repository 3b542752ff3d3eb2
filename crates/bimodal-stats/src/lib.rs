//! Statistical core for bimodal timing analysis.
//!
//! This crate provides the estimators used to decide whether two sets of cycle
//! counts form separable distributions:
//!
//! - **Percentiles**: Linearly interpolated quantiles and percentile tables
//! - **Trimming**: Quantile-based removal of interrupt/SMI spikes
//! - **Descriptive statistics**: Count, mean, standard deviation, quantile table, IQR, scaled MAD
//! - **Kernel density estimation**: Gaussian KDE with Silverman or explicit bandwidth
//! - **Separation**: Median difference and tail gap between two groups
//! - **Binning**: A shared histogram range and bin count, and histograms built from it
//!
//! Every function is pure and single-threaded. Empty inputs that have a
//! meaningful "not applicable" answer return `None` or an all-zero result; only
//! real parameter violations produce a [`StatsError`](error::StatsError).
//!
//! # Examples
//!
//! ## Describing a series
//!
//! ```
//! use bimodal_stats::descriptive::StatsSummary;
//!
//! let stats = StatsSummary::new([100.0, 101.0, 99.0, 100.0, 102.0]).unwrap();
//! assert!((stats.mean - 100.4).abs() < 1e-9);
//! assert_eq!(stats.median(), 100.0);
//! ```
//!
//! ## Comparing two groups
//!
//! ```
//! use bimodal_stats::separation::SeparationReport;
//!
//! let fast = [100.0, 101.0, 99.0, 100.0, 102.0];
//! let slow = [500.0, 501.0, 499.0, 500.0, 502.0];
//! let report = SeparationReport::compute(&fast, &slow).unwrap();
//! assert!((report.median_diff - 400.0).abs() < 1e-9);
//! assert!(report.is_well_separated());
//! ```
//!
//! ## Trimming, binning and density estimation
//!
//! ```
//! use bimodal_stats::{binning::BinPlan, histogram::Histogram, kde, trim};
//!
//! let values = [100.0, 101.0, 99.0, 100.0, 102.0, 500.0, 501.0, 499.0, 500.0, 502.0];
//! let (kept, _cutoffs) = trim::trim(&values, 0.0, 1.0).unwrap();
//!
//! let plan = BinPlan::new(&kept, 200).unwrap();
//! let histogram = Histogram::from_plan(&plan, kept.iter().copied());
//! assert_eq!(histogram.total(), 10);
//!
//! let grid = kde::linspace(plan.range_min, plan.range_max, 400);
//! let curve = kde::DensityCurve::estimate(&kept, &grid, None).unwrap();
//! assert!(curve.density.iter().all(|&d| d >= 0.0));
//! ```

pub mod binning;
pub mod descriptive;
pub mod error;
pub mod histogram;
pub mod kde;
pub mod percentiles;
pub mod separation;
pub mod trim;
