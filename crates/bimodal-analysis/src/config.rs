//! Analysis parameters
//!
//! All tunables of the pipeline live in [`AnalysisConfig`], which is passed
//! explicitly to [`crate::pipeline::analyze`]. The defaults match what the
//! benchmark is usually analyzed with:
//!
//! | Parameter        | Default                   |
//! |------------------|---------------------------|
//! | trim cutoffs     | 0.001 / 0.999             |
//! | histogram bins   | 200 (never below 40)      |
//! | KDE overlay      | off                       |
//! | KDE grid points  | 400 (never below 100)     |
//! | KDE bandwidth    | 0.02 × std of all samples |
//!
//! Configs are serde-serializable so they can be stored next to the results:
//!
//! ```json
//! {
//!   "trim": { "q_lo": 0.001, "q_hi": 0.999 },
//!   "bins": 200,
//!   "kde": { "grid_points": 400, "bandwidth": { "rule": "overall_std", "factor": 0.02 } }
//! }
//! ```

use bimodal_stats::{error::StatsError, kde};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub trim: TrimConfig,
    /// Requested histogram bin count.
    pub bins: usize,
    /// KDE overlay settings; `None` disables density estimation.
    pub kde: Option<KdeConfig>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            trim: TrimConfig::default(),
            bins: 200,
            kde: None,
        }
    }
}

impl AnalysisConfig {
    /// Checks parameters that would otherwise only fail deep inside the pipeline.
    ///
    /// Trim cutoffs are validated by the trimmer itself.
    pub fn validate(&self) -> Result<(), StatsError> {
        if let Some(kde) = &self.kde {
            kde.bandwidth.validate()?;
        }
        Ok(())
    }
}

/// Quantile fractions for outlier trimming.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimConfig {
    pub q_lo: f64,
    pub q_hi: f64,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            q_lo: 0.001,
            q_hi: 0.999,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdeConfig {
    /// Requested number of grid points across the bin plan's range.
    pub grid_points: usize,
    pub bandwidth: KdeBandwidth,
}

impl Default for KdeConfig {
    fn default() -> Self {
        Self {
            grid_points: 400,
            bandwidth: KdeBandwidth::default(),
        }
    }
}

impl KdeConfig {
    /// Floor on the grid resolution.
    pub const MIN_GRID_POINTS: usize = 100;

    #[must_use]
    pub fn effective_grid_points(&self) -> usize {
        self.grid_points.max(Self::MIN_GRID_POINTS)
    }
}

/// How the KDE bandwidth is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum KdeBandwidth {
    /// Silverman's rule, computed separately for each group.
    Silverman,
    /// One explicit bandwidth for every group, in cycles.
    Fixed { bandwidth: f64 },
    /// `factor` times the population std of all trimmed samples, shared by both
    /// groups. Sharper than Silverman on bimodal data, where the overall std is
    /// dominated by the distance between the peaks. Falls back to Silverman when
    /// the overall std is zero.
    OverallStd { factor: f64 },
}

impl Default for KdeBandwidth {
    fn default() -> Self {
        Self::OverallStd { factor: 0.02 }
    }
}

impl KdeBandwidth {
    pub fn validate(&self) -> Result<(), StatsError> {
        match *self {
            Self::Silverman => Ok(()),
            Self::Fixed { bandwidth } => kde::validate_bandwidth(bandwidth),
            Self::OverallStd { factor } => kde::validate_bandwidth(factor),
        }
    }

    /// The bandwidth shared by all groups, or `None` when each group should use
    /// Silverman's rule.
    #[must_use]
    pub fn resolve(&self, all_values: &[f64]) -> Option<f64> {
        match *self {
            Self::Silverman => None,
            Self::Fixed { bandwidth } => Some(bandwidth),
            Self::OverallStd { factor } => {
                let std = kde::population_std(all_values);
                if std > 0.0 {
                    Some(factor * std)
                } else {
                    tracing::warn!("overall std is zero, falling back to Silverman bandwidth");
                    None
                }
            }
        }
    }
}
