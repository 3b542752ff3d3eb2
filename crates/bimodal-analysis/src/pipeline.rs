//! The analysis pipeline
//!
//! ```text
//! Sample ──trim──▶ TrimmedSample ──┬─▶ StatsSummary per series
//!                                  ├─▶ SeparationReport (both groups present)
//!                                  ├─▶ BinPlan ──▶ Histogram per series
//!                                  └─▶ DensityCurve per group (optional)
//! ```
//!
//! Three series are analyzed: all trimmed measurements, and the two
//! [`Condition`] groups. The trim cutoffs and the bin plan are always derived
//! from the combined series so the groups are compared on the same footing.

use bimodal_stats::{
    binning::BinPlan,
    descriptive::StatsSummary,
    error::StatsError,
    histogram::Histogram,
    kde::{self, DensityCurve},
    separation::SeparationReport,
    trim::QuantileTrim,
};

use crate::{
    config::{AnalysisConfig, KdeConfig},
    sample::{Condition, Sample, TrimmedSample},
};

/// Which subset of the trimmed sample a series covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    All,
    Condition(Condition),
}

impl SeriesKind {
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::All => "all".to_owned(),
            Self::Condition(condition) => condition.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeriesAnalysis {
    pub kind: SeriesKind,
    /// Trimmed cycle counts of this series, in recording order.
    pub values: Vec<f64>,
    /// `None` when the series is empty.
    pub summary: Option<StatsSummary>,
    pub histogram: Histogram,
}

impl SeriesAnalysis {
    fn new(kind: SeriesKind, values: Vec<f64>, plan: &BinPlan) -> Self {
        let summary = StatsSummary::new(values.iter().copied());
        let histogram = Histogram::from_plan(plan, values.iter().copied());
        Self {
            kind,
            values,
            summary,
            histogram,
        }
    }
}

/// Density of one group, with the factor that converts it to expected
/// histogram counts.
#[derive(Debug, Clone)]
pub struct GroupDensity {
    pub condition: Condition,
    pub curve: DensityCurve,
    /// `group_size * bin_width`.
    pub count_scale: f64,
}

impl GroupDensity {
    /// The density rescaled to match the group's histogram height.
    #[must_use]
    pub fn expected_counts(&self) -> DensityCurve {
        self.curve.scaled(self.count_scale)
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub config: AnalysisConfig,
    pub trimmed: TrimmedSample,
    pub all: SeriesAnalysis,
    pub baseline: SeriesAnalysis,
    pub thrash: SeriesAnalysis,
    /// `None` unless both groups are non-empty.
    pub separation: Option<SeparationReport>,
    pub bin_plan: BinPlan,
    /// Present when the config enables the KDE overlay.
    pub densities: Option<[GroupDensity; 2]>,
}

impl Analysis {
    /// The three series in report order: all, `thrash=0`, `thrash=1`.
    #[must_use]
    pub fn series(&self) -> [&SeriesAnalysis; 3] {
        [&self.all, &self.baseline, &self.thrash]
    }

    #[must_use]
    pub fn condition(&self, condition: Condition) -> &SeriesAnalysis {
        match condition {
            Condition::Baseline => &self.baseline,
            Condition::Thrash => &self.thrash,
        }
    }
}

/// Runs the whole analysis on `sample`.
///
/// # Errors
///
/// * [`StatsError::InvalidRange`] - the trim cutoffs are invalid
/// * [`StatsError::EmptySeries`] - the sample has no finite cycle counts
/// * [`StatsError::NothingRetained`] - trimming removed every measurement
/// * [`StatsError::InvalidBandwidth`] - the KDE bandwidth settings are invalid
///
/// # Examples
///
/// ```
/// use bimodal_analysis::{config::AnalysisConfig, pipeline, sample::Sample};
///
/// let csv = "i,thrash,cycles\n0,0,100\n1,0,101\n2,1,500\n3,1,502\n";
/// let sample = Sample::from_csv_reader(csv.as_bytes()).unwrap();
/// let analysis = pipeline::analyze(&sample, &AnalysisConfig::default()).unwrap();
///
/// assert!(analysis.separation.unwrap().is_well_separated());
/// assert_eq!(analysis.bin_plan.bin_count, 200);
/// ```
pub fn analyze(sample: &Sample, config: &AnalysisConfig) -> Result<Analysis, StatsError> {
    config.validate()?;

    let trimmed = sample.trim(config.trim.q_lo, config.trim.q_hi)?;
    tracing::debug!(
        lo = trimmed.cutoffs.lo,
        hi = trimmed.cutoffs.hi,
        kept = trimmed.sample.len(),
        removed = trimmed.removed,
        "trimmed sample"
    );
    let unlabeled = trimmed.sample.unlabeled_count();
    if unlabeled > 0 {
        tracing::warn!(
            unlabeled,
            "measurements with a thrash label other than 0 or 1 only count towards \"all\""
        );
    }

    let all_values = trimmed.sample.cycles();
    if all_values.is_empty() {
        let QuantileTrim { q_lo, q_hi, lo, hi } = trimmed.cutoffs;
        tracing::warn!(q_lo, q_hi, lo, hi, "trimming removed every measurement");
        return Err(StatsError::NothingRetained { q_lo, q_hi, lo, hi });
    }
    let bin_plan = BinPlan::new(&all_values, config.bins)?;

    let all = SeriesAnalysis::new(SeriesKind::All, all_values, &bin_plan);
    let [baseline, thrash] = Condition::ALL.map(|condition| {
        let values = trimmed.sample.condition_cycles(condition);
        if values.is_empty() {
            tracing::warn!(%condition, "no measurements in group after trimming");
        }
        SeriesAnalysis::new(SeriesKind::Condition(condition), values, &bin_plan)
    });

    let separation = SeparationReport::compute(&baseline.values, &thrash.values);
    if let Some(separation) = &separation {
        tracing::debug!(
            median_diff = separation.median_diff,
            tail_gap = separation.tail_gap,
            "computed separation"
        );
    }

    let densities = config
        .kde
        .as_ref()
        .map(|kde_config| {
            let groups = [
                (Condition::Baseline, baseline.values.as_slice()),
                (Condition::Thrash, thrash.values.as_slice()),
            ];
            estimate_densities(kde_config, &bin_plan, &all.values, groups)
        })
        .transpose()?;

    Ok(Analysis {
        config: config.clone(),
        trimmed,
        all,
        baseline,
        thrash,
        separation,
        bin_plan,
        densities,
    })
}

#[expect(clippy::cast_precision_loss)]
fn estimate_densities(
    config: &KdeConfig,
    plan: &BinPlan,
    all_values: &[f64],
    groups: [(Condition, &[f64]); 2],
) -> Result<[GroupDensity; 2], StatsError> {
    let grid = kde::linspace(plan.range_min, plan.range_max, config.effective_grid_points());
    let shared_bandwidth = config.bandwidth.resolve(all_values);
    tracing::debug!(
        grid_points = grid.len(),
        bandwidth = ?shared_bandwidth,
        "estimating group densities"
    );

    let estimate = |(condition, values): (Condition, &[f64])| -> Result<_, StatsError> {
        Ok(GroupDensity {
            condition,
            curve: DensityCurve::estimate(values, &grid, shared_bandwidth)?,
            count_scale: values.len() as f64 * plan.bin_width(),
        })
    };
    let [baseline, thrash] = groups;
    Ok([estimate(baseline)?, estimate(thrash)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{KdeBandwidth, TrimConfig},
        sample::Measurement,
    };

    fn scenario() -> Sample {
        let groups = [0, 0, 0, 0, 0, 1, 1, 1, 1, 1];
        let cycles = [
            100.0, 101.0, 99.0, 100.0, 102.0, 500.0, 501.0, 499.0, 500.0, 502.0,
        ];
        Sample::new(
            groups
                .iter()
                .zip(cycles)
                .zip(0..)
                .map(|((&group, cycles), index)| Measurement {
                    index,
                    group,
                    cycles,
                })
                .collect(),
        )
    }

    fn untrimmed() -> AnalysisConfig {
        AnalysisConfig {
            trim: TrimConfig {
                q_lo: 0.0,
                q_hi: 1.0,
            },
            ..AnalysisConfig::default()
        }
    }

    #[test]
    fn test_bimodal_scenario() {
        let analysis = analyze(&scenario(), &untrimmed()).unwrap();

        assert_eq!(analysis.trimmed.removed, 0);
        let all = analysis.all.summary.as_ref().unwrap();
        let baseline = analysis.baseline.summary.as_ref().unwrap();
        let thrash = analysis.thrash.summary.as_ref().unwrap();
        assert_eq!(all.count, 10);
        assert_eq!(baseline.count, 5);
        assert_eq!(thrash.count, 5);
        assert!((baseline.mean - 100.4).abs() < 1e-9);
        assert!((thrash.mean - 500.4).abs() < 1e-9);

        let separation = analysis.separation.unwrap();
        assert!((separation.median_diff - 400.0).abs() < 1e-9);
        assert!((separation.tail_gap - 397.8).abs() < 1e-9);

        assert_eq!(analysis.bin_plan.range_min, 99.0);
        assert_eq!(analysis.bin_plan.range_max, 502.0);
        assert_eq!(analysis.bin_plan.bin_count, 200);
        assert!(analysis.densities.is_none());
    }

    #[test]
    fn test_histograms_share_the_plan() {
        let analysis = analyze(&scenario(), &untrimmed()).unwrap();
        assert_eq!(analysis.all.histogram.total(), 10);
        assert_eq!(analysis.baseline.histogram.total(), 5);
        assert_eq!(analysis.thrash.histogram.total(), 5);
        for series in analysis.series() {
            assert_eq!(series.histogram.bins.len(), 200);
            assert_eq!(series.histogram.outside, 0);
        }
    }

    #[test]
    fn test_missing_group_has_no_separation() {
        let sample = scenario().filter(|m| m.group == 0);
        let analysis = analyze(&sample, &untrimmed()).unwrap();
        assert!(analysis.thrash.summary.is_none());
        assert!(analysis.thrash.values.is_empty());
        assert!(analysis.separation.is_none());
        assert!(analysis.baseline.summary.is_some());
    }

    #[test]
    fn test_empty_sample_fails() {
        let err = analyze(&Sample::default(), &untrimmed()).unwrap_err();
        assert!(matches!(err, StatsError::EmptySeries { .. }));
    }

    #[test]
    fn test_trimming_everything_reports_cutoffs() {
        let sample = Sample::new(vec![
            Measurement {
                index: 0,
                group: 0,
                cycles: 0.0,
            },
            Measurement {
                index: 1,
                group: 1,
                cycles: 10.0,
            },
        ]);
        let config = AnalysisConfig {
            trim: TrimConfig {
                q_lo: 0.3,
                q_hi: 0.6,
            },
            ..AnalysisConfig::default()
        };
        let err = analyze(&sample, &config).unwrap_err();
        assert!(err.to_string().contains("removed every measurement"));
        match err {
            StatsError::NothingRetained { q_lo, q_hi, lo, hi } => {
                assert_eq!((q_lo, q_hi), (0.3, 0.6));
                assert!((lo - 3.0).abs() < 1e-9);
                assert!((hi - 6.0).abs() < 1e-9);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_cutoffs_fail() {
        let config = AnalysisConfig {
            trim: TrimConfig {
                q_lo: 0.9,
                q_hi: 0.1,
            },
            ..AnalysisConfig::default()
        };
        let err = analyze(&scenario(), &config).unwrap_err();
        assert_eq!(err, StatsError::InvalidRange { q_lo: 0.9, q_hi: 0.1 });
    }

    #[test]
    fn test_invalid_bandwidth_fails_before_trimming() {
        let config = AnalysisConfig {
            kde: Some(KdeConfig {
                bandwidth: KdeBandwidth::Fixed { bandwidth: -1.0 },
                ..KdeConfig::default()
            }),
            ..untrimmed()
        };
        let err = analyze(&Sample::default(), &config).unwrap_err();
        assert!(matches!(err, StatsError::InvalidBandwidth { .. }));
    }

    #[test]
    fn test_default_trim_drops_spike() {
        let mut measurements = (0..2000)
            .map(|index| Measurement {
                index,
                group: index % 2,
                cycles: if index % 2 == 0 { 100.0 } else { 500.0 },
            })
            .collect::<Vec<_>>();
        measurements[1000].cycles = 1.0e8;
        let analysis = analyze(&Sample::new(measurements), &AnalysisConfig::default()).unwrap();
        assert!(analysis.trimmed.removed >= 1);
        assert!(analysis.bin_plan.range_max < 1.0e8);
    }

    #[test]
    fn test_kde_overlay() {
        let config = AnalysisConfig {
            kde: Some(KdeConfig::default()),
            ..untrimmed()
        };
        let analysis = analyze(&scenario(), &config).unwrap();
        let [baseline, thrash] = analysis.densities.as_ref().unwrap();
        assert_eq!(baseline.condition, Condition::Baseline);
        assert_eq!(thrash.condition, Condition::Thrash);
        assert_eq!(baseline.curve.grid.len(), 400);
        assert_eq!(baseline.curve.grid.first(), Some(&99.0));
        assert_eq!(baseline.curve.grid.last(), Some(&502.0));

        let bin_width = (502.0 - 99.0) / 200.0;
        assert!((baseline.count_scale - 5.0 * bin_width).abs() < 1e-9);

        // both groups share the 0.02 * std(all) bandwidth
        let expected_bw = 0.02 * kde::population_std(&analysis.all.values);
        assert_eq!(baseline.curve.bandwidth, thrash.curve.bandwidth);
        assert!((baseline.curve.bandwidth.unwrap() - expected_bw).abs() < 1e-12);

        let counts = baseline.expected_counts();
        let (peak_idx, _) = counts
            .density
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();
        assert!(counts.grid[peak_idx] < 110.0);
    }

    #[test]
    fn test_kde_with_silverman_per_group() {
        let config = AnalysisConfig {
            kde: Some(KdeConfig {
                grid_points: 10,
                bandwidth: KdeBandwidth::Silverman,
            }),
            ..untrimmed()
        };
        let analysis = analyze(&scenario(), &config).unwrap();
        let [baseline, thrash] = analysis.densities.as_ref().unwrap();
        assert_eq!(baseline.curve.grid.len(), KdeConfig::MIN_GRID_POINTS);
        assert_eq!(
            baseline.curve.bandwidth,
            Some(kde::silverman_bandwidth(&analysis.baseline.values))
        );
        assert_eq!(
            thrash.curve.bandwidth,
            Some(kde::silverman_bandwidth(&analysis.thrash.values))
        );
    }

    #[test]
    fn test_kde_on_empty_group_is_zero() {
        let config = AnalysisConfig {
            kde: Some(KdeConfig::default()),
            ..untrimmed()
        };
        let sample = scenario().filter(|m| m.group == 1);
        let analysis = analyze(&sample, &config).unwrap();
        let [baseline, _] = analysis.densities.as_ref().unwrap();
        assert!(baseline.curve.density.iter().all(|&d| d == 0.0));
        assert_eq!(baseline.count_scale, 0.0);
    }
}
