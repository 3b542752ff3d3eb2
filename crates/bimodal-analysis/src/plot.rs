//! Derived series for plotting
//!
//! Rendering is left to external tools; [`PlotData`] collects everything the
//! usual three views need into one serializable document:
//!
//! - the overlaid histograms of all samples and both groups, with optional KDE
//!   curves rescaled to histogram counts
//! - the separate per-group histograms (same bins)
//! - the trimmed cycles over sample index
//!
//! All histograms share [`PlotData::edges`], so a renderer only needs the edges
//! once and a count vector per series.

use bimodal_stats::{binning::BinPlan, trim::QuantileTrim};
use serde::Serialize;

use crate::{
    config::AnalysisConfig,
    pipeline::{Analysis, GroupDensity, SeriesAnalysis},
};

#[derive(Debug, Clone, Serialize)]
pub struct PlotData<'a> {
    pub config: &'a AnalysisConfig,
    pub cutoffs: &'a QuantileTrim,
    pub bin_plan: &'a BinPlan,
    pub bin_width: f64,
    /// `bin_count + 1` ascending bin edges.
    pub edges: Vec<f64>,
    /// Histograms in report order: all, `thrash=0`, `thrash=1`.
    pub histograms: Vec<HistogramSeries>,
    /// One curve per group when the KDE overlay is enabled.
    pub kde: Option<Vec<KdeSeries<'a>>>,
    pub time_series: TimeSeries,
}

#[derive(Debug, Clone, Serialize)]
pub struct HistogramSeries {
    pub label: String,
    pub counts: Vec<u64>,
}

impl HistogramSeries {
    fn new(series: &SeriesAnalysis) -> Self {
        Self {
            label: series.kind.label(),
            counts: series.histogram.counts(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct KdeSeries<'a> {
    pub label: String,
    /// `None` when the group was empty.
    pub bandwidth: Option<f64>,
    pub grid: &'a [f64],
    pub density: &'a [f64],
    /// Density times group size times bin width, comparable to `counts`.
    pub expected_counts: Vec<f64>,
}

impl<'a> KdeSeries<'a> {
    fn new(group: &'a GroupDensity) -> Self {
        Self {
            label: group.condition.to_string(),
            bandwidth: group.curve.bandwidth,
            grid: &group.curve.grid,
            density: &group.curve.density,
            expected_counts: group.expected_counts().density,
        }
    }
}

/// Trimmed measurements in recording order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimeSeries {
    pub index: Vec<i64>,
    pub cycles: Vec<f64>,
}

impl<'a> PlotData<'a> {
    #[must_use]
    pub fn new(analysis: &'a Analysis) -> Self {
        let time_series = analysis.trimmed.sample.measurements().iter().fold(
            TimeSeries::default(),
            |mut ts, m| {
                ts.index.push(m.index);
                ts.cycles.push(m.cycles);
                ts
            },
        );

        Self {
            config: &analysis.config,
            cutoffs: &analysis.trimmed.cutoffs,
            bin_plan: &analysis.bin_plan,
            bin_width: analysis.bin_plan.bin_width(),
            edges: analysis.bin_plan.edges(),
            histograms: analysis
                .series()
                .into_iter()
                .map(HistogramSeries::new)
                .collect(),
            kde: analysis
                .densities
                .as_ref()
                .map(|groups| groups.iter().map(KdeSeries::new).collect()),
            time_series,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::{
        config::{KdeConfig, TrimConfig},
        pipeline,
        sample::Sample,
    };

    fn analysis(kde: Option<KdeConfig>) -> Analysis {
        let csv = "i,thrash,cycles\n0,0,10\n1,1,20\n2,0,11\n3,1,21\n4,0,1000\n";
        let sample = Sample::from_csv_reader(csv.as_bytes()).unwrap();
        let config = AnalysisConfig {
            trim: TrimConfig {
                q_lo: 0.0,
                q_hi: 0.8,
            },
            bins: 50,
            kde,
        };
        pipeline::analyze(&sample, &config).unwrap()
    }

    #[test]
    fn test_histograms_share_edges() {
        let analysis = analysis(None);
        let plot = PlotData::new(&analysis);
        assert_eq!(plot.edges.len(), 51);
        assert_eq!(plot.edges.first(), Some(&10.0));
        assert_eq!(plot.edges.last(), Some(&21.0));
        let labels = plot
            .histograms
            .iter()
            .map(|h| h.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(labels, ["all", "thrash=0", "thrash=1"]);
        for histogram in &plot.histograms {
            assert_eq!(histogram.counts.len(), 50);
        }
        assert_eq!(plot.histograms[0].counts.iter().sum::<u64>(), 4);
        assert!(plot.kde.is_none());
    }

    #[test]
    fn test_time_series_is_trimmed_and_ordered() {
        let analysis = analysis(None);
        let plot = PlotData::new(&analysis);
        assert_eq!(plot.time_series.index, [0, 1, 2, 3]);
        assert_eq!(plot.time_series.cycles, [10.0, 20.0, 11.0, 21.0]);
    }

    #[test]
    fn test_kde_curves_are_rescaled() {
        let analysis = analysis(Some(KdeConfig::default()));
        let plot = PlotData::new(&analysis);
        let curves = plot.kde.as_ref().unwrap();
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].label, "thrash=0");
        let scale = 2.0 * plot.bin_width;
        for (expected, density) in curves[0].expected_counts.iter().zip(curves[0].density) {
            assert!((expected - density * scale).abs() < 1e-12);
        }
    }

    #[test]
    fn test_json_document() {
        let analysis = analysis(Some(KdeConfig::default()));
        let json = serde_json::to_value(PlotData::new(&analysis)).unwrap();
        assert_eq!(json["config"]["bins"], Value::from(50));
        assert_eq!(json["cutoffs"]["lo"], Value::from(10.0));
        assert_eq!(json["bin_plan"]["bin_count"], Value::from(50));
        assert_eq!(json["histograms"][2]["label"], Value::from("thrash=1"));
        assert_eq!(json["kde"][1]["grid"].as_array().unwrap().len(), 400);
        assert_eq!(json["time_series"]["index"][3], Value::from(3));
    }
}
