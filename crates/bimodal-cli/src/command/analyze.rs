//! Bimodal analysis command
//!
//! Loads a benchmark table, runs the analysis pipeline and prints the text
//! report. Plot data for external rendering is written on request.

use std::path::PathBuf;

use anyhow::Context;
use bimodal_analysis::{
    config::{AnalysisConfig, KdeBandwidth, KdeConfig},
    pipeline,
    plot::PlotData,
    report::Report,
};
use clap::Args;

use crate::util::{self, Output};

#[derive(Debug, Clone, Args)]
pub(crate) struct AnalyzeArg {
    /// Path to the CSV file (columns: i, thrash, cycles)
    pub csv: PathBuf,

    /// Lower quantile cutoff [default: 0.001]
    #[arg(long)]
    pub qlo: Option<f64>,

    /// Upper quantile cutoff [default: 0.999]
    #[arg(long)]
    pub qhi: Option<f64>,

    /// Histogram bins, at least 40 are used [default: 200]
    #[arg(long)]
    pub bins: Option<usize>,

    /// Estimate KDE curves for both groups
    #[arg(long)]
    pub kde: bool,

    /// KDE grid points, at least 100 are used [default: 400]
    #[arg(long)]
    pub grid: Option<usize>,

    /// Fixed KDE bandwidth in cycles [default: 0.02 * std of all samples]
    #[arg(long, conflicts_with = "silverman")]
    pub bandwidth: Option<f64>,

    /// Use Silverman's rule per group for the KDE bandwidth
    #[arg(long)]
    pub silverman: bool,

    /// Analysis config JSON file; command-line flags take precedence
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write plot data JSON to this path (`-` for stdout)
    #[arg(long, value_name = "PATH")]
    pub plot_data: Option<PathBuf>,
}

impl AnalyzeArg {
    /// Applies the command-line overrides on top of `config`.
    fn apply_overrides(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(q_lo) = self.qlo {
            config.trim.q_lo = q_lo;
        }
        if let Some(q_hi) = self.qhi {
            config.trim.q_hi = q_hi;
        }
        if let Some(bins) = self.bins {
            config.bins = bins;
        }
        if self.kde && config.kde.is_none() {
            config.kde = Some(KdeConfig::default());
        }

        let kde_flags_given = self.grid.is_some() || self.bandwidth.is_some() || self.silverman;
        match &mut config.kde {
            Some(kde) => {
                if let Some(grid) = self.grid {
                    kde.grid_points = grid;
                }
                if let Some(bandwidth) = self.bandwidth {
                    kde.bandwidth = KdeBandwidth::Fixed { bandwidth };
                }
                if self.silverman {
                    kde.bandwidth = KdeBandwidth::Silverman;
                }
            }
            None if kde_flags_given => {
                tracing::warn!("KDE is disabled, ignoring --grid/--bandwidth/--silverman");
            }
            None => {}
        }
        config
    }

    fn load_config(&self) -> anyhow::Result<AnalysisConfig> {
        let base = match &self.config {
            Some(path) => util::read_json_file("analysis config", path)?,
            None => AnalysisConfig::default(),
        };
        Ok(self.apply_overrides(base))
    }
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let config = arg.load_config()?;
    tracing::debug!(?config, "resolved analysis config");

    let sample = util::read_sample_file(&arg.csv)?;
    let analysis = pipeline::analyze(&sample, &config)
        .with_context(|| format!("Failed to analyze {}", arg.csv.display()))?;
    tracing::info!(
        kept = analysis.trimmed.sample.len(),
        removed = analysis.trimmed.removed,
        "analysis complete"
    );

    print!("{}", Report::new(&analysis));

    if let Some(path) = &arg.plot_data {
        Output::save_json(&PlotData::new(&analysis), path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[clap(flatten)]
        arg: AnalyzeArg,
    }

    fn parse(args: &[&str]) -> AnalyzeArg {
        TestCli::try_parse_from(std::iter::once("bimodal").chain(args.iter().copied()))
            .unwrap()
            .arg
    }

    #[test]
    fn test_defaults_without_flags() {
        let arg = parse(&["out.csv"]);
        assert_eq!(arg.csv, PathBuf::from("out.csv"));
        assert_eq!(
            arg.apply_overrides(AnalysisConfig::default()),
            AnalysisConfig::default()
        );
    }

    #[test]
    fn test_flags_override_config() {
        let arg = parse(&["out.csv", "--qlo", "0.01", "--qhi", "0.99", "--bins", "80"]);
        let base = AnalysisConfig {
            bins: 300,
            ..AnalysisConfig::default()
        };
        let config = arg.apply_overrides(base);
        assert_eq!(config.trim.q_lo, 0.01);
        assert_eq!(config.trim.q_hi, 0.99);
        assert_eq!(config.bins, 80);
        assert!(config.kde.is_none());
    }

    #[test]
    fn test_kde_flags() {
        let config = parse(&["out.csv", "--kde", "--grid", "50", "--bandwidth", "3.5"])
            .apply_overrides(AnalysisConfig::default());
        let kde = config.kde.unwrap();
        assert_eq!(kde.grid_points, 50);
        assert_eq!(kde.bandwidth, KdeBandwidth::Fixed { bandwidth: 3.5 });

        let config = parse(&["out.csv", "--kde", "--silverman"])
            .apply_overrides(AnalysisConfig::default());
        assert_eq!(config.kde.unwrap().bandwidth, KdeBandwidth::Silverman);
    }

    #[test]
    fn test_kde_from_config_is_kept() {
        let base = AnalysisConfig {
            kde: Some(KdeConfig {
                grid_points: 1000,
                bandwidth: KdeBandwidth::Silverman,
            }),
            ..AnalysisConfig::default()
        };
        let config = parse(&["out.csv", "--kde"]).apply_overrides(base.clone());
        assert_eq!(config, base);
    }

    #[test]
    fn test_kde_options_without_kde_are_ignored() {
        let config =
            parse(&["out.csv", "--grid", "50"]).apply_overrides(AnalysisConfig::default());
        assert!(config.kde.is_none());
    }

    #[test]
    fn test_bandwidth_conflicts_with_silverman() {
        let result = TestCli::try_parse_from([
            "bimodal",
            "out.csv",
            "--bandwidth",
            "2",
            "--silverman",
        ]);
        assert!(result.is_err());
    }
}
