//! Bimodal timing analysis of benchmark cycle counts
//!
//! This crate turns the raw table written by the branch/cache benchmark into
//! the numbers used to judge whether the two experimental conditions produce
//! separable cycle-count distributions.
//!
//! # Overview
//!
//! 1. **Load** ([`sample::Sample::from_csv_reader`]): Read the `i,thrash,cycles`
//!    table
//! 2. **Configure** ([`config::AnalysisConfig`]): Trim cutoffs, bin count, KDE
//!    overlay
//! 3. **Analyze** ([`pipeline::analyze`]): Trim, split by condition, describe,
//!    compare, bin and optionally estimate densities
//! 4. **Present**: Render the text [`report::Report`] or serialize the
//!    [`plot::PlotData`] for a plotting tool
//!
//! The statistical estimators themselves live in [`bimodal_stats`].
//!
//! # Examples
//!
//! ```
//! use bimodal_analysis::{config::AnalysisConfig, pipeline, report::Report, sample::Sample};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let csv = "i,thrash,cycles\n0,0,100\n1,1,500\n2,0,102\n3,1,498\n";
//! let sample = Sample::from_csv_reader(csv.as_bytes())?;
//!
//! let analysis = pipeline::analyze(&sample, &AnalysisConfig::default())?;
//! let separation = analysis.separation.expect("both groups have data");
//! assert!(separation.tail_gap > 0.0);
//!
//! let report = Report::new(&analysis).to_string();
//! assert!(report.starts_with("Quantile trim: [0.001, 0.999]"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dataset;
pub mod pipeline;
pub mod plot;
pub mod report;
pub mod sample;
