//! Plain-text analysis report
//!
//! The report is what `bimodal analyze` prints to stdout: the trim cutoffs, a
//! descriptive block per series, and the separation checks when both groups
//! have data. Every number is printed with three decimals.
//!
//! ```text
//! Quantile trim: [0.000, 1.000] -> keep cycles in [99.000, 502.000]
//! all:
//!   count=10
//!   mean=300.400  std=210.821
//!   ...
//!
//! Separation quick checks:
//!   median(thrash=1) - median(thrash=0) = 400.000 cycles
//!   p10(thrash=1) - p90(thrash=0)       = 397.800 cycles  (positive => well separated)
//! ```

use std::fmt;

use bimodal_stats::{descriptive::StatsSummary, separation::SeparationReport, trim::QuantileTrim};

use crate::pipeline::{Analysis, SeriesAnalysis};

/// Displays the full report of an [`Analysis`].
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    analysis: &'a Analysis,
}

impl<'a> Report<'a> {
    #[must_use]
    pub fn new(analysis: &'a Analysis) -> Self {
        Self { analysis }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_trim_line(f, &self.analysis.trimmed.cutoffs)?;
        for series in self.analysis.series() {
            writeln!(f, "{}", SeriesBlock(series))?;
        }
        if let Some(separation) = &self.analysis.separation {
            writeln!(f, "{}", SeparationBlock(separation))?;
        }
        Ok(())
    }
}

fn write_trim_line(f: &mut fmt::Formatter<'_>, cutoffs: &QuantileTrim) -> fmt::Result {
    writeln!(
        f,
        "Quantile trim: [{:.3}, {:.3}] -> keep cycles in [{:.3}, {:.3}]",
        cutoffs.q_lo, cutoffs.q_hi, cutoffs.lo, cutoffs.hi
    )
}

/// Descriptive block of one series, ending with a newline.
struct SeriesBlock<'a>(&'a SeriesAnalysis);

impl fmt::Display for SeriesBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.0.kind.label();
        match &self.0.summary {
            Some(summary) => write_summary(f, &name, summary),
            None => writeln!(f, "{name}: (no data)"),
        }
    }
}

fn write_summary(f: &mut fmt::Formatter<'_>, name: &str, stats: &StatsSummary) -> fmt::Result {
    let q = |p: f64| stats.quantile(p).unwrap_or(f64::NAN);

    writeln!(f, "{name}:")?;
    writeln!(f, "  count={}", stats.count)?;
    writeln!(f, "  mean={:.3}  std={:.3}", stats.mean, stats.std)?;
    writeln!(
        f,
        "  min={:.3}  p01={:.3}  p05={:.3}  p10={:.3}",
        stats.min(),
        q(1.0),
        q(5.0),
        q(10.0)
    )?;
    writeln!(
        f,
        "  p25={:.3}  p50={:.3}  p75={:.3}  IQR={:.3}",
        q(25.0),
        stats.median(),
        q(75.0),
        stats.iqr
    )?;
    writeln!(
        f,
        "  p90={:.3}  p95={:.3}  p99={:.3}  max={:.3}",
        q(90.0),
        q(95.0),
        q(99.0),
        stats.max()
    )?;
    writeln!(f, "  MAD*1.4826={:.3}", stats.mad_scaled)
}

struct SeparationBlock<'a>(&'a SeparationReport);

impl fmt::Display for SeparationBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Separation quick checks:")?;
        writeln!(
            f,
            "  median(thrash=1) - median(thrash=0) = {:.3} cycles",
            self.0.median_diff
        )?;
        writeln!(
            f,
            "  p10(thrash=1) - p90(thrash=0)       = {:.3} cycles  (positive => well separated)",
            self.0.tail_gap
        )
    }
}
