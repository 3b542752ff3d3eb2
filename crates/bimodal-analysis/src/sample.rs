//! Measurement samples and their trimmed derivations
//!
//! A [`Sample`] is the full table of measurements of one benchmark run, in the
//! order they were recorded. Samples are never modified: trimming produces a
//! new [`TrimmedSample`] that remembers the cutoffs it was derived with.
//!
//! # Examples
//!
//! ```
//! use bimodal_analysis::sample::{Condition, Measurement, Sample};
//!
//! let sample = Sample::new(vec![
//!     Measurement { index: 0, group: 0, cycles: 100.0 },
//!     Measurement { index: 1, group: 1, cycles: 500.0 },
//!     Measurement { index: 2, group: 0, cycles: 90000.0 },
//! ]);
//!
//! let trimmed = sample.trim(0.0, 0.5).unwrap();
//! assert_eq!(trimmed.sample.cycles(), vec![100.0, 500.0]);
//! assert_eq!(trimmed.removed, 1);
//! assert_eq!(trimmed.sample.condition_cycles(Condition::Thrash), vec![500.0]);
//! ```

use std::fmt;

use bimodal_stats::{error::StatsError, trim::QuantileTrim};
use serde::{Deserialize, Serialize};

/// One row of the benchmark output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Sequence index of the measurement (`i` column).
    pub index: i64,
    /// Experimental condition label (`thrash` column); 0 or 1 in well-formed data.
    pub group: i64,
    /// Measured cycle count (`cycles` column).
    pub cycles: f64,
}

/// The two experimental conditions compared by the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    /// `thrash=0`: the code path runs with warm caches.
    Baseline,
    /// `thrash=1`: the front end was thrashed before each measurement.
    Thrash,
}

impl Condition {
    pub const ALL: [Self; 2] = [Self::Baseline, Self::Thrash];

    #[must_use]
    pub fn label(self) -> i64 {
        match self {
            Self::Baseline => 0,
            Self::Thrash => 1,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "thrash={}", self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    measurements: Vec<Measurement>,
}

impl Sample {
    #[must_use]
    pub fn new(measurements: Vec<Measurement>) -> Self {
        Self { measurements }
    }

    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// All cycle counts, regardless of condition.
    #[must_use]
    pub fn cycles(&self) -> Vec<f64> {
        self.measurements.iter().map(|m| m.cycles).collect()
    }

    /// Cycle counts measured under `condition`, in recording order.
    #[must_use]
    pub fn condition_cycles(&self, condition: Condition) -> Vec<f64> {
        let label = condition.label();
        self.measurements
            .iter()
            .filter(|m| m.group == label)
            .map(|m| m.cycles)
            .collect()
    }

    /// Number of rows whose label is neither 0 nor 1.
    #[must_use]
    pub fn unlabeled_count(&self) -> usize {
        self.measurements
            .iter()
            .filter(|m| !Condition::ALL.iter().any(|c| c.label() == m.group))
            .count()
    }

    /// Keeps only the measurements for which `predicate` holds, preserving order.
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Measurement) -> bool,
    {
        Self {
            measurements: self
                .measurements
                .iter()
                .filter(|m| predicate(m))
                .copied()
                .collect(),
        }
    }

    /// Trims the sample to the cycle counts between the `q_lo` and `q_hi`
    /// quantiles of the whole (ungrouped) sample, bounds included.
    ///
    /// # Errors
    ///
    /// Fails if the cutoffs are invalid or the sample is empty; see
    /// [`QuantileTrim::compute`].
    pub fn trim(&self, q_lo: f64, q_hi: f64) -> Result<TrimmedSample, StatsError> {
        let cutoffs = QuantileTrim::compute(&self.cycles(), q_lo, q_hi)?;
        let sample = self.filter(|m| cutoffs.contains(m.cycles));
        let removed = self.len() - sample.len();
        Ok(TrimmedSample {
            sample,
            cutoffs,
            removed,
        })
    }
}

/// A sample restricted to `[cutoffs.lo, cutoffs.hi]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimmedSample {
    pub sample: Sample,
    /// Cutoffs computed on the untrimmed sample.
    pub cutoffs: QuantileTrim,
    /// Number of measurements dropped by the trim.
    pub removed: usize,
}
