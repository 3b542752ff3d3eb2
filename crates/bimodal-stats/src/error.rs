/// Errors raised by the statistical core.
///
/// Only genuine parameter violations are errors. Empty inputs that have a
/// well-defined "not applicable" answer (describing an empty series, estimating
/// a density from no samples, separating against an empty group) return `None`
/// or an all-zero result instead.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    /// Trim cutoffs do not satisfy `0 <= q_lo < q_hi <= 1` after clamping.
    #[display("invalid quantile range: q_lo={q_lo}, q_hi={q_hi} (q_hi must be > q_lo)")]
    InvalidRange { q_lo: f64, q_hi: f64 },
    /// An operation that needs data received an empty series.
    #[display("{operation} requires a non-empty series")]
    EmptySeries { operation: &'static str },
    /// Every value fell outside the trim cutoffs `[lo, hi]`.
    #[display(
        "trimming to [{lo}, {hi}] (q_lo={q_lo}, q_hi={q_hi}) removed every measurement"
    )]
    NothingRetained {
        q_lo: f64,
        q_hi: f64,
        lo: f64,
        hi: f64,
    },
    /// A bandwidth that is not a positive finite number was supplied explicitly.
    #[display("invalid KDE bandwidth {bandwidth} (must be positive and finite)")]
    InvalidBandwidth { bandwidth: f64 },
}
