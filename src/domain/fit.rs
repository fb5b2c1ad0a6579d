//! Solve results and termination status.

use std::time::Duration;

use serde::Serialize;

/// Below this magnitude the incumbent objective is treated as zero when
/// computing the relative gap.
pub const GAP_ZERO_TOL: f64 = 1e-12;

/// Termination status of the discrete search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    /// The search has not returned yet.
    #[default]
    Unsolved,
    /// Optimal within the configured gap tolerance.
    Optimal,
    /// The wall-clock budget ran out; the incumbent is valid but may be
    /// suboptimal.
    TimeLimit,
    /// The master problem has no feasible point.
    Infeasible,
    /// The backend failed.
    Error,
}

impl SolverStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unsolved => "unsolved",
            Self::Optimal => "optimal",
            Self::TimeLimit => "time_limit",
            Self::Infeasible => "infeasible",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative optimality gap `1 - bound / best`, clamped to `[0, 1]`.
///
/// When `|best|` is numerically zero the ratio is meaningless: the gap is
/// reported as zero if the bound already meets the incumbent and as undefined
/// (`None`) otherwise.
#[must_use]
pub fn relative_gap(best: f64, bound: f64) -> Option<f64> {
    if !best.is_finite() || bound.is_nan() {
        return None;
    }
    if best.abs() <= GAP_ZERO_TOL {
        return (bound >= best - GAP_ZERO_TOL).then_some(0.0);
    }
    Some((1.0 - bound / best).clamp(0.0, 1.0))
}

/// Result of a cardinality-constrained fit.
#[derive(Debug, Clone, Serialize)]
pub struct SparseFit {
    /// Selected feature indices, increasing.
    pub selected: Vec<usize>,
    /// Refitted coefficients, one per entry of `selected`.
    pub weights: Vec<f64>,
    /// Wall-clock time spent in the discrete search.
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub status: SolverStatus,
    /// Relative gap at termination; `None` when undefined.
    pub gap: Option<f64>,
    /// Oracle evaluations, including the seed.
    pub cut_count: u64,
    /// Training objective at the returned support.
    pub objective: f64,
    /// Best lower bound proven by the search.
    pub bound: f64,
}

impl SparseFit {
    /// Dense coefficient vector of length `p`.
    #[must_use]
    pub fn dense_weights(&self, p: usize) -> Vec<f64> {
        let mut w = vec![0.0; p];
        for (&j, &v) in self.selected.iter().zip(&self.weights) {
            w[j] = v;
        }
        w
    }
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}
