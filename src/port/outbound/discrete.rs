//! Discrete (mixed-integer) master solver port.
//!
//! The outer-approximation master is a MILP over binary selection variables
//! and one continuous epigraph column. The solver explores it by
//! branch-and-bound and, at every new integer-feasible incumbent, hands the
//! incumbent to a [`LazyConstraintHandler`] which answers with a cut to add
//! as a permanent global row.
//!
//! # Overview
//!
//! - [`DiscreteSolver`]: master solver interface
//! - [`LazyConstraintHandler`]: callback fired at discrete incumbents
//! - [`MasterProblem`]: model definition
//! - [`SolveLimits`]: time, gap and thread configuration
//! - [`MasterOutcome`]: final solver state

use std::time::Duration;

use crate::domain::{Constraint, Cut, SolverStatus, VariableBounds};
use crate::error::Result;

/// Mixed-integer solver with lazy constraint support.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (`Send + Sync`). A backend that
/// explores nodes in parallel may call the handler from several worker
/// threads at once.
pub trait DiscreteSolver: Send + Sync {
    /// Return the solver name for logging and configuration.
    fn name(&self) -> &'static str;

    /// Minimize the master problem, calling `handler` at each new incumbent.
    ///
    /// Running out of time is not an error: the solver returns its best
    /// incumbent with [`SolverStatus::TimeLimit`].
    ///
    /// # Errors
    ///
    /// Propagates handler errors unchanged and aborts the search. Backend
    /// failures may be reported either as an error or as
    /// [`SolverStatus::Error`].
    fn solve(
        &self,
        problem: &MasterProblem,
        handler: &dyn LazyConstraintHandler,
        limits: &SolveLimits,
    ) -> Result<MasterOutcome>;
}

/// Callback invoked by a [`DiscreteSolver`] at each discrete incumbent.
///
/// The search branch that found the incumbent is suspended until the handler
/// returns. The returned cut must be added globally, not only to the current
/// branch.
pub trait LazyConstraintHandler: Send + Sync {
    /// Separate the incumbent.
    ///
    /// `candidate` holds the current values of all master columns; the
    /// handler copies what it needs and never keeps the slice.
    ///
    /// # Errors
    ///
    /// Any error aborts the whole solve.
    fn on_incumbent(&self, candidate: &[f64]) -> Result<Cut>;
}

/// Outer-approximation master problem.
///
/// Columns `0..selection_vars` are binary selection indicators; column
/// `epigraph` is the continuous objective column `t`. The objective is
/// `minimize t`.
#[derive(Debug, Clone)]
pub struct MasterProblem {
    /// Number of binary selection columns (p).
    pub selection_vars: usize,

    /// Index of the epigraph column.
    pub epigraph: usize,

    /// Static rows (cardinality, seed cuts).
    pub constraints: Vec<Constraint>,

    /// Bounds for every column.
    pub bounds: Vec<VariableBounds>,

    /// Optional starting point over all columns.
    ///
    /// Advisory only. `HighsSolver` does not forward it, since good_lp
    /// implements `WithInitialSolution` for CBC, SCIP and lp_solvers but not
    /// for HiGHS; the seed cut in `constraints` is what anchors the search.
    pub warm_start: Option<Vec<f64>>,

    /// Cuts already present in `constraints`, so a backend knows which
    /// incumbents are anchored and their objective values.
    pub seed_cuts: Vec<Cut>,
}

impl MasterProblem {
    /// Return the number of columns.
    #[must_use]
    pub fn num_vars(&self) -> usize {
        self.bounds.len()
    }

    /// Indices of integer columns.
    #[must_use]
    pub fn integer_vars(&self) -> Vec<usize> {
        (0..self.selection_vars).collect()
    }

    /// Objective coefficients (`minimize t`).
    #[must_use]
    pub fn objective(&self) -> Vec<f64> {
        let mut c = vec![0.0; self.num_vars()];
        c[self.epigraph] = 1.0;
        c
    }

    /// Whether the selection `s` satisfies every row that does not involve
    /// the epigraph column (the structural rows, as opposed to cuts).
    #[must_use]
    pub fn admits(&self, s: &[f64]) -> bool {
        let mut point = s.to_vec();
        point.resize(self.num_vars(), 0.0);
        self.constraints
            .iter()
            .filter(|row| row.coefficients.get(self.epigraph).copied().unwrap_or(0.0) == 0.0)
            .all(|row| row.is_satisfied(&point, 1e-9))
    }
}

/// Resource limits for one master solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveLimits {
    /// Wall-clock budget.
    pub time_limit: Duration,

    /// Relative optimality gap at which the search may stop.
    pub gap_tolerance: f64,

    /// Worker threads; 0 leaves the backend default.
    pub threads: usize,
}

impl Default for SolveLimits {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(60),
            gap_tolerance: 0.0,
            threads: 0,
        }
    }
}

/// Final solver state.
#[derive(Debug, Clone)]
pub struct MasterOutcome {
    /// Termination status.
    pub status: SolverStatus,

    /// Column values of the solver's own final solution (empty when none).
    pub values: Vec<f64>,

    /// Best proven lower bound on the objective.
    pub best_bound: f64,

    /// Objective of the solver's best incumbent.
    pub best_objective: f64,

    /// Master solves or nodes processed, for logging.
    pub iterations: u64,
}
