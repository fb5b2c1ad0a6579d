//! Outer-approximation driver.
//!
//! Solves
//!
//! ```text
//! min_{s in {0,1}^p, sum(s) <= k}  c(s)
//! ```
//!
//! where `c(s)` is the regularized training loss over weights restricted to
//! the support `s`. The master problem replaces `c` by an epigraph column `t`
//! bounded below by cuts `t >= c(s0) + <∇c(s0), s - s0>`. Because `c` is
//! convex in the relaxed indicator, each cut is a global under-estimator, and
//! the master's optimum is a lower bound on the true optimum. The discrete
//! solver adds a cut at every incumbent it visits until the bound meets the
//! best incumbent or the wall-clock budget is spent.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::incumbent::IncumbentTracker;
use super::separation::LazySeparation;
use super::warm_start::WarmStart;
use crate::domain::{
    relative_gap, Constraint, Cut, Dataset, Loss, SolverStatus, SparseFit, Support,
    VariableBounds,
};
use crate::error::{Result, SolveError};
use crate::port::outbound::discrete::{DiscreteSolver, MasterOutcome, MasterProblem, SolveLimits};
use crate::port::outbound::oracle::ConvexOracle;
use crate::port::outbound::recovery::PrimalRecovery;

/// Per-call options.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOptions {
    /// Feature indices to seed the search with. When absent, `warm_start`
    /// picks one.
    pub initial_support: Option<Vec<usize>>,

    /// Wall-clock budget for the discrete search.
    pub time_limit: Duration,

    /// Relative optimality gap at which the search may stop.
    pub gap_tolerance: f64,

    /// Worker threads for the discrete solver; 0 leaves the backend default.
    pub threads: usize,

    /// Seed for the random warm start.
    pub seed: Option<u64>,

    /// Strategy used when `initial_support` is absent.
    pub warm_start: WarmStart,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            initial_support: None,
            time_limit: Duration::from_secs(60),
            gap_tolerance: 0.0,
            threads: 0,
            seed: None,
            warm_start: WarmStart::default(),
        }
    }
}

impl SolveOptions {
    /// Set time limit in seconds. Infinite or oversized values mean no
    /// limit; negative values and NaN mean zero.
    #[must_use]
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = if seconds.is_nan() || seconds <= 0.0 {
            Duration::ZERO
        } else {
            Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
        };
        self
    }

    /// Set optimality gap tolerance.
    #[must_use]
    pub fn with_gap_tolerance(mut self, tol: f64) -> Self {
        self.gap_tolerance = tol;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_initial_support(mut self, indices: Vec<usize>) -> Self {
        self.initial_support = Some(indices);
        self
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub fn with_warm_start(mut self, warm_start: WarmStart) -> Self {
        self.warm_start = warm_start;
        self
    }
}

/// Outer-approximation solver for cardinality-constrained regression.
///
/// Wires a discrete master solver, a convex oracle and a refit step together.
/// The driver itself holds no per-solve state, so one instance can serve
/// concurrent [`solve`](Self::solve) calls.
#[derive(Clone)]
pub struct OuterApproximation {
    solver: Arc<dyn DiscreteSolver>,
    oracle: Arc<dyn ConvexOracle>,
    recovery: Arc<dyn PrimalRecovery>,
}

impl OuterApproximation {
    #[must_use]
    pub fn new(
        solver: Arc<dyn DiscreteSolver>,
        oracle: Arc<dyn ConvexOracle>,
        recovery: Arc<dyn PrimalRecovery>,
    ) -> Self {
        Self {
            solver,
            oracle,
            recovery,
        }
    }

    /// Select at most `k` features and fit their coefficients.
    ///
    /// # Errors
    ///
    /// - [`SolveError::InvalidParameter`] for a malformed `k`, `gamma`,
    ///   tolerance, initial support or targets; raised before any oracle or
    ///   solver call.
    /// - [`SolveError::OracleFailure`] if any oracle evaluation fails.
    /// - [`SolveError::SolverInfeasible`] if the master is infeasible.
    /// - [`SolveError::Backend`] if the discrete solver fails.
    ///
    /// Hitting the time limit is not an error.
    pub fn solve(
        &self,
        loss: Loss,
        data: &Dataset,
        k: usize,
        gamma: f64,
        options: &SolveOptions,
    ) -> Result<SparseFit> {
        validate(loss, data, k, gamma, options)?;
        let p = data.n_features();

        info!(
            loss = %loss,
            samples = data.n_samples(),
            features = p,
            k,
            gamma,
            solver = self.solver.name(),
            oracle = self.oracle.name(),
            "Starting outer approximation"
        );

        let initial = match &options.initial_support {
            Some(indices) => Support::from_indices(p, indices)?,
            None => options.warm_start.initial_support(data, k, options.seed),
        };

        let tracker = IncumbentTracker::new();
        let handler = LazySeparation::new(self.oracle.as_ref(), loss, data, gamma, &tracker);

        // The seed evaluation is the first cut.
        tracker.record_cut();
        let seed_cut = handler.cut_at(initial)?;
        if seed_cut.anchor().len() <= k {
            tracker.observe(seed_cut.anchor(), seed_cut.value());
        } else {
            debug!(
                size = seed_cut.anchor().len(),
                k, "Initial support exceeds budget; used as a cut only"
            );
        }

        let master = build_master(p, k, &seed_cut);
        let limits = SolveLimits {
            time_limit: options.time_limit,
            gap_tolerance: options.gap_tolerance,
            threads: options.threads,
        };

        let start = Instant::now();
        let outcome = self.solver.solve(&master, &handler, &limits)?;
        let elapsed = start.elapsed();

        let (support, objective) = self.select_support(&outcome, &tracker, loss, data, gamma)?;
        let gap = match outcome.status {
            SolverStatus::Optimal => relative_gap(outcome.best_objective.min(objective), outcome.best_bound)
                .or(Some(0.0)),
            _ => relative_gap(solver_objective(&outcome, objective), outcome.best_bound),
        };

        let selected = support.indices().to_vec();
        let weights = self
            .recovery
            .refit(loss, data.y(), &data.restrict(&selected), gamma)?;
        if weights.len() != selected.len() {
            return Err(SolveError::Backend(format!(
                "refit returned {} weights for {} features",
                weights.len(),
                selected.len()
            ))
            .into());
        }

        let fit = SparseFit {
            selected,
            weights,
            elapsed,
            status: outcome.status,
            gap,
            cut_count: tracker.cut_count(),
            objective,
            bound: outcome.best_bound,
        };

        info!(
            status = %fit.status,
            selected = ?fit.selected,
            objective = fit.objective,
            bound = fit.bound,
            gap = ?fit.gap,
            cuts = fit.cut_count,
            improvements = tracker.improvements(),
            iterations = outcome.iterations,
            elapsed_ms = elapsed.as_millis() as u64,
            "Outer approximation finished"
        );

        Ok(fit)
    }

    /// Choose the final support from the solver state and the tracker.
    fn select_support(
        &self,
        outcome: &MasterOutcome,
        tracker: &IncumbentTracker,
        loss: Loss,
        data: &Dataset,
        gamma: f64,
    ) -> Result<(Support, f64)> {
        let p = data.n_features();
        match outcome.status {
            SolverStatus::Optimal if outcome.values.len() >= p => {
                let support = Support::from_relaxed(&outcome.values[..p]);
                let objective = match tracker.snapshot() {
                    Some(best) if best.support == support => best.objective,
                    _ => outcome.best_objective,
                };
                Ok((support, objective))
            }
            SolverStatus::Optimal | SolverStatus::TimeLimit => {
                if outcome.status == SolverStatus::TimeLimit {
                    warn!(
                        bound = outcome.best_bound,
                        best = tracker.best_objective(),
                        "Time limit reached; returning best incumbent"
                    );
                }
                match tracker.snapshot() {
                    Some(best) => Ok((best.support, best.objective)),
                    None => {
                        // Only reachable when the seed exceeded k and no
                        // incumbent was separated in time.
                        let empty = Support::empty(p);
                        let eval = self.oracle.evaluate(loss, data, &empty, gamma)?;
                        Ok((empty, eval.value))
                    }
                }
            }
            SolverStatus::Infeasible => Err(SolveError::SolverInfeasible.into()),
            SolverStatus::Error | SolverStatus::Unsolved => Err(SolveError::Backend(format!(
                "{} returned status {}",
                self.solver.name(),
                outcome.status
            ))
            .into()),
        }
    }
}

fn solver_objective(outcome: &MasterOutcome, fallback: f64) -> f64 {
    if outcome.best_objective.is_finite() {
        outcome.best_objective
    } else {
        fallback
    }
}

fn validate(loss: Loss, data: &Dataset, k: usize, gamma: f64, options: &SolveOptions) -> Result<()> {
    let p = data.n_features();
    if k > p {
        return Err(SolveError::invalid("k", format!("must be in [0, {p}], got {k}")).into());
    }
    if !(gamma.is_finite() && gamma > 0.0) {
        return Err(SolveError::invalid("gamma", format!("must be finite and > 0, got {gamma}")).into());
    }
    if !(options.gap_tolerance.is_finite() && (0.0..=1.0).contains(&options.gap_tolerance)) {
        return Err(SolveError::invalid(
            "gap_tolerance",
            format!("must be in [0, 1], got {}", options.gap_tolerance),
        )
        .into());
    }
    if let Some(indices) = &options.initial_support {
        Support::from_indices(p, indices)?;
    }
    loss.validate_targets(data.y().iter())?;
    Ok(())
}

/// Master over columns `[s_0, .., s_{p-1}, t]`: minimize `t` subject to
/// `sum(s) <= k` and the seed cut.
fn build_master(p: usize, k: usize, seed_cut: &Cut) -> MasterProblem {
    let mut cardinality = vec![1.0; p];
    cardinality.push(0.0);

    let mut bounds = vec![VariableBounds::binary(); p];
    bounds.push(VariableBounds::non_negative());

    let mut warm_start = seed_cut.anchor().to_indicator();
    warm_start.push(seed_cut.value());

    MasterProblem {
        selection_vars: p,
        epigraph: p,
        constraints: vec![
            Constraint::leq(cardinality, k as f64),
            seed_cut.to_constraint(),
        ],
        bounds,
        warm_start: Some(warm_start),
        seed_cuts: vec![seed_cut.clone()],
    }
}
