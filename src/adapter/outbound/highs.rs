//! HiGHS master solver via good_lp.
//!
//! good_lp exposes no incumbent callback, so lazy constraints are emulated by
//! re-solving: each round solves the current master to (gap-tolerant)
//! optimality, hands its selection to the handler if it is not yet anchored,
//! adds the returned cut and solves again. The loop ends when the master
//! optimum lands on an anchored support (its cut makes the master bound
//! tight there), when the best separated objective meets the bound, or when
//! the wall-clock budget runs out.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use good_lp::solvers::highs::highs;
use good_lp::{
    constraint, variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable,
};
use tracing::{debug, trace};

use crate::domain::{relative_gap, Constraint, ConstraintSense, SolverStatus, Support};
use crate::error::{Result, SolveError};
use crate::port::outbound::discrete::{
    DiscreteSolver, LazyConstraintHandler, MasterOutcome, MasterProblem, SolveLimits,
};

/// Result of one master solve.
enum Round {
    Solved { values: Vec<f64>, objective: f64 },
    Infeasible,
    OutOfTime,
}

/// HiGHS-based master solver.
#[derive(Debug, Default, Clone)]
pub struct HighsSolver;

impl HighsSolver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Best separated incumbent that satisfies the structural rows.
struct Best {
    objective: f64,
    values: Vec<f64>,
}

impl DiscreteSolver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve(
        &self,
        problem: &MasterProblem,
        handler: &dyn LazyConstraintHandler,
        limits: &SolveLimits,
    ) -> Result<MasterOutcome> {
        let start = Instant::now();
        let p = problem.selection_vars;
        let mut rows = problem.constraints.clone();

        let mut anchors: HashMap<Support, f64> = HashMap::new();
        let mut best: Option<Best> = None;
        for cut in &problem.seed_cuts {
            anchors.insert(cut.anchor().clone(), cut.value());
            let indicator = cut.anchor().to_indicator();
            if problem.admits(&indicator) {
                consider(&mut best, &indicator, cut.value(), problem.epigraph);
            }
        }

        let mut bound = problem
            .bounds
            .get(problem.epigraph)
            .and_then(|b| b.lower)
            .unwrap_or(f64::NEG_INFINITY);
        let mut iterations = 0u64;

        loop {
            let remaining = limits.time_limit.saturating_sub(start.elapsed());
            if remaining.is_zero() {
                return Ok(time_limit(best, bound, iterations));
            }

            iterations += 1;
            let (values, objective) = match solve_round(problem, &rows, remaining, limits)? {
                Round::Solved { values, objective } => (values, objective),
                Round::Infeasible => {
                    return Ok(MasterOutcome {
                        status: SolverStatus::Infeasible,
                        values: vec![],
                        best_bound: bound,
                        best_objective: f64::INFINITY,
                        iterations,
                    });
                }
                Round::OutOfTime => return Ok(time_limit(best, bound, iterations)),
            };

            // With a relative MIP gap the returned objective may exceed the
            // master optimum by at most that fraction.
            bound = bound.max(objective - limits.gap_tolerance * objective.abs());

            let support = Support::from_relaxed(&values[..p]);
            trace!(round = iterations, support = ?support.indices(), objective, bound, "Master solved");

            if let Some(&value) = anchors.get(&support) {
                // The anchored cut is tight here, so the master optimum is
                // already achieved by a separated support.
                consider(&mut best, &support.to_indicator(), value, problem.epigraph);
                let (best_values, best_objective) = match best {
                    Some(b) => (b.values, b.objective),
                    None => (values, value),
                };
                debug!(rounds = iterations, cuts = rows.len(), "Master converged on an anchored support");
                return Ok(MasterOutcome {
                    status: SolverStatus::Optimal,
                    values: best_values,
                    best_bound: bound.min(best_objective),
                    best_objective,
                    iterations,
                });
            }

            let cut = handler.on_incumbent(&values)?;
            anchors.insert(cut.anchor().clone(), cut.value());
            let indicator = cut.anchor().to_indicator();
            if problem.admits(&indicator) {
                consider(&mut best, &indicator, cut.value(), problem.epigraph);
            }
            rows.push(cut.to_constraint());

            if let Some(b) = &best {
                let closed = relative_gap(b.objective, bound).is_some_and(|g| g <= limits.gap_tolerance);
                if closed {
                    debug!(rounds = iterations, cuts = rows.len(), "Optimality gap closed");
                    return Ok(MasterOutcome {
                        status: SolverStatus::Optimal,
                        values: b.values.clone(),
                        best_bound: bound.min(b.objective),
                        best_objective: b.objective,
                        iterations,
                    });
                }
            }
        }
    }
}

fn consider(best: &mut Option<Best>, indicator: &[f64], objective: f64, epigraph: usize) {
    if best.as_ref().is_some_and(|b| b.objective <= objective) {
        return;
    }
    let mut values = indicator.to_vec();
    values.resize(epigraph, 0.0);
    values.push(objective);
    *best = Some(Best { objective, values });
}

fn time_limit(best: Option<Best>, bound: f64, iterations: u64) -> MasterOutcome {
    let (values, best_objective) = best.map_or((vec![], f64::INFINITY), |b| (b.values, b.objective));
    MasterOutcome {
        status: SolverStatus::TimeLimit,
        values,
        best_bound: bound,
        best_objective,
        iterations,
    }
}

fn linear(vars: &[Variable], coefficients: &[f64]) -> Expression {
    vars.iter()
        .zip(coefficients)
        .map(|(v, c)| *c * *v)
        .sum()
}

/// Solve the master with the current rows.
fn solve_round(
    problem: &MasterProblem,
    rows: &[Constraint],
    remaining: Duration,
    limits: &SolveLimits,
) -> Result<Round> {
    let integer = problem.integer_vars();
    let mut vars = variables!();
    let mut var_list = Vec::with_capacity(problem.num_vars());

    for (i, bounds) in problem.bounds.iter().enumerate() {
        let mut v = variable();
        if let Some(lb) = bounds.lower {
            v = v.min(lb);
        }
        if let Some(ub) = bounds.upper {
            v = v.max(ub);
        }
        if integer.contains(&i) {
            v = v.integer();
        }
        var_list.push(vars.add(v));
    }

    let objective = linear(&var_list, &problem.objective());
    let mut model = vars
        .minimise(&objective)
        .using(highs)
        .set_option("time_limit", remaining.as_secs_f64())
        .set_option("mip_rel_gap", limits.gap_tolerance);
    if limits.threads > 0 {
        let threads = i32::try_from(limits.threads).unwrap_or(i32::MAX);
        model = model.set_option("threads", threads);
    }

    for row in rows {
        let lhs = linear(&var_list, &row.coefficients);
        let rhs = row.rhs;
        model = match row.sense {
            ConstraintSense::GreaterEqual => model.with(constraint!(lhs >= rhs)),
            ConstraintSense::LessEqual => model.with(constraint!(lhs <= rhs)),
            ConstraintSense::Equal => model.with(constraint!(lhs == rhs)),
        };
    }

    let round_start = Instant::now();
    match model.solve() {
        Ok(solution) => {
            // HiGHS may stop on its own time limit and still hand back a
            // feasible but unproven point.
            if round_start.elapsed() >= remaining {
                return Ok(Round::OutOfTime);
            }
            let values: Vec<f64> = var_list.iter().map(|v| solution.value(*v)).collect();
            let objective = values[problem.epigraph];
            Ok(Round::Solved { values, objective })
        }
        Err(ResolutionError::Infeasible) => Ok(Round::Infeasible),
        Err(_) if round_start.elapsed() >= remaining => Ok(Round::OutOfTime),
        Err(e) => Err(SolveError::Backend(format!("HiGHS failed: {e}")).into()),
    }
}
