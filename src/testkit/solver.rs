//! Brute-force master solver.

use std::collections::HashMap;
use std::thread;
use std::time::Instant;

use crate::domain::{SolverStatus, Support};
use crate::error::{Result, SolveError};
use crate::port::outbound::discrete::{
    DiscreteSolver, LazyConstraintHandler, MasterOutcome, MasterProblem, SolveLimits,
};

/// Largest selection width the enumeration accepts.
pub const MAX_FEATURES: usize = 20;

/// Enumerates every support admitted by the structural rows and separates
/// each one that is not already anchored by a seed cut.
///
/// Candidates are dealt round-robin to worker threads, so the handler is
/// called concurrently. Since every admitted support is evaluated, the best
/// separated value is also the bound. Ties go to the support enumerated
/// first (smaller bitmask).
#[derive(Debug, Clone)]
pub struct ExhaustiveSolver {
    threads: usize,
}

impl ExhaustiveSolver {
    /// `threads` is used when the solve limits leave the thread count at 0.
    #[must_use]
    pub fn new(threads: usize) -> Self {
        Self {
            threads: threads.max(1),
        }
    }
}

impl Default for ExhaustiveSolver {
    fn default() -> Self {
        Self::new(1)
    }
}

impl DiscreteSolver for ExhaustiveSolver {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn solve(
        &self,
        problem: &MasterProblem,
        handler: &dyn LazyConstraintHandler,
        limits: &SolveLimits,
    ) -> Result<MasterOutcome> {
        let start = Instant::now();
        let p = problem.selection_vars;
        if p > MAX_FEATURES {
            return Err(SolveError::Backend(format!(
                "exhaustive search over {p} features is too large"
            ))
            .into());
        }

        let seeded: HashMap<&Support, f64> = problem
            .seed_cuts
            .iter()
            .map(|cut| (cut.anchor(), cut.value()))
            .collect();

        let admitted: Vec<Support> = (0..1usize << p)
            .map(|mask| support_of(p, mask))
            .filter(|s| problem.admits(&s.to_indicator()))
            .collect();
        if admitted.is_empty() {
            return Ok(MasterOutcome {
                status: SolverStatus::Infeasible,
                values: vec![],
                best_bound: f64::INFINITY,
                best_objective: f64::INFINITY,
                iterations: 0,
            });
        }

        let pending: Vec<(usize, &Support)> = admitted
            .iter()
            .enumerate()
            .filter(|(_, s)| !seeded.contains_key(s))
            .collect();

        let threads = if limits.threads > 0 { limits.threads } else { self.threads };
        let results: Vec<Result<(Vec<(usize, f64)>, bool)>> = thread::scope(|scope| {
            let workers: Vec<_> = (0..threads)
                .map(|worker| {
                    let pending = &pending;
                    scope.spawn(move || -> Result<(Vec<(usize, f64)>, bool)> {
                        let mut found = Vec::new();
                        for (order, support) in pending.iter().skip(worker).step_by(threads) {
                            if start.elapsed() >= limits.time_limit {
                                return Ok((found, true));
                            }
                            let mut values = support.to_indicator();
                            values.resize(problem.epigraph, 0.0);
                            values.push(0.0);
                            let cut = handler.on_incumbent(&values)?;
                            found.push((*order, cut.value()));
                        }
                        Ok((found, false))
                    })
                })
                .collect();

            workers
                .into_iter()
                .map(|w| {
                    w.join().unwrap_or_else(|_| {
                        Err(SolveError::Backend("worker thread panicked".into()).into())
                    })
                })
                .collect()
        });

        let mut values: Vec<(usize, f64)> = admitted
            .iter()
            .enumerate()
            .filter_map(|(order, s)| seeded.get(s).map(|v| (order, *v)))
            .collect();
        let mut timed_out = false;
        for result in results {
            let (found, stopped) = result?;
            values.extend(found);
            timed_out |= stopped;
        }

        let best = values
            .iter()
            .copied()
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let iterations = values.len() as u64;
        let Some((order, objective)) = best else {
            return Ok(MasterOutcome {
                status: SolverStatus::TimeLimit,
                values: vec![],
                best_bound: f64::NEG_INFINITY,
                best_objective: f64::INFINITY,
                iterations,
            });
        };

        let mut solution = admitted[order].to_indicator();
        solution.resize(problem.epigraph, 0.0);
        solution.push(objective);

        Ok(if timed_out {
            MasterOutcome {
                status: SolverStatus::TimeLimit,
                values: solution,
                best_bound: problem.bounds[problem.epigraph].lower.unwrap_or(f64::NEG_INFINITY),
                best_objective: objective,
                iterations,
            }
        } else {
            MasterOutcome {
                status: SolverStatus::Optimal,
                values: solution,
                best_bound: objective,
                best_objective: objective,
                iterations,
            }
        })
    }
}

fn support_of(p: usize, mask: usize) -> Support {
    let indices: Vec<usize> = (0..p).filter(|j| mask & (1 << j) != 0).collect();
    Support::from_indices(p, &indices).unwrap_or_else(|_| Support::empty(p))
}
