//! Lazy separation of discrete incumbents.
//!
//! The discrete solver suspends the branch that found an incumbent, calls
//! [`LazySeparation::on_incumbent`], and resumes with the returned cut added
//! as a global row:
//!
//! ```text
//! search ── incumbent ŝ ──▶ separation ── oracle(ŝ) ──▶ (c, ∇c)
//!   ▲                            │
//!   └──── t >= c + <∇c, s - ŝ> ◀─┘
//! ```

use tracing::{debug, error};

use super::incumbent::IncumbentTracker;
use crate::domain::{Cut, Dataset, Loss, Support};
use crate::error::{Result, SolveError};
use crate::port::outbound::discrete::LazyConstraintHandler;
use crate::port::outbound::oracle::ConvexOracle;

/// Separation handler registered with the discrete solver for one solve.
///
/// Holds only shared references; all mutable state lives in the
/// [`IncumbentTracker`], which serializes updates. The handler is therefore
/// reentrant and may be called from several search threads at once.
pub struct LazySeparation<'a> {
    oracle: &'a dyn ConvexOracle,
    loss: Loss,
    data: &'a Dataset,
    gamma: f64,
    tracker: &'a IncumbentTracker,
}

impl<'a> LazySeparation<'a> {
    #[must_use]
    pub fn new(
        oracle: &'a dyn ConvexOracle,
        loss: Loss,
        data: &'a Dataset,
        gamma: f64,
        tracker: &'a IncumbentTracker,
    ) -> Self {
        Self {
            oracle,
            loss,
            data,
            gamma,
            tracker,
        }
    }

    /// Evaluate the oracle at `support` and build the cut anchored there.
    ///
    /// # Errors
    ///
    /// Propagates oracle failures and rejects gradients of the wrong length.
    pub fn cut_at(&self, support: Support) -> Result<Cut> {
        let p = self.data.n_features();
        let eval = self
            .oracle
            .evaluate(self.loss, self.data, &support, self.gamma)
            .map_err(|e| {
                error!(
                    oracle = self.oracle.name(),
                    support = ?support.indices(),
                    error = %e,
                    "Oracle evaluation failed"
                );
                e
            })?;

        if eval.gradient.len() != p {
            return Err(SolveError::oracle(format!(
                "gradient has {} entries, expected {p}",
                eval.gradient.len()
            ))
            .into());
        }
        if !eval.value.is_finite() {
            return Err(SolveError::oracle(format!("non-finite objective {}", eval.value)).into());
        }

        Ok(Cut::new(support, eval.value, eval.gradient))
    }
}

impl LazyConstraintHandler for LazySeparation<'_> {
    fn on_incumbent(&self, candidate: &[f64]) -> Result<Cut> {
        let p = self.data.n_features();
        let cut_number = self.tracker.record_cut();

        if candidate.len() < p {
            return Err(SolveError::Backend(format!(
                "incumbent has {} columns, expected at least {p}",
                candidate.len()
            ))
            .into());
        }

        // Owned snapshot; the solver may overwrite `candidate` once we return.
        let support = Support::from_relaxed(&candidate[..p]);
        let cut = self.cut_at(support)?;
        let improved = self.tracker.observe(cut.anchor(), cut.value());

        debug!(
            cut = cut_number,
            support = ?cut.anchor().indices(),
            value = cut.value(),
            improved,
            "Separated incumbent"
        );

        Ok(cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::outbound::oracle::OracleEvaluation;

    /// c(s) = sum_j w_j / (1 + s_j): convex and separable.
    struct Separable(Vec<f64>);

    impl ConvexOracle for Separable {
        fn name(&self) -> &'static str {
            "separable"
        }

        fn evaluate(
            &self,
            _loss: Loss,
            _data: &Dataset,
            support: &Support,
            _gamma: f64,
        ) -> Result<OracleEvaluation> {
            let s = support.to_indicator();
            let value = self.0.iter().zip(&s).map(|(w, v)| w / (1.0 + v)).sum();
            let gradient = self
                .0
                .iter()
                .zip(&s)
                .map(|(w, v)| -w / ((1.0 + v) * (1.0 + v)))
                .collect();
            Ok(OracleEvaluation { value, gradient })
        }
    }

    struct Broken;

    impl ConvexOracle for Broken {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn evaluate(&self, _: Loss, _: &Dataset, _: &Support, _: f64) -> Result<OracleEvaluation> {
            Err(SolveError::oracle("diverged").into())
        }
    }

    fn data(p: usize) -> Dataset {
        Dataset::from_rows(&[vec![1.0; p]], vec![1.0]).unwrap()
    }

    #[test]
    fn separation_counts_observes_and_cuts() {
        let oracle = Separable(vec![4.0, 2.0, 1.0]);
        let data = data(3);
        let tracker = IncumbentTracker::seeded(Support::empty(3), 7.0);
        let handler = LazySeparation::new(&oracle, Loss::LeastSquares, &data, 1.0, &tracker);

        // Epigraph column appended after the selection columns.
        let cut = handler.on_incumbent(&[0.99, 0.0, 1e-9, 0.25]).unwrap();

        assert_eq!(cut.anchor().indices(), &[0]);
        assert!((cut.value() - 5.0).abs() < 1e-12);
        assert_eq!(tracker.cut_count(), 2);
        assert_eq!(tracker.best_objective(), 5.0);
    }

    #[test]
    fn cuts_never_overestimate_a_convex_oracle() {
        let oracle = Separable(vec![3.0, 0.5, 2.0, 1.5]);
        let data = data(4);
        let tracker = IncumbentTracker::new();
        let handler = LazySeparation::new(&oracle, Loss::LeastSquares, &data, 1.0, &tracker);

        let all: Vec<Support> = (0..16usize)
            .map(|mask| {
                let idx: Vec<usize> = (0..4).filter(|j| mask & (1 << j) != 0).collect();
                Support::from_indices(4, &idx).unwrap()
            })
            .collect();

        for anchor in &all {
            let cut = handler.cut_at(anchor.clone()).unwrap();
            for other in &all {
                let truth = oracle
                    .evaluate(Loss::LeastSquares, &data, other, 1.0)
                    .unwrap()
                    .value;
                assert!(cut.lower_bound_at(&other.to_indicator()) <= truth + 1e-12);
            }
        }
    }

    #[test]
    fn oracle_failure_propagates() {
        let data = data(2);
        let tracker = IncumbentTracker::new();
        let handler = LazySeparation::new(&Broken, Loss::LeastSquares, &data, 1.0, &tracker);

        let err = handler.on_incumbent(&[1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Solve(SolveError::OracleFailure { .. })
        ));
        // The call was still counted.
        assert_eq!(tracker.cut_count(), 1);
        assert!(tracker.snapshot().is_none());
    }

    #[test]
    fn short_candidate_is_rejected() {
        let oracle = Separable(vec![1.0, 1.0]);
        let data = data(2);
        let tracker = IncumbentTracker::new();
        let handler = LazySeparation::new(&oracle, Loss::LeastSquares, &data, 1.0, &tracker);
        assert!(handler.on_incumbent(&[1.0]).is_err());
    }
}
