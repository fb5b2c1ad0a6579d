//! Closed-form oracles.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::{Dataset, Loss, Support};
use crate::error::{Result, SolveError};
use crate::port::outbound::oracle::{ConvexOracle, OracleEvaluation};

/// `c(s) = sum_j w_j (1 - s_j / 2)^2`.
///
/// Convex and separable; selecting feature `j` saves `3 w_j / 4`, so the
/// optimal support of size `k` holds the `k` largest weights. Ignores the
/// loss and data apart from checking the feature count.
#[derive(Debug, Clone)]
pub struct QuadraticOracle {
    weights: Vec<f64>,
}

impl QuadraticOracle {
    #[must_use]
    pub fn new(weights: Vec<f64>) -> Self {
        Self { weights }
    }

    /// Closed-form objective.
    #[must_use]
    pub fn value_of(&self, support: &Support) -> f64 {
        self.weights
            .iter()
            .enumerate()
            .map(|(j, w)| if support.contains(j) { w / 4.0 } else { *w })
            .sum()
    }

    /// Optimal support of size at most `k`; ties go to the lower index.
    #[must_use]
    pub fn best_support(&self, k: usize) -> Support {
        let mut order: Vec<usize> = (0..self.weights.len()).collect();
        order.sort_by(|&a, &b| self.weights[b].total_cmp(&self.weights[a]));
        order.truncate(k);
        order.retain(|&j| self.weights[j] > 0.0);
        Support::from_indices(self.weights.len(), &order)
            .unwrap_or_else(|_| Support::empty(self.weights.len()))
    }
}

impl ConvexOracle for QuadraticOracle {
    fn name(&self) -> &'static str {
        "quadratic"
    }

    fn evaluate(
        &self,
        _loss: Loss,
        data: &Dataset,
        support: &Support,
        _gamma: f64,
    ) -> Result<OracleEvaluation> {
        if data.n_features() != self.weights.len() {
            return Err(SolveError::oracle(format!(
                "oracle has {} weights, data has {} features",
                self.weights.len(),
                data.n_features()
            ))
            .into());
        }
        let gradient = self
            .weights
            .iter()
            .enumerate()
            .map(|(j, w)| if support.contains(j) { -w / 2.0 } else { -w })
            .collect();
        Ok(OracleEvaluation {
            value: self.value_of(support),
            gradient,
        })
    }
}

/// Delegates to an inner oracle, then fails from the `after + 1`-th call on.
pub struct FailingOracle<O> {
    inner: O,
    after: usize,
    calls: AtomicUsize,
}

impl<O: ConvexOracle> FailingOracle<O> {
    #[must_use]
    pub fn new(inner: O, after: usize) -> Self {
        Self {
            inner,
            after,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of evaluations attempted so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<O: ConvexOracle> ConvexOracle for FailingOracle<O> {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn evaluate(
        &self,
        loss: Loss,
        data: &Dataset,
        support: &Support,
        gamma: f64,
    ) -> Result<OracleEvaluation> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n >= self.after {
            return Err(SolveError::oracle(format!("injected failure on call {}", n + 1)).into());
        }
        self.inner.evaluate(loss, data, support, gamma)
    }
}
