//! Convex subproblem oracle port.

use crate::domain::{Dataset, Loss, Support};
use crate::error::Result;

/// Value and gradient of the training objective at one support.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleEvaluation {
    /// Optimal regularized loss over weights restricted to the support.
    pub value: f64,
    /// Partial derivative of `value` with respect to each relaxed indicator
    /// `s_j`, for every feature (selected or not).
    pub gradient: Vec<f64>,
}

/// Evaluates the partial-minimization objective
///
/// ```text
/// c(s) = min { sum_i loss(y_i, x_i^T w) + ||w||^2 / (2 gamma) : w_j = 0 for s_j = 0 }
/// ```
///
/// together with a subgradient in `s`. At binary `s` this equals its dual
/// form `max_a -sum_i loss*(y_i, a_i) - (gamma / 2) sum_j s_j (X_j^T a)^2`,
/// which is convex over the relaxed domain `[0, 1]^p`; every cut built from an
/// evaluation relies on that extension.
///
/// # Thread Safety
///
/// Implementations must be pure functions of their arguments and callable
/// from several search threads at once (`Send + Sync`).
pub trait ConvexOracle: Send + Sync {
    /// Return the oracle name for logging.
    fn name(&self) -> &'static str;

    /// Evaluate the objective and its gradient at `support`.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::OracleFailure`](crate::error::SolveError::OracleFailure)
    /// when the inner problem cannot be solved, e.g. on numerical breakdown.
    fn evaluate(
        &self,
        loss: Loss,
        data: &Dataset,
        support: &Support,
        gamma: f64,
    ) -> Result<OracleEvaluation>;
}
