//! Ridge-regularized convex oracle and refit.
//!
//! For a support `S` the oracle solves
//!
//! ```text
//! min_w  sum_i loss(y_i, x_{i,S}^T w) + ||w||^2 / (2 gamma)
//! ```
//!
//! by damped Newton. With the dual variable `a_i = -loss'(y_i, u_i)` at the
//! optimum `u = X_S w`, the derivative of the objective with respect to each
//! relaxed indicator is
//!
//! ```text
//! d c / d s_j = -(gamma / 2) (X_j^T a)^2
//! ```
//!
//! for every feature `j`, selected or not. Least squares converges in one
//! Newton step.

use nalgebra::{Cholesky, DMatrix, DVector};
use tracing::trace;

use crate::domain::{Dataset, Loss, Support};
use crate::error::{Result, SolveError};
use crate::port::outbound::oracle::{ConvexOracle, OracleEvaluation};
use crate::port::outbound::recovery::PrimalRecovery;

/// Newton settings.
#[derive(Debug, Clone)]
pub struct RidgeConfig {
    /// Maximum Newton iterations before reporting failure.
    pub max_iterations: usize,
    /// Stop when `||grad|| <= tolerance * max(1, ||grad_0||)`.
    pub tolerance: f64,
    /// Looser bound accepted when the line search can make no further
    /// progress. A stalled iterate above it is reported as a failure, since
    /// its value and gradient would not give a valid cut.
    pub stall_tolerance: f64,
}

impl Default for RidgeConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-9,
            stall_tolerance: 1e-6,
        }
    }
}

/// Minimizer of the restricted ridge problem.
#[derive(Debug, Clone)]
struct RidgeFit {
    weights: DVector<f64>,
    predictions: DVector<f64>,
    value: f64,
}

/// Convex oracle and primal recovery for ridge-regularized GLMs.
#[derive(Debug, Clone, Default)]
pub struct RidgeOracle {
    config: RidgeConfig,
}

impl RidgeOracle {
    #[must_use]
    pub const fn new(config: RidgeConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &RidgeConfig {
        &self.config
    }

    fn fit(&self, loss: Loss, y: &DVector<f64>, x: &DMatrix<f64>, gamma: f64) -> Result<RidgeFit> {
        let (n, m) = x.shape();
        let objective = |u: &DVector<f64>, w: &DVector<f64>| -> f64 {
            u.iter()
                .zip(y.iter())
                .map(|(ui, yi)| loss.value(*yi, *ui))
                .sum::<f64>()
                + w.norm_squared() / (2.0 * gamma)
        };

        let mut w = DVector::zeros(m);
        let mut u = DVector::zeros(n);
        let mut value = objective(&u, &w);
        if m == 0 {
            return Ok(RidgeFit {
                weights: w,
                predictions: u,
                value,
            });
        }

        let mut grad_scale = None;
        for iteration in 0..self.config.max_iterations {
            let d = u.zip_map(y, |ui, yi| loss.derivative(yi, ui));
            let grad = x.tr_mul(&d) + &w / gamma;
            let grad_norm = grad.norm();
            let scale = *grad_scale.get_or_insert(grad_norm.max(1.0));
            if grad_norm <= self.config.tolerance * scale {
                trace!(iteration, value, "Newton converged");
                return Ok(RidgeFit {
                    weights: w,
                    predictions: u,
                    value,
                });
            }

            let h = u.zip_map(y, |ui, yi| loss.curvature(yi, ui));
            let weighted = DMatrix::from_fn(n, m, |i, j| x[(i, j)] * h[i]);
            let mut hessian = x.tr_mul(&weighted);
            for j in 0..m {
                hessian[(j, j)] += 1.0 / gamma;
            }
            let step = Cholesky::new(hessian)
                .ok_or_else(|| SolveError::oracle("Newton system is not positive definite"))?
                .solve(&grad);
            let du = x * &step;

            // Armijo backtracking along -step.
            let slope = -grad.dot(&step);
            let mut alpha = 1.0;
            loop {
                let w_next = &w - &step * alpha;
                let u_next = &u - &du * alpha;
                let next = objective(&u_next, &w_next);
                if next <= value + 1e-4 * alpha * slope {
                    w = w_next;
                    u = u_next;
                    value = next;
                    break;
                }
                alpha *= 0.5;
                if alpha < 1e-12 {
                    trace!(iteration, value, grad_norm, "Line search stalled");
                    self.accept_stalled(grad_norm, scale)?;
                    return Ok(RidgeFit {
                        weights: w,
                        predictions: u,
                        value,
                    });
                }
            }
            if !value.is_finite() {
                return Err(SolveError::oracle(format!("objective diverged to {value}")).into());
            }
        }

        Err(SolveError::oracle(format!(
            "Newton did not converge in {} iterations",
            self.config.max_iterations
        ))
        .into())
    }
}

impl RidgeOracle {
    /// Accept a stalled iterate only if it is near-stationary.
    fn accept_stalled(&self, grad_norm: f64, scale: f64) -> Result<()> {
        if grad_norm <= self.config.stall_tolerance * scale {
            return Ok(());
        }
        Err(SolveError::oracle(format!(
            "line search stalled with gradient norm {grad_norm:e}"
        ))
        .into())
    }
}

impl ConvexOracle for RidgeOracle {
    fn name(&self) -> &'static str {
        "ridge"
    }

    fn evaluate(
        &self,
        loss: Loss,
        data: &Dataset,
        support: &Support,
        gamma: f64,
    ) -> Result<OracleEvaluation> {
        let x_s = data.restrict(support.indices());
        let fitted = self.fit(loss, data.y(), &x_s, gamma)?;

        let dual = fitted
            .predictions
            .zip_map(data.y(), |ui, yi| -loss.derivative(yi, ui));
        let gradient = data
            .x()
            .tr_mul(&dual)
            .iter()
            .map(|v| -0.5 * gamma * v * v)
            .collect();

        Ok(OracleEvaluation {
            value: fitted.value,
            gradient,
        })
    }
}

impl PrimalRecovery for RidgeOracle {
    fn refit(&self, loss: Loss, y: &DVector<f64>, x: &DMatrix<f64>, gamma: f64) -> Result<Vec<f64>> {
        if x.nrows() != y.len() {
            return Err(SolveError::invalid(
                "x",
                format!("has {} rows but y has {}", x.nrows(), y.len()),
            )
            .into());
        }
        let fitted = self.fit(loss, y, x, gamma)?;
        Ok(fitted.weights.iter().copied().collect())
    }
}
