//! Primal recovery port.

use nalgebra::{DMatrix, DVector};

use crate::domain::Loss;
use crate::error::Result;

/// Refits continuous coefficients once the support is fixed.
pub trait PrimalRecovery: Send + Sync {
    /// Solve `min_w sum_i loss(y_i, x_i^T w) + ||w||^2 / (2 gamma)`.
    ///
    /// `x` holds only the selected columns; the returned vector has one entry
    /// per column of `x` (possibly zero entries).
    ///
    /// # Errors
    ///
    /// Returns an error if the regression cannot be solved.
    fn refit(&self, loss: Loss, y: &DVector<f64>, x: &DMatrix<f64>, gamma: f64) -> Result<Vec<f64>>;
}
