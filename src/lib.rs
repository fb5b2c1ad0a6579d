//! Subsetcut - cardinality-constrained sparse regression by outer approximation.
//!
//! Selects at most `k` of `p` features to minimize a ridge-regularized
//! training loss. The discrete search runs on a mixed-integer master problem;
//! a convex oracle evaluates each visited support and returns a supporting
//! hyperplane that is added back to the master as a lazy cut.
//!
//! # Architecture
//!
//! - **`domain`** - Loss functions, datasets, supports, cuts, fit results
//! - **`port`** - Seams to the outside: discrete solver, convex oracle, refit
//! - **`application`** - Outer-approximation driver, separation handler,
//!   incumbent tracking, warm starts, synthetic data
//! - **`adapter`** - `RidgeOracle` (nalgebra) and `HighsSolver` (good_lp) plus
//!   the command-line surface
//! - **`infrastructure`** - TOML configuration, logging, thread discovery
//!
//! # Features
//!
//! - `highs` (default) - HiGHS master solver and the `subsetcut` binary
//! - `testkit` - Exhaustive master solver and closed-form oracles for tests
//!
//! # Example
//!
//! ```no_run
//! use subsetcut::application::{SolveOptions, SyntheticSpec};
//! use subsetcut::domain::Loss;
//!
//! let data = SyntheticSpec::default().generate(Loss::LeastSquares)?;
//! let fit = subsetcut::solve(
//!     Loss::LeastSquares,
//!     data.y(),
//!     data.x(),
//!     2,
//!     1.0,
//!     &SolveOptions::default().with_seed(7),
//! )?;
//! println!("{:?} -> {:?}", fit.selected, fit.weights);
//! # Ok::<(), subsetcut::error::Error>(())
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

#[cfg(feature = "highs")]
pub use convenience::solve;

#[cfg(feature = "highs")]
mod convenience {
    use std::sync::Arc;

    use nalgebra::{DMatrix, DVector};

    use crate::adapter::outbound::{HighsSolver, RidgeOracle};
    use crate::application::{OuterApproximation, SolveOptions};
    use crate::domain::{Dataset, Loss, SparseFit};
    use crate::error::Result;

    /// Solve with the default backends: HiGHS for the master and the ridge
    /// oracle for cuts and the final refit.
    ///
    /// # Errors
    ///
    /// See [`OuterApproximation::solve`]. Also rejects `x` and `y` of
    /// mismatched length or with non-finite entries.
    pub fn solve(
        loss: Loss,
        y: &DVector<f64>,
        x: &DMatrix<f64>,
        k: usize,
        gamma: f64,
        options: &SolveOptions,
    ) -> Result<SparseFit> {
        let data = Dataset::new(x.clone(), y.clone())?;
        let ridge = Arc::new(RidgeOracle::default());
        OuterApproximation::new(Arc::new(HighsSolver::new()), ridge.clone(), ridge)
            .solve(loss, &data, k, gamma, options)
    }
}
