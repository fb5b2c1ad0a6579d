//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`solver`] - `ExhaustiveSolver`, a brute-force master solver that fires
//!   the lazy handler from several threads.
//! - [`oracle`] - `QuadraticOracle` with a closed-form optimum and
//!   `FailingOracle` for error propagation.

pub mod oracle;
pub mod solver;

pub use oracle::{FailingOracle, QuadraticOracle};
pub use solver::ExhaustiveSolver;
