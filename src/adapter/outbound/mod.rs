//! Outbound adapters (driven side).

#[cfg(feature = "highs")]
pub mod highs;
pub mod ridge;

#[cfg(feature = "highs")]
pub use highs::HighsSolver;
pub use ridge::{RidgeConfig, RidgeOracle};
