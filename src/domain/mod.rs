//! Backend-agnostic problem types.

pub mod constraint;
mod cut;
mod dataset;
mod fit;
mod loss;
mod support;

pub use constraint::{Constraint, ConstraintSense, VariableBounds};
pub use cut::Cut;
pub use dataset::{Dataset, DatasetFile};
pub use fit::{relative_gap, SolverStatus, SparseFit, GAP_ZERO_TOL};
pub use loss::Loss;
pub use support::{Support, SELECTION_THRESHOLD};
