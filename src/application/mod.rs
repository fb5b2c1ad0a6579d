//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the sparse regression solve.

pub mod driver;
pub mod incumbent;
pub mod separation;
pub mod synthetic;
pub mod warm_start;

pub use driver::{OuterApproximation, SolveOptions};
pub use incumbent::{Incumbent, IncumbentTracker};
pub use separation::LazySeparation;
pub use synthetic::SyntheticSpec;
pub use warm_start::WarmStart;
