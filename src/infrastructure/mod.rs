//! Infrastructure layer.
//!
//! Technical concerns that support the solver without containing any of its
//! logic.
//!
//! # Submodules
//!
//! - [`config`] - Configuration loading and validation
//! - [`environment`] - Thread budget discovery from the process environment

pub mod config;
pub mod environment;
