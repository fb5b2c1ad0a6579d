use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors raised by a sparse regression solve.
///
/// A time-limited search is not an error: it produces a result whose status is
/// [`SolverStatus::TimeLimit`](crate::domain::SolverStatus::TimeLimit).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// Malformed k, gamma, tolerance or mismatched dimensions. Raised before
    /// the oracle or the discrete solver is touched.
    #[error("invalid parameter {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// The discrete master problem has no feasible point.
    #[error("master problem is infeasible")]
    SolverInfeasible,

    /// The convex oracle could not evaluate a support. Aborts the whole
    /// solve, since a visited incumbent without a cut leaves the lower bound
    /// unsound.
    #[error("oracle failed: {reason}")]
    OracleFailure { reason: String },

    /// The discrete solver backend failed internally.
    #[error("discrete solver error: {0}")]
    Backend(String),
}

impl SolveError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn oracle(reason: impl Into<String>) -> Self {
        Self::OracleFailure {
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
