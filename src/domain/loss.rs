//! Per-sample loss functions.
//!
//! The solver core only passes a [`Loss`] through to the oracle and the refit;
//! the oracle uses the value, derivative and curvature with respect to the
//! prediction `u = x_i^T w`.

use serde::{Deserialize, Serialize};

use crate::error::SolveError;

/// Supported losses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loss {
    /// `(y - u)^2 / 2`.
    #[default]
    LeastSquares,
    /// `log(1 + exp(-y u))`, targets in {-1, +1}.
    Logistic,
    /// `max(0, 1 - y u)^2`, targets in {-1, +1}.
    SquaredHinge,
}

impl Loss {
    /// Stable name used in logs and config files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeastSquares => "least_squares",
            Self::Logistic => "logistic",
            Self::SquaredHinge => "squared_hinge",
        }
    }

    /// Whether the loss is quadratic in `u`, so one Newton step is exact.
    #[must_use]
    pub const fn is_quadratic(self) -> bool {
        matches!(self, Self::LeastSquares)
    }

    /// Loss value for target `y` and prediction `u`.
    #[must_use]
    pub fn value(self, y: f64, u: f64) -> f64 {
        match self {
            Self::LeastSquares => 0.5 * (y - u) * (y - u),
            Self::Logistic => softplus(-y * u),
            Self::SquaredHinge => {
                let m = (1.0 - y * u).max(0.0);
                m * m
            }
        }
    }

    /// Derivative with respect to `u`.
    #[must_use]
    pub fn derivative(self, y: f64, u: f64) -> f64 {
        match self {
            Self::LeastSquares => u - y,
            Self::Logistic => -y * sigmoid(-y * u),
            Self::SquaredHinge => -2.0 * y * (1.0 - y * u).max(0.0),
        }
    }

    /// Second derivative with respect to `u`. Non-negative for every variant.
    #[must_use]
    pub fn curvature(self, y: f64, u: f64) -> f64 {
        match self {
            Self::LeastSquares => 1.0,
            Self::Logistic => {
                let s = sigmoid(-y * u);
                y * y * s * (1.0 - s)
            }
            Self::SquaredHinge => {
                if 1.0 - y * u > 0.0 {
                    2.0 * y * y
                } else {
                    0.0
                }
            }
        }
    }

    /// Check that targets are admissible for this loss.
    ///
    /// # Errors
    ///
    /// Classification losses reject targets other than -1 and +1.
    pub fn validate_targets<'a>(self, y: impl IntoIterator<Item = &'a f64>) -> Result<(), SolveError> {
        match self {
            Self::LeastSquares => Ok(()),
            Self::Logistic | Self::SquaredHinge => {
                match y.into_iter().find(|v| **v != 1.0 && **v != -1.0) {
                    Some(bad) => Err(SolveError::invalid(
                        "y",
                        format!("{} loss needs targets in {{-1, +1}}, got {bad}", self.as_str()),
                    )),
                    None => Ok(()),
                }
            }
        }
    }
}

impl std::str::FromStr for Loss {
    type Err = SolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::LeastSquares, Self::Logistic, Self::SquaredHinge]
            .into_iter()
            .find(|loss| loss.as_str() == s)
            .ok_or_else(|| {
                SolveError::invalid(
                    "loss",
                    format!("unknown loss {s:?}; expected least_squares, logistic or squared_hinge"),
                )
            })
    }
}

impl std::fmt::Display for Loss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

// log(1 + e^z) without overflow
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}
