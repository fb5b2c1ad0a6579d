//! Synthetic sparse regression data.

use nalgebra::{DMatrix, DVector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::domain::{Dataset, Loss};
use crate::error::{Result, SolveError};

/// Recipe for a Gaussian design with a few informative features.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticSpec {
    pub n: usize,
    pub p: usize,
    /// Features with a nonzero true coefficient.
    pub informative: Vec<usize>,
    /// True coefficient magnitude; signs alternate across `informative`.
    pub amplitude: f64,
    /// Standard deviation of additive Gaussian noise.
    pub noise: f64,
    pub seed: u64,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            n: 100,
            p: 10,
            informative: vec![0, 3],
            amplitude: 2.0,
            noise: 0.1,
            seed: 0,
        }
    }
}

impl SyntheticSpec {
    /// Draw the dataset. For classification losses the targets are the signs
    /// of the noisy linear response.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::InvalidParameter`] for an informative index
    /// `>= p`, a negative noise level, or no samples.
    pub fn generate(&self, loss: Loss) -> Result<Dataset> {
        if let Some(bad) = self.informative.iter().find(|&&j| j >= self.p) {
            return Err(SolveError::invalid(
                "informative",
                format!("feature {bad} out of range for p = {}", self.p),
            )
            .into());
        }
        if !(self.noise.is_finite() && self.noise >= 0.0) {
            return Err(SolveError::invalid("noise", "must be finite and >= 0").into());
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let x = DMatrix::from_fn(self.n, self.p, |_, _| rng.sample::<f64, _>(StandardNormal));

        let mut beta = DVector::zeros(self.p);
        for (i, &j) in self.informative.iter().enumerate() {
            beta[j] = if i % 2 == 0 { self.amplitude } else { -self.amplitude };
        }

        let mut y = &x * &beta;
        for v in y.iter_mut() {
            *v += self.noise * rng.sample::<f64, _>(StandardNormal);
        }
        if matches!(loss, Loss::Logistic | Loss::SquaredHinge) {
            y.apply(|v| *v = if *v >= 0.0 { 1.0 } else { -1.0 });
        }

        Ok(Dataset::new(x, y)?)
    }
}
