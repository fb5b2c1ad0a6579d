//! Initial support strategies.
//!
//! The initial support only seeds the first cut and the incumbent; it need not
//! be optimal or even of size k, because the master's cardinality row decides
//! feasibility.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::domain::{Dataset, Support};

/// How to pick the initial support when the caller supplies none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarmStart {
    /// Uniform random subset of size k.
    #[default]
    Random,
    /// The k features with the largest `|X_j^T y|`.
    Correlation,
}

impl WarmStart {
    /// Pick an initial support of size `min(k, p)`.
    ///
    /// `seed` makes [`WarmStart::Random`] reproducible; without it the
    /// generator is seeded from the OS.
    #[must_use]
    pub fn initial_support(self, data: &Dataset, k: usize, seed: Option<u64>) -> Support {
        let p = data.n_features();
        let k = k.min(p);
        let indices = match self {
            Self::Random => {
                let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
                rand::seq::index::sample(&mut rng, p, k).into_vec()
            }
            Self::Correlation => top_correlated(data, k),
        };
        // Indices are in range by construction.
        Support::from_indices(p, &indices).unwrap_or_else(|_| Support::empty(p))
    }
}

fn top_correlated(data: &Dataset, k: usize) -> Vec<usize> {
    let scores = data.x().tr_mul(data.y());
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // Stable sort keeps lower indices first on ties.
    order.sort_by(|&a, &b| scores[b].abs().total_cmp(&scores[a].abs()));
    order.truncate(k);
    order
}
