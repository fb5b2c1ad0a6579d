//! Feature selection vectors.

use std::collections::BTreeSet;

use crate::error::SolveError;

/// Threshold applied to relaxed indicator values read back from a solver.
pub const SELECTION_THRESHOLD: f64 = 0.5;

/// An owned snapshot of a selection vector `s ∈ {0,1}^p`.
///
/// Stored as sorted, deduplicated feature indices. Snapshots are taken by
/// copying whatever the discrete solver currently holds, so later solver
/// mutation never shows through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Support {
    dim: usize,
    indices: Vec<usize>,
}

impl Support {
    /// The empty support over `dim` features.
    #[must_use]
    pub const fn empty(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
        }
    }

    /// Build from feature indices, dropping duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::InvalidParameter`] if an index is `>= dim`.
    pub fn from_indices(dim: usize, indices: &[usize]) -> Result<Self, SolveError> {
        if let Some(bad) = indices.iter().find(|&&j| j >= dim) {
            return Err(SolveError::invalid(
                "initial_support",
                format!("feature index {bad} out of range for {dim} features"),
            ));
        }
        let indices: BTreeSet<usize> = indices.iter().copied().collect();
        Ok(Self {
            dim,
            indices: indices.into_iter().collect(),
        })
    }

    /// Snapshot a relaxed indicator vector, selecting entries above 0.5.
    ///
    /// Binary variables returned by a MIP solver may sit at `1 - 1e-9` or
    /// `1e-10`; thresholding recovers the intended 0/1 value.
    #[must_use]
    pub fn from_relaxed(values: &[f64]) -> Self {
        let indices = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > SELECTION_THRESHOLD)
            .map(|(j, _)| j)
            .collect();
        Self {
            dim: values.len(),
            indices,
        }
    }

    /// Number of features the vector ranges over (p).
    #[must_use]
    pub const fn dim(&self) -> usize {
        self.dim
    }

    /// Number of selected features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Selected feature indices in increasing order.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    #[must_use]
    pub fn contains(&self, feature: usize) -> bool {
        self.indices.binary_search(&feature).is_ok()
    }

    /// Dense 0/1 indicator of length `dim`.
    #[must_use]
    pub fn to_indicator(&self) -> Vec<f64> {
        let mut s = vec![0.0; self.dim];
        for &j in &self.indices {
            s[j] = 1.0;
        }
        s
    }
}
