//! Design matrix and response vector for one solve.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::SolveError;

/// Immutable training data: `x` is n samples by p features, `y` has n rows.
///
/// A dataset is borrowed for the whole solve and may be read concurrently by
/// several oracle evaluations.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    x: DMatrix<f64>,
    y: DVector<f64>,
}

impl Dataset {
    /// Build a dataset, checking that dimensions agree and every entry is finite.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::InvalidParameter`] when the row counts differ,
    /// there are no samples, or an entry is NaN or infinite.
    pub fn new(x: DMatrix<f64>, y: DVector<f64>) -> Result<Self, SolveError> {
        if x.nrows() != y.len() {
            return Err(SolveError::invalid(
                "y",
                format!("has {} rows but x has {}", y.len(), x.nrows()),
            ));
        }
        if x.nrows() == 0 {
            return Err(SolveError::invalid("x", "must contain at least one sample"));
        }
        if x.iter().any(|v| !v.is_finite()) {
            return Err(SolveError::invalid("x", "contains non-finite entries"));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(SolveError::invalid("y", "contains non-finite entries"));
        }
        Ok(Self { x, y })
    }

    /// Build a dataset from row-major samples.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::InvalidParameter`] on ragged rows or any check
    /// performed by [`Dataset::new`].
    pub fn from_rows(rows: &[Vec<f64>], y: Vec<f64>) -> Result<Self, SolveError> {
        let p = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != p) {
            return Err(SolveError::invalid(
                "x",
                format!("row {bad} has {} columns, expected {p}", rows[bad].len()),
            ));
        }
        let x = DMatrix::from_fn(rows.len(), p, |i, j| rows[i][j]);
        Self::new(x, DVector::from_vec(y))
    }

    /// Number of samples.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    /// Number of features.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    #[must_use]
    pub const fn x(&self) -> &DMatrix<f64> {
        &self.x
    }

    #[must_use]
    pub const fn y(&self) -> &DVector<f64> {
        &self.y
    }

    /// Copy of the columns of `x` listed in `columns`, in that order.
    #[must_use]
    pub fn restrict(&self, columns: &[usize]) -> DMatrix<f64> {
        self.x.select_columns(columns)
    }
}

/// JSON file layout for datasets: `{"x": [[...], ...], "y": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetFile {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<f64>,
}

impl DatasetFile {
    /// Validate and convert into a [`Dataset`].
    ///
    /// # Errors
    ///
    /// See [`Dataset::from_rows`].
    pub fn into_dataset(self) -> Result<Dataset, SolveError> {
        Dataset::from_rows(&self.x, self.y)
    }
}

impl From<&Dataset> for DatasetFile {
    fn from(data: &Dataset) -> Self {
        let x = data
            .x
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect();
        Self {
            x,
            y: data.y.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_row_mismatch() {
        let x = DMatrix::zeros(3, 2);
        let y = DVector::zeros(2);
        let err = Dataset::new(x, y).unwrap_err();
        assert!(matches!(err, SolveError::InvalidParameter { field: "y", .. }));
    }

    #[test]
    fn rejects_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let err = Dataset::from_rows(&rows, vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, SolveError::InvalidParameter { field: "x", .. }));
    }

    #[test]
    fn rejects_nan() {
        let rows = vec![vec![1.0, f64::NAN]];
        assert!(Dataset::from_rows(&rows, vec![1.0]).is_err());
    }

    #[test]
    fn restrict_keeps_column_order() {
        let rows = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let data = Dataset::from_rows(&rows, vec![0.0, 1.0]).unwrap();
        let sub = data.restrict(&[2, 0]);
        assert_eq!(sub.ncols(), 2);
        assert_eq!(sub[(0, 0)], 3.0);
        assert_eq!(sub[(1, 1)], 4.0);
    }

    #[test]
    fn file_layout_round_trips_shape() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let data = Dataset::from_rows(&rows, vec![1.0, 0.0, 1.0]).unwrap();
        let file = DatasetFile::from(&data);
        assert_eq!(file.x, rows);
        assert_eq!(file.into_dataset().unwrap(), data);
    }
}
