//! Outer-approximation cuts.
//!
//! A cut anchored at `s0` with oracle value `c` and gradient `g` is the affine
//! minorant
//!
//! ```text
//! t >= c + <g, s - s0>
//! ```
//!
//! It is a global lower bound on the training objective because the
//! objective is convex in the relaxed indicator vector.

use super::constraint::Constraint;
use super::support::Support;

/// A supporting hyperplane of the training objective.
#[derive(Debug, Clone, PartialEq)]
pub struct Cut {
    anchor: Support,
    value: f64,
    gradient: Vec<f64>,
}

impl Cut {
    /// Create a cut at `anchor`. `gradient` must have one entry per feature.
    #[must_use]
    pub fn new(anchor: Support, value: f64, gradient: Vec<f64>) -> Self {
        debug_assert_eq!(anchor.dim(), gradient.len());
        Self {
            anchor,
            value,
            gradient,
        }
    }

    #[must_use]
    pub const fn anchor(&self) -> &Support {
        &self.anchor
    }

    /// Objective value at the anchor.
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn gradient(&self) -> &[f64] {
        &self.gradient
    }

    /// Constant term `c - <g, s0>` of the affine minorant.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        let at_anchor: f64 = self
            .anchor
            .indices()
            .iter()
            .map(|&j| self.gradient[j])
            .sum();
        self.value - at_anchor
    }

    /// Lower bound the cut places on the objective at `s`.
    #[must_use]
    pub fn lower_bound_at(&self, s: &[f64]) -> f64 {
        self.intercept() + self.gradient.iter().zip(s).map(|(g, v)| g * v).sum::<f64>()
    }

    /// Row over the master variables `[s_0, .., s_{p-1}, t]`:
    /// `t - <g, s> >= c - <g, s0>`.
    #[must_use]
    pub fn to_constraint(&self) -> Constraint {
        let mut coefficients: Vec<f64> = self.gradient.iter().map(|g| -g).collect();
        coefficients.push(1.0);
        Constraint::geq(coefficients, self.intercept())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cut() -> Cut {
        let anchor = Support::from_indices(3, &[0, 2]).unwrap();
        Cut::new(anchor, 5.0, vec![-1.0, -2.0, -0.5])
    }

    #[test]
    fn cut_is_tight_at_anchor() {
        let c = cut();
        let s0 = c.anchor().to_indicator();
        assert!((c.lower_bound_at(&s0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn lower_bound_moves_along_gradient() {
        let c = cut();
        // s = {1}: 5 + (-1)(0-1) + (-2)(1-0) + (-0.5)(0-1) = 4.5
        assert!((c.lower_bound_at(&[0.0, 1.0, 0.0]) - 4.5).abs() < 1e-12);
    }

    #[test]
    fn constraint_row_matches_cut() {
        let c = cut();
        let row = c.to_constraint();
        assert_eq!(row.coefficients, vec![1.0, 2.0, 0.5, 1.0]);
        let s = [0.0, 1.0, 0.0];
        let on_cut = c.lower_bound_at(&s);
        let mut point = s.to_vec();
        point.push(on_cut);
        assert!(row.is_satisfied(&point, 1e-12));
        point[3] = on_cut - 1e-3;
        assert!(!row.is_satisfied(&point, 1e-9));
    }
}
