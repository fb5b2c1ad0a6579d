//! End-to-end solves through the outer-approximation driver.

mod support;

use std::sync::Arc;

use nalgebra::Cholesky;
use subsetcut::adapter::outbound::RidgeOracle;
use subsetcut::application::{OuterApproximation, SolveOptions, WarmStart};
use subsetcut::domain::{Loss, SolverStatus, Support};
use subsetcut::error::{Error, SolveError};
use subsetcut::port::outbound::oracle::ConvexOracle;
use subsetcut::testkit::{ExhaustiveSolver, FailingOracle, QuadraticOracle};

use support::assertions::assert_near;
use support::problem::{brute_force, exhaustive_driver, synthetic};

fn options() -> SolveOptions {
    SolveOptions::default().with_seed(7)
}

#[test]
fn recovers_informative_features() {
    let data = synthetic(100, 5, Loss::LeastSquares, 1);
    let fit = exhaustive_driver(2)
        .solve(Loss::LeastSquares, &data, 2, 1.0, &options())
        .unwrap();

    assert_eq!(fit.selected, vec![0, 3]);
    assert_eq!(fit.status, SolverStatus::Optimal);
    assert_eq!(fit.weights.len(), 2);
    // True coefficients are +2 and -2.
    assert!(fit.weights[0] > 1.5, "weights {:?}", fit.weights);
    assert!(fit.weights[1] < -1.5, "weights {:?}", fit.weights);
}

#[test]
fn zero_budget_selects_nothing() {
    let data = synthetic(30, 4, Loss::LeastSquares, 2);
    let fit = exhaustive_driver(1)
        .solve(Loss::LeastSquares, &data, 0, 1.0, &options())
        .unwrap();

    assert!(fit.selected.is_empty());
    assert!(fit.weights.is_empty());
    assert_eq!(fit.status, SolverStatus::Optimal);
    // Only the seed at the empty support was evaluated.
    assert_eq!(fit.cut_count, 1);
    let null_loss = 0.5 * data.y().norm_squared();
    assert_near(fit.objective, null_loss, 1e-9);
}

#[test]
fn full_budget_matches_unconstrained_ridge() {
    let data = synthetic(40, 4, Loss::LeastSquares, 3);
    let gamma = 0.8;
    let fit = exhaustive_driver(2)
        .solve(Loss::LeastSquares, &data, 4, gamma, &options())
        .unwrap();

    assert_eq!(fit.selected, vec![0, 1, 2, 3]);

    let x = data.x();
    let mut normal = x.tr_mul(x);
    for j in 0..4 {
        normal[(j, j)] += 1.0 / gamma;
    }
    let expected = Cholesky::new(normal).unwrap().solve(&x.tr_mul(data.y()));
    for (w, e) in fit.weights.iter().zip(expected.iter()) {
        assert_near(*w, *e, 1e-8);
    }
}

#[test]
fn matches_brute_force_for_every_budget() {
    for (loss, seed) in [
        (Loss::LeastSquares, 4),
        (Loss::Logistic, 5),
        (Loss::SquaredHinge, 6),
    ] {
        let data = synthetic(50, 5, loss, seed);
        for k in 0..=5 {
            let fit = exhaustive_driver(3).solve(loss, &data, k, 0.5, &options()).unwrap();
            let (best, value) = brute_force(loss, &data, k, 0.5);

            assert!(fit.selected.len() <= k, "{loss} k={k}: {:?}", fit.selected);
            assert_near(fit.objective, value, 1e-8);
            assert_eq!(fit.selected, best.indices(), "{loss} k={k}");
        }
    }
}

#[test]
fn objective_is_the_oracle_value_at_the_selection() {
    let data = synthetic(60, 6, Loss::Logistic, 8);
    let fit = exhaustive_driver(2)
        .solve(Loss::Logistic, &data, 3, 2.0, &options())
        .unwrap();

    let support = Support::from_indices(6, &fit.selected).unwrap();
    let eval = RidgeOracle::default()
        .evaluate(Loss::Logistic, &data, &support, 2.0)
        .unwrap();
    assert_near(fit.objective, eval.value, 1e-12);
}

#[test]
fn seeding_with_the_optimum_is_idempotent() {
    let data = synthetic(80, 6, Loss::LeastSquares, 9);
    let driver = exhaustive_driver(2);
    let first = driver
        .solve(Loss::LeastSquares, &data, 2, 1.0, &options())
        .unwrap();
    let second = driver
        .solve(
            Loss::LeastSquares,
            &data,
            2,
            1.0,
            &options().with_initial_support(first.selected.clone()),
        )
        .unwrap();

    assert_eq!(first.selected, second.selected);
    assert_near(first.objective, second.objective, 1e-12);
    assert_eq!(second.status, SolverStatus::Optimal);
}

#[test]
fn repeated_solve_with_same_seed_is_deterministic() {
    let data = synthetic(80, 6, Loss::Logistic, 17);
    let driver = exhaustive_driver(4);
    let first = driver.solve(Loss::Logistic, &data, 3, 1.0, &options()).unwrap();
    let second = driver.solve(Loss::Logistic, &data, 3, 1.0, &options()).unwrap();

    assert_eq!(first.selected, second.selected);
    assert_eq!(first.weights, second.weights);
    assert_eq!(first.status, second.status);
}

#[test]
fn warm_start_strategy_does_not_change_the_answer() {
    let data = synthetic(80, 6, Loss::LeastSquares, 10);
    let driver = exhaustive_driver(1);
    let random = driver
        .solve(Loss::LeastSquares, &data, 2, 1.0, &options())
        .unwrap();
    let correlated = driver
        .solve(
            Loss::LeastSquares,
            &data,
            2,
            1.0,
            &options().with_warm_start(WarmStart::Correlation),
        )
        .unwrap();
    assert_eq!(random.selected, correlated.selected);
}

#[test]
fn optimal_gap_is_within_tolerance() {
    let data = synthetic(50, 5, Loss::SquaredHinge, 11);
    let fit = exhaustive_driver(2)
        .solve(Loss::SquaredHinge, &data, 2, 1.0, &options())
        .unwrap();

    let gap = fit.gap.expect("gap is defined for a positive objective");
    assert!((0.0..=1e-9).contains(&gap), "gap {gap}");
    assert!(fit.bound <= fit.objective + 1e-9);
}

#[test]
fn oversized_initial_support_is_only_a_cut() {
    let data = synthetic(40, 5, Loss::LeastSquares, 12);
    let fit = exhaustive_driver(1)
        .solve(
            Loss::LeastSquares,
            &data,
            1,
            1.0,
            &options().with_initial_support(vec![0, 1, 2]),
        )
        .unwrap();
    let (best, _) = brute_force(Loss::LeastSquares, &data, 1, 1.0);
    assert_eq!(fit.selected, best.indices());
}

#[test]
fn zero_time_limit_returns_the_seed() {
    let data = synthetic(40, 5, Loss::LeastSquares, 13);
    let fit = exhaustive_driver(1)
        .solve(
            Loss::LeastSquares,
            &data,
            2,
            1.0,
            &options().with_initial_support(vec![1, 2]).with_time_limit(0.0),
        )
        .unwrap();

    assert_eq!(fit.status, SolverStatus::TimeLimit);
    assert_eq!(fit.selected, vec![1, 2]);
    assert_eq!(fit.cut_count, 1);
    // The bound is still the epigraph floor.
    assert_eq!(fit.gap, Some(1.0));
}

#[test]
fn oracle_failure_aborts_the_solve() {
    let data = synthetic(30, 5, Loss::LeastSquares, 14);
    let oracle = Arc::new(FailingOracle::new(RidgeOracle::default(), 3));
    let driver = OuterApproximation::new(
        Arc::new(ExhaustiveSolver::new(2)),
        oracle.clone(),
        Arc::new(RidgeOracle::default()),
    );

    let err = driver
        .solve(Loss::LeastSquares, &data, 2, 1.0, &options())
        .unwrap_err();
    assert!(
        matches!(err, Error::Solve(SolveError::OracleFailure { .. })),
        "{err:?}"
    );
    assert!(oracle.calls() > 3);
}

#[test]
fn invalid_budget_is_rejected_before_any_evaluation() {
    let data = synthetic(30, 5, Loss::LeastSquares, 15);
    let oracle = Arc::new(FailingOracle::new(RidgeOracle::default(), 0));
    let driver = OuterApproximation::new(
        Arc::new(ExhaustiveSolver::default()),
        oracle.clone(),
        Arc::new(RidgeOracle::default()),
    );

    let err = driver
        .solve(Loss::LeastSquares, &data, 6, 1.0, &options())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Solve(SolveError::InvalidParameter { field: "k", .. })
    ));
    assert_eq!(oracle.calls(), 0);
}

#[test]
fn concurrent_separation_keeps_count_and_incumbent() {
    let weights = vec![0.5, 3.0, 1.0, 4.0, 0.25, 2.0, 1.5, 0.75];
    let oracle = Arc::new(QuadraticOracle::new(weights));
    let data = synthetic(20, 8, Loss::LeastSquares, 16);
    let driver = OuterApproximation::new(
        Arc::new(ExhaustiveSolver::new(8)),
        oracle.clone(),
        Arc::new(RidgeOracle::default()),
    );

    let fit = driver
        .solve(Loss::LeastSquares, &data, 3, 1.0, &options())
        .unwrap();

    let best = oracle.best_support(3);
    assert_eq!(fit.selected, best.indices());
    assert_near(fit.objective, oracle.value_of(&best), 1e-12);
    // Every support of size <= 3 evaluated exactly once: 1 + 8 + 28 + 56.
    assert_eq!(fit.cut_count, 93);
}

#[cfg(feature = "highs")]
mod highs {
    use super::*;
    use support::problem::highs_driver;

    #[test]
    fn highs_recovers_informative_features() {
        let data = synthetic(100, 5, Loss::LeastSquares, 1);
        let fit = highs_driver()
            .solve(Loss::LeastSquares, &data, 2, 1.0, &options())
            .unwrap();

        assert_eq!(fit.selected, vec![0, 3]);
        assert_eq!(fit.status, SolverStatus::Optimal);
        assert!(fit.gap.unwrap() <= 1e-6);
        assert!(fit.cut_count >= 1);
    }

    #[test]
    fn highs_repeated_solve_with_same_seed_is_deterministic() {
        let data = synthetic(80, 6, Loss::LeastSquares, 18);
        let first = highs_driver()
            .solve(Loss::LeastSquares, &data, 2, 1.0, &options())
            .unwrap();
        let second = highs_driver()
            .solve(Loss::LeastSquares, &data, 2, 1.0, &options())
            .unwrap();

        assert_eq!(first.selected, second.selected);
        assert_eq!(first.weights, second.weights);
    }

    #[test]
    fn highs_agrees_with_enumeration() {
        for (loss, seed) in [(Loss::LeastSquares, 21), (Loss::Logistic, 22)] {
            let data = synthetic(60, 6, loss, seed);
            let (_, value) = brute_force(loss, &data, 2, 1.0);
            let fit = highs_driver().solve(loss, &data, 2, 1.0, &options()).unwrap();
            assert_eq!(fit.status, SolverStatus::Optimal);
            assert_near(fit.objective, value, 1e-6 * value.max(1.0));
        }
    }

    #[test]
    fn convenience_entry_point_uses_default_backends() {
        let data = synthetic(60, 5, Loss::LeastSquares, 23);
        let fit = subsetcut::solve(Loss::LeastSquares, data.y(), data.x(), 1, 1.0, &options())
            .unwrap();
        let (best, _) = brute_force(Loss::LeastSquares, &data, 1, 1.0);
        assert_eq!(fit.selected, best.indices());
    }
}
