use std::sync::Arc;

use subsetcut::adapter::outbound::RidgeOracle;
use subsetcut::application::{OuterApproximation, SyntheticSpec};
use subsetcut::domain::{Dataset, Loss, Support};
use subsetcut::port::outbound::oracle::ConvexOracle;
use subsetcut::testkit::ExhaustiveSolver;

/// Gaussian design with features 0 and 3 informative.
pub fn synthetic(n: usize, p: usize, loss: Loss, seed: u64) -> Dataset {
    SyntheticSpec {
        n,
        p,
        informative: vec![0, 3],
        seed,
        ..SyntheticSpec::default()
    }
    .generate(loss)
    .expect("valid synthetic recipe")
}

/// Driver using brute-force enumeration for the master.
pub fn exhaustive_driver(threads: usize) -> OuterApproximation {
    let ridge = Arc::new(RidgeOracle::default());
    OuterApproximation::new(Arc::new(ExhaustiveSolver::new(threads)), ridge.clone(), ridge)
}

/// Driver using HiGHS for the master.
#[cfg(feature = "highs")]
pub fn highs_driver() -> OuterApproximation {
    use subsetcut::adapter::outbound::HighsSolver;

    let ridge = Arc::new(RidgeOracle::default());
    OuterApproximation::new(Arc::new(HighsSolver::new()), ridge.clone(), ridge)
}

/// Every support of size at most `k`, smallest bitmask first.
pub fn supports_up_to(p: usize, k: usize) -> Vec<Support> {
    (0..1usize << p)
        .map(|mask| {
            let idx: Vec<usize> = (0..p).filter(|j| mask & (1 << j) != 0).collect();
            Support::from_indices(p, &idx).expect("indices in range")
        })
        .filter(|s| s.len() <= k)
        .collect()
}

/// Exact optimum by evaluating the ridge oracle at every admissible support.
pub fn brute_force(loss: Loss, data: &Dataset, k: usize, gamma: f64) -> (Support, f64) {
    let oracle = RidgeOracle::default();
    supports_up_to(data.n_features(), k)
        .into_iter()
        .map(|s| {
            let value = oracle
                .evaluate(loss, data, &s, gamma)
                .expect("oracle evaluates")
                .value;
            (s, value)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .expect("at least the empty support")
}
