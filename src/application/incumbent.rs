//! Best-known solution and cut counter shared by all separation calls.

use parking_lot::Mutex;

use crate::domain::Support;

/// Owned copy of the incumbent.
#[derive(Debug, Clone, PartialEq)]
pub struct Incumbent {
    pub objective: f64,
    pub support: Support,
}

#[derive(Debug)]
struct TrackerState {
    best_objective: f64,
    best_support: Option<Support>,
    cut_count: u64,
    improvements: u64,
}

/// Incumbent tracker.
///
/// Every read and write of the best objective, best support and cut counter
/// goes through a single mutex, so separation calls arriving from several
/// search threads cannot interleave a comparison with an update.
#[derive(Debug)]
pub struct IncumbentTracker {
    state: Mutex<TrackerState>,
}

impl Default for IncumbentTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl IncumbentTracker {
    /// Tracker with no incumbent (objective `+inf`) and no cuts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TrackerState {
                best_objective: f64::INFINITY,
                best_support: None,
                cut_count: 0,
                improvements: 0,
            }),
        }
    }

    /// Tracker seeded with the initial oracle evaluation, counted as the
    /// first cut.
    #[must_use]
    pub fn seeded(support: Support, objective: f64) -> Self {
        let tracker = Self::new();
        tracker.record_cut();
        tracker.observe(&support, objective);
        tracker
    }

    /// Offer a candidate. Replaces the incumbent iff `objective` is strictly
    /// smaller than the current best; returns whether it did.
    ///
    /// NaN objectives never compare smaller and are ignored.
    pub fn observe(&self, candidate: &Support, objective: f64) -> bool {
        let mut state = self.state.lock();
        if objective < state.best_objective {
            state.best_objective = objective;
            state.best_support = Some(candidate.clone());
            state.improvements += 1;
            true
        } else {
            false
        }
    }

    /// Count one separation call and return the new total.
    pub fn record_cut(&self) -> u64 {
        let mut state = self.state.lock();
        state.cut_count += 1;
        state.cut_count
    }

    #[must_use]
    pub fn cut_count(&self) -> u64 {
        self.state.lock().cut_count
    }

    /// Best objective seen, `+inf` before the first observation.
    #[must_use]
    pub fn best_objective(&self) -> f64 {
        self.state.lock().best_objective
    }

    /// Number of accepted improvements.
    #[must_use]
    pub fn improvements(&self) -> u64 {
        self.state.lock().improvements
    }

    /// Consistent copy of the incumbent, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Incumbent> {
        let state = self.state.lock();
        state.best_support.as_ref().map(|support| Incumbent {
            objective: state.best_objective,
            support: support.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn support(indices: &[usize]) -> Support {
        Support::from_indices(8, indices).unwrap()
    }

    #[test]
    fn observe_requires_strict_improvement() {
        let tracker = IncumbentTracker::new();
        assert!(tracker.snapshot().is_none());

        assert!(tracker.observe(&support(&[0]), 10.0));
        assert!(!tracker.observe(&support(&[1]), 10.0));
        assert!(!tracker.observe(&support(&[2]), 15.0));
        assert!(tracker.observe(&support(&[3]), 5.0));

        let best = tracker.snapshot().unwrap();
        assert_eq!(best.objective, 5.0);
        assert_eq!(best.support, support(&[3]));
        assert_eq!(tracker.improvements(), 2);
    }

    #[test]
    fn nan_is_ignored() {
        let tracker = IncumbentTracker::seeded(support(&[1]), 3.0);
        assert!(!tracker.observe(&support(&[2]), f64::NAN));
        assert_eq!(tracker.best_objective(), 3.0);
    }

    #[test]
    fn seeding_counts_one_cut() {
        let tracker = IncumbentTracker::seeded(support(&[0, 1]), 2.5);
        assert_eq!(tracker.cut_count(), 1);
        assert_eq!(tracker.best_objective(), 2.5);
        assert_eq!(tracker.record_cut(), 2);
    }

    #[test]
    fn best_objective_is_monotone_for_random_sequences() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..50 {
            let tracker = IncumbentTracker::new();
            let mut previous = f64::INFINITY;
            for _ in 0..200 {
                let value: f64 = rng.gen_range(-100.0..100.0);
                let j = rng.gen_range(0..8);
                let improved = tracker.observe(&support(&[j]), value);
                let best = tracker.best_objective();
                assert!(best <= previous);
                assert_eq!(improved, value < previous);
                previous = best;
            }
        }
    }

    #[test]
    fn concurrent_observations_keep_the_minimum() {
        let tracker = IncumbentTracker::new();
        let threads = 8;
        let per_thread = 500;

        std::thread::scope(|scope| {
            for t in 0..threads {
                let tracker = &tracker;
                scope.spawn(move || {
                    // Descending and ascending runs interleave across threads.
                    for i in 0..per_thread {
                        let value = if t % 2 == 0 {
                            (per_thread - i) as f64 + t as f64 / 100.0
                        } else {
                            i as f64 + t as f64 / 100.0
                        };
                        tracker.record_cut();
                        tracker.observe(&support(&[t]), value);
                    }
                });
            }
        });

        assert_eq!(tracker.cut_count(), (threads * per_thread) as u64);
        // Thread 1's first value is 0.01, the global minimum.
        let best = tracker.snapshot().unwrap();
        assert!((best.objective - 0.01).abs() < 1e-12);
        assert_eq!(best.support, support(&[1]));
    }
}
