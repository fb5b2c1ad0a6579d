//! Thread budget discovery.
//!
//! An explicit setting wins. Otherwise `SUBSETCUT_THREADS` is consulted, then
//! the CPU allocation of a SLURM job, and finally 0, which leaves the choice
//! to the solver backend.

use tracing::warn;

/// Environment variable overriding the thread count.
pub const THREADS_VAR: &str = "SUBSETCUT_THREADS";

/// CPUs allocated per node by the SLURM scheduler.
pub const SLURM_CPUS_VAR: &str = "SLURM_JOB_CPUS_PER_NODE";

/// Resolve the worker thread count from the process environment.
#[must_use]
pub fn resolve_threads(explicit: Option<usize>) -> usize {
    resolve_threads_with(explicit, |name| std::env::var(name).ok(), num_cpus::get())
}

/// Resolve against an arbitrary variable lookup and CPU count.
pub fn resolve_threads_with(
    explicit: Option<usize>,
    lookup: impl Fn(&str) -> Option<String>,
    available: usize,
) -> usize {
    let requested = explicit
        .or_else(|| lookup(THREADS_VAR).as_deref().and_then(leading_count))
        .or_else(|| lookup(SLURM_CPUS_VAR).as_deref().and_then(leading_count))
        .unwrap_or(0);

    if available > 0 && requested > available {
        warn!(requested, available, "Thread count exceeds available CPUs; clamping");
        available
    } else {
        requested
    }
}

// SLURM reports e.g. "16", "16(x2)" or "8,4"; the first count applies to
// this node.
fn leading_count(raw: &str) -> Option<usize> {
    let digits: String = raw
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}
