//! Terminal output for CLI handlers.
//!
//! Results go to stdout, either as aligned `key value` lines or as a single
//! JSON document for scripting. Logs are written to stderr by the tracing
//! subscriber and never mix with these.

use std::fmt::Display;

use crate::domain::SparseFit;

const LABEL_WIDTH: usize = 10;

/// Print one aligned field.
pub fn field(label: &str, value: impl Display) {
    println!("{label:<LABEL_WIDTH$} {value}");
}

/// Print a success line.
pub fn success(message: &str) {
    println!("✓ {message}");
}

/// Print a fit for humans.
pub fn fit(fit: &SparseFit) {
    field("status", fit.status);
    field("selected", format_args!("{:?}", fit.selected));
    field("weights", format_args!("{}", format_weights(&fit.weights)));
    field("objective", format_args!("{:.6}", fit.objective));
    field("bound", format_args!("{:.6}", fit.bound));
    match fit.gap {
        Some(gap) => field("gap", format_args!("{:.4}%", gap * 100.0)),
        None => field("gap", "n/a"),
    }
    field("cuts", fit.cut_count);
    field("elapsed", format_args!("{:.3}s", fit.elapsed.as_secs_f64()));
}

/// Print a fit as pretty JSON.
///
/// # Errors
///
/// Returns a serialization error; non-finite bounds are written as `null`.
pub fn fit_json(fit: &SparseFit) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(fit)?);
    Ok(())
}

fn format_weights(weights: &[f64]) -> String {
    let parts: Vec<String> = weights.iter().map(|w| format!("{w:.4}")).collect();
    format!("[{}]", parts.join(", "))
}
