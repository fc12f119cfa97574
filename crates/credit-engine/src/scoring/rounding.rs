//! Decimal rounding that matches "round half to even" on the exact binary value.
//!
//! `format!` with a precision rounds the exact decimal expansion of the float, so formatting and
//! parsing back gives the nearest float to the correctly rounded decimal.

pub fn round_to(value: f64, digits: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.digits$}").parse().unwrap_or(value)
}

/// Rounds to the nearest multiple of `quantum` (e.g. the nearest 1000).
pub fn round_to_quantum(value: f64, quantum: f64) -> f64 {
    if quantum <= 0.0 {
        return value;
    }
    round_to(value / quantum, 0) * quantum
}
