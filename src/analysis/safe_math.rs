//! Division that never produces infinities or `NaN`.
//!
//! Every ratio in the engine goes through these helpers. A zero denominator, or any
//! non-finite quotient, yields the caller's fallback instead of the raw IEEE result.

/// Divide `numerator` by `denominator`, returning `None` when the denominator is zero or
/// the quotient is not finite.
#[must_use]
pub fn divide(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }

    let quotient = numerator / denominator;
    quotient.is_finite().then_some(quotient)
}

/// Like [`divide`], with an explicit fallback value.
#[must_use]
pub fn divide_or(numerator: f64, denominator: f64, default: f64) -> f64 {
    divide(numerator, denominator).unwrap_or(default)
}

/// Like [`divide`], propagating undefined operands.
#[must_use]
pub fn divide_opt(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    divide(numerator?, denominator?)
}

/// Elementwise [`divide_or`] over aligned `(numerator, denominator)` pairs.
pub fn divide_each<I>(pairs: I, default: f64) -> impl Iterator<Item = f64>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    pairs.into_iter().map(move |(n, d)| divide_or(n, d, default))
}
