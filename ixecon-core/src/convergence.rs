//! Catch-up growth.
//!
//! Economies below the reference level get a boost proportional to their
//! relative gap; economies above get a symmetric drag. Capping to the tier
//! limit is left to the engine.

/// Adjusts `rate` by `gap / reference * strength`.
///
/// The drag above the reference never pushes the result below
/// `min(rate, 0)`. A non-positive reference disables the adjustment.
pub fn adjust(rate: f64, value: f64, reference: f64, strength: f64) -> f64 {
    if reference <= 0.0 {
        return rate;
    }
    let relative_gap = (reference - value) / reference;
    if relative_gap >= 0.0 {
        rate + relative_gap * strength
    } else {
        (rate + relative_gap * strength).max(rate.min(0.0))
    }
}
