//! Diminishing returns above a high-income threshold.
//!
//! ```text
//! penalty  = log2(value / threshold + 1)
//! adjusted = rate / (1 + penalty * 0.5)
//! ```

use crate::defines::growth::DIMINISHING_PENALTY_WEIGHT;

/// Dampens `rate` once `value` exceeds `threshold`. At or below the
/// threshold the rate is returned unchanged.
///
/// The divisor is always > 1 above the threshold, so a non-negative rate
/// stays non-negative and shrinks as `value` grows.
pub fn dampen(rate: f64, value: f64, threshold: f64) -> f64 {
    if value <= threshold || threshold <= 0.0 {
        return rate;
    }
    let penalty = (value / threshold + 1.0).log2();
    rate / (1.0 + penalty * DIMINISHING_PENALTY_WEIGHT)
}
