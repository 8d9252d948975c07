//! Cyclical modulation of growth.
//!
//! Two sine waves (a short business cycle and a long innovation cycle) plus
//! bounded volatility. Volatility is drawn from an RNG seeded per country and
//! per simulated year, so replaying a historical instant yields the same
//! multiplier.

use crate::defines::cycles as defines;
use crate::time::SimTime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Shape of the cyclical multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleSettings {
    pub business_period_years: f64,
    pub business_amplitude: f64,
    pub innovation_period_years: f64,
    pub innovation_amplitude: f64,
    /// Volatility half-width at stability 1.0.
    pub volatility_scale: f64,
    pub min_multiplier: f64,
    pub max_multiplier: f64,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            business_period_years: defines::BUSINESS_PERIOD_YEARS,
            business_amplitude: defines::BUSINESS_AMPLITUDE,
            innovation_period_years: defines::INNOVATION_PERIOD_YEARS,
            innovation_amplitude: defines::INNOVATION_AMPLITUDE,
            volatility_scale: defines::VOLATILITY_SCALE,
            min_multiplier: defines::MIN_MULTIPLIER,
            max_multiplier: defines::MAX_MULTIPLIER,
        }
    }
}

/// Mixes a country seed with a time bucket (SplitMix64 finalizer).
pub fn bucket_seed(seed: u64, bucket: i64) -> u64 {
    let mut z = seed ^ (bucket as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Volatility term in `[-scale / stability, scale / stability]`.
fn volatility(years: f64, stability: f64, seed: u64, scale: f64) -> f64 {
    let bucket = years.floor() as i64;
    let mut rng = StdRng::seed_from_u64(bucket_seed(seed, bucket));
    let unit: f64 = rng.gen_range(-1.0..=1.0);
    unit * scale / stability.max(defines::MIN_STABILITY)
}

/// Multiplicative growth adjustment at `time`, clamped to
/// `[settings.min_multiplier, settings.max_multiplier]`.
///
/// Higher `stability` means smaller volatility. Identical inputs always give
/// identical output.
pub fn modulate(time: SimTime, stability: f64, seed: u64, settings: &CycleSettings) -> f64 {
    let years = time.as_years();
    let business =
        settings.business_amplitude * (TAU * years / settings.business_period_years).sin();
    let innovation =
        settings.innovation_amplitude * (TAU * years / settings.innovation_period_years).sin();
    let noise = volatility(years, stability, seed, settings.volatility_scale);

    (1.0 + business + innovation + noise)
        .max(settings.min_multiplier)
        .min(settings.max_multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn quiet() -> CycleSettings {
        CycleSettings {
            volatility_scale: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_deterministic_for_same_inputs() {
        let t = SimTime::parse_rfc3339("2035-03-01T00:00:00Z").unwrap();
        let settings = CycleSettings::default();
        let a = modulate(t, 0.8, 42, &settings);
        let b = modulate(t, 0.8, 42, &settings);
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_year_shares_volatility_draw() {
        let settings = CycleSettings {
            business_amplitude: 0.0,
            innovation_amplitude: 0.0,
            ..Default::default()
        };
        let jan = SimTime::parse_rfc3339("2040-01-10T00:00:00Z").unwrap();
        let feb = SimTime::parse_rfc3339("2040-02-10T00:00:00Z").unwrap();
        assert_eq!(modulate(jan, 1.0, 7, &settings), modulate(feb, 1.0, 7, &settings));
    }

    #[test]
    fn test_seeds_differ() {
        let t = SimTime::parse_rfc3339("2040-06-01T00:00:00Z").unwrap();
        let settings = CycleSettings::default();
        let draws: Vec<f64> = (0..8).map(|s| modulate(t, 1.0, s, &settings)).collect();
        assert!(draws.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn test_pure_waves_at_origin() {
        // sin(0) = 0 for both waves at the Unix epoch.
        assert_eq!(modulate(SimTime::from_millis(0), 1.0, 0, &quiet()), 1.0);
    }

    #[test]
    fn test_business_cycle_peak() {
        let settings = CycleSettings {
            innovation_amplitude: 0.0,
            volatility_scale: 0.0,
            ..Default::default()
        };
        // Quarter period of the 7-year cycle.
        let t = SimTime::from_millis(0).add_years(7.0 / 4.0);
        assert!((modulate(t, 1.0, 0, &settings) - 1.10).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_to_band() {
        let wild = CycleSettings {
            business_amplitude: 5.0,
            ..quiet()
        };
        let peak = SimTime::from_millis(0).add_years(7.0 / 4.0);
        let trough = SimTime::from_millis(0).add_years(21.0 / 4.0);
        assert_eq!(modulate(peak, 1.0, 0, &wild), 1.5);
        assert_eq!(modulate(trough, 1.0, 0, &wild), 0.5);
    }

    #[test]
    fn test_inverted_band_does_not_panic() {
        let inverted = CycleSettings {
            min_multiplier: 1.5,
            max_multiplier: 0.5,
            ..quiet()
        };
        assert_eq!(modulate(SimTime::from_millis(0), 1.0, 0, &inverted), 0.5);
    }

    proptest! {
        #[test]
        fn prop_higher_stability_narrows_volatility(
            seed in any::<u64>(),
            year in 1900.0..2300.0f64,
        ) {
            let noise_only = CycleSettings {
                business_amplitude: 0.0,
                innovation_amplitude: 0.0,
                ..Default::default()
            };
            let t = SimTime::from_millis(0).add_years(year - 1970.0);
            let unstable = (modulate(t, 0.5, seed, &noise_only) - 1.0).abs();
            let stable = (modulate(t, 2.0, seed, &noise_only) - 1.0).abs();
            prop_assert!(stable <= unstable + 1e-12);
            prop_assert!(stable <= 0.05 / 2.0 + 1e-12);
        }

        #[test]
        fn prop_always_within_band(
            seed in any::<u64>(),
            ms in -4_000_000_000_000i64..12_000_000_000_000i64,
            stability in 0.0..5.0f64,
        ) {
            let m = modulate(SimTime::from_millis(ms), stability, seed, &CycleSettings::default());
            prop_assert!((0.5..=1.5).contains(&m));
        }
    }
}
