//! Engine constants.
//!
//! Defaults for [`crate::config::GrowthConfig`] and the fixed shape of the
//! cyclical and auxiliary-indicator rules.

/// Simulated time constants
pub mod time {
    /// Milliseconds in a simulated year (365.25 days).
    pub const MS_PER_YEAR: f64 = 365.25 * 24.0 * 60.0 * 60.0 * 1000.0;

    /// Real instant at which the default clock starts (2020-10-04T00:00:00Z).
    pub const REAL_EPOCH_MS: i64 = 1_601_769_600_000;

    /// Simulated instant reached at [`REAL_EPOCH_MS`] (2028-01-01T00:00:00Z).
    pub const SIM_EPOCH_MS: i64 = 1_830_297_600_000;

    /// Initial acceleration of the default clock.
    pub const INITIAL_MULTIPLIER: f64 = 4.0;

    /// Real instant of the 4x -> 2x slowdown (2025-07-27T00:00:00Z).
    pub const SLOWDOWN_REAL_MS: i64 = 1_753_574_400_000;

    /// Multiplier after the slowdown.
    pub const SLOWDOWN_MULTIPLIER: f64 = 2.0;
}

/// Growth-rate constants
pub mod growth {
    /// Process-wide global growth factor (3.21%).
    pub const GLOBAL_GROWTH_FACTOR: f64 = 1.0321;

    /// GDP per capita that catch-up growth converges toward.
    pub const REFERENCE_GDP_PER_CAPITA: f64 = 35_000.0;

    /// Rate added per unit of relative gap to the reference.
    pub const CONVERGENCE_STRENGTH: f64 = 0.02;

    /// GDP per capita above which diminishing returns kick in.
    pub const HIGH_GDP_THRESHOLD: f64 = 60_000.0;

    /// Penalty weight applied to `log2(value/threshold + 1)`.
    pub const DIMINISHING_PENALTY_WEIGHT: f64 = 0.5;

    /// Lowest rate a single step may apply.
    pub const GROWTH_FLOOR: f64 = -0.10;

    /// Annual population growth sanity band.
    pub const POPULATION_MIN_RATE: f64 = -0.05;
    pub const POPULATION_MAX_RATE: f64 = 0.15;
}

/// Cyclical modulation constants
pub mod cycles {
    /// Business cycle period in simulated years.
    pub const BUSINESS_PERIOD_YEARS: f64 = 7.0;
    /// Business cycle amplitude (+/-10%).
    pub const BUSINESS_AMPLITUDE: f64 = 0.10;

    /// Innovation cycle period in simulated years.
    pub const INNOVATION_PERIOD_YEARS: f64 = 20.0;
    /// Innovation cycle amplitude (+/-5%).
    pub const INNOVATION_AMPLITUDE: f64 = 0.05;

    /// Volatility at stability 1.0.
    pub const VOLATILITY_SCALE: f64 = 0.05;

    /// Stability values below this are treated as this.
    pub const MIN_STABILITY: f64 = 0.05;

    /// Clamp band for the combined multiplier.
    pub const MIN_MULTIPLIER: f64 = 0.5;
    pub const MAX_MULTIPLIER: f64 = 1.5;
}

/// Auxiliary indicator constants
pub mod indicators {
    /// Fraction of the inflation gap to target closed per year.
    pub const INFLATION_REVERSION: f64 = 0.3;
    pub const INFLATION_MIN: f64 = -0.05;
    pub const INFLATION_MAX: f64 = 0.5;

    /// Fraction of the unemployment gap to the natural rate closed per year.
    pub const UNEMPLOYMENT_REVERSION: f64 = 0.25;
    /// Okun coefficient: unemployment change per point of above-trend growth.
    pub const OKUN_COEFFICIENT: f64 = 0.5;
    /// Growth rate at which unemployment is stable.
    pub const TREND_GROWTH: f64 = 0.02;
    pub const UNEMPLOYMENT_MIN: f64 = 0.005;
    pub const UNEMPLOYMENT_MAX: f64 = 0.5;
}
