use crate::cycles::CycleSettings;
use crate::defines::growth as defines;
use crate::error::{EconError, EconResult};
use crate::tiers::TierTable;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Inclusive annual-rate band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBounds {
    pub min: f64,
    pub max: f64,
}

impl RateBounds {
    pub fn clamp(&self, rate: f64) -> f64 {
        rate.max(self.min).min(self.max)
    }
}

/// Process-wide growth configuration.
///
/// Passed explicitly into every calculation; nothing in the engine reads
/// ambient state. Changing any value means publishing a new version through
/// [`ConfigRegistry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    pub version: u32,
    /// Shared by all countries (1.0321 = +3.21%).
    pub global_growth_factor: f64,
    pub gdp_tiers: TierTable,
    pub population_tiers: TierTable,
    /// Catch-up growth converges toward this GDP per capita.
    pub reference_gdp_per_capita: f64,
    pub convergence_strength: f64,
    /// Diminishing returns apply above this GDP per capita.
    pub high_gdp_threshold: f64,
    /// Lowest GDP-per-capita growth rate a step may apply.
    pub growth_floor: f64,
    pub population_bounds: RateBounds,
    pub cycles: CycleSettings,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            version: 1,
            global_growth_factor: defines::GLOBAL_GROWTH_FACTOR,
            gdp_tiers: TierTable::default_gdp_per_capita(),
            population_tiers: TierTable::default_population(),
            reference_gdp_per_capita: defines::REFERENCE_GDP_PER_CAPITA,
            convergence_strength: defines::CONVERGENCE_STRENGTH,
            high_gdp_threshold: defines::HIGH_GDP_THRESHOLD,
            growth_floor: defines::GROWTH_FLOOR,
            population_bounds: RateBounds {
                min: defines::POPULATION_MIN_RATE,
                max: defines::POPULATION_MAX_RATE,
            },
            cycles: CycleSettings::default(),
        }
    }
}

fn invalid(msg: String) -> EconError {
    EconError::InvalidConfiguration(msg)
}

impl GrowthConfig {
    pub fn from_json_str(json: &str) -> EconResult<Self> {
        let config: GrowthConfig =
            serde_json::from_str(json).map_err(|e| invalid(format!("config parse error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> EconResult<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| invalid(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    /// Checks cross-field consistency. Tier tables validate themselves.
    pub fn validate(&self) -> EconResult<()> {
        let positive = [
            ("reference_gdp_per_capita", self.reference_gdp_per_capita),
            ("high_gdp_threshold", self.high_gdp_threshold),
            (
                "cycles.business_period_years",
                self.cycles.business_period_years,
            ),
            (
                "cycles.innovation_period_years",
                self.cycles.innovation_period_years,
            ),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(invalid(format!("{} must be positive, got {}", name, v)));
            }
        }

        let non_negative = [
            ("global_growth_factor", self.global_growth_factor),
            ("convergence_strength", self.convergence_strength),
            ("cycles.volatility_scale", self.cycles.volatility_scale),
        ];
        for (name, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(invalid(format!("{} must be finite and >= 0, got {}", name, v)));
            }
        }

        if !self.growth_floor.is_finite() || self.growth_floor <= -1.0 {
            return Err(invalid(format!(
                "growth_floor must be finite and > -1, got {}",
                self.growth_floor
            )));
        }

        if let Some(band) = self
            .gdp_tiers
            .bands()
            .iter()
            .find(|b| b.max_growth_rate < self.growth_floor)
        {
            return Err(invalid(format!(
                "growth floor {} exceeds the cap of tier {:?} ({})",
                self.growth_floor, band.label, band.max_growth_rate
            )));
        }

        let pop = self.population_bounds;
        if !(pop.min.is_finite() && pop.max.is_finite() && -1.0 < pop.min && pop.min <= pop.max) {
            return Err(invalid(format!(
                "population bounds [{}, {}] are not a valid range",
                pop.min, pop.max
            )));
        }

        let c = &self.cycles;
        if !(c.min_multiplier.is_finite()
            && c.max_multiplier.is_finite()
            && 0.0 <= c.min_multiplier
            && c.min_multiplier <= c.max_multiplier)
        {
            return Err(invalid(format!(
                "cycle multiplier band [{}, {}] is not a valid range",
                c.min_multiplier, c.max_multiplier
            )));
        }

        Ok(())
    }
}

/// Holder for the live configuration.
///
/// Readers take an `Arc` snapshot and keep it for the duration of their
/// work; [`ConfigRegistry::publish`] swaps in a new version without
/// disturbing them.
#[derive(Debug)]
pub struct ConfigRegistry {
    current: RwLock<Arc<GrowthConfig>>,
}

impl ConfigRegistry {
    pub fn new(config: GrowthConfig) -> EconResult<Self> {
        config.validate()?;
        Ok(Self {
            current: RwLock::new(Arc::new(config)),
        })
    }

    pub fn current(&self) -> Arc<GrowthConfig> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Validates and installs `config` as the next version. Returns the
    /// assigned version number.
    pub fn publish(&self, mut config: GrowthConfig) -> EconResult<u32> {
        config.validate()?;
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        config.version = guard.version + 1;
        let version = config.version;
        log::info!(
            "Publishing growth config v{} (global factor {:.4})",
            version,
            config.global_growth_factor
        );
        *guard = Arc::new(config);
        Ok(version)
    }
}
