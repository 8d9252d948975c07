use crate::error::{EconError, EconResult};
use crate::government::GovernmentComponent;
use crate::modifiers::Modifier;
use crate::time::SimTime;
use serde::{Deserialize, Serialize};

pub type CountryId = String;

/// Scalar economic snapshot of one country.
///
/// Total GDP is always derived from population and GDP per capita; it is
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicState {
    pub population: f64,
    pub gdp_per_capita: f64,
    /// Fraction of the labour force, 0.05 = 5%.
    pub unemployment_rate: f64,
    /// Annual rate, 0.02 = 2%. May be slightly negative (deflation).
    pub inflation_rate: f64,
}

impl EconomicState {
    pub fn new(
        population: f64,
        gdp_per_capita: f64,
        unemployment_rate: f64,
        inflation_rate: f64,
    ) -> EconResult<Self> {
        let state = Self {
            population,
            gdp_per_capita,
            unemployment_rate,
            inflation_rate,
        };
        state.validate()?;
        Ok(state)
    }

    pub fn total_gdp(&self) -> f64 {
        self.population * self.gdp_per_capita
    }

    /// Rejects non-finite values and negative population, GDP per capita
    /// or unemployment.
    pub fn validate(&self) -> EconResult<()> {
        let checks = [
            ("population", self.population, true),
            ("gdp_per_capita", self.gdp_per_capita, true),
            ("unemployment_rate", self.unemployment_rate, true),
            ("inflation_rate", self.inflation_rate, false),
        ];
        for (name, value, non_negative) in checks {
            if !value.is_finite() {
                return Err(EconError::invalid_state(format!(
                    "{} is not finite ({})",
                    name, value
                )));
            }
            if non_negative && value < 0.0 {
                return Err(EconError::invalid_state(format!(
                    "{} is negative ({})",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Per-country growth constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthParameters {
    /// Scales the tier base rate; 1.0 is neutral.
    pub local_growth_factor: f64,
    /// Higher values damp volatility. Must be > 0.
    pub stability: f64,
    /// Baseline annual population growth.
    pub population_growth_rate: f64,
    pub inflation_target: f64,
    pub natural_unemployment: f64,
    /// Volatility seed. Derived from the country id when absent.
    pub seed: Option<u64>,
}

impl Default for GrowthParameters {
    fn default() -> Self {
        Self {
            local_growth_factor: 1.0,
            stability: 1.0,
            population_growth_rate: 0.01,
            inflation_target: 0.02,
            natural_unemployment: 0.05,
            seed: None,
        }
    }
}

impl GrowthParameters {
    pub fn validate(&self) -> EconResult<()> {
        if !self.local_growth_factor.is_finite() || self.local_growth_factor < 0.0 {
            return Err(EconError::InvalidInput(format!(
                "local growth factor must be >= 0, got {}",
                self.local_growth_factor
            )));
        }
        if !self.stability.is_finite() || self.stability <= 0.0 {
            return Err(EconError::InvalidInput(format!(
                "stability must be > 0, got {}",
                self.stability
            )));
        }
        for (name, v) in [
            ("population_growth_rate", self.population_growth_rate),
            ("inflation_target", self.inflation_target),
            ("natural_unemployment", self.natural_unemployment),
        ] {
            if !v.is_finite() {
                return Err(EconError::InvalidInput(format!("{} is not finite", name)));
            }
        }
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_default()
    }
}

/// Stable seed from a country id (FNV-1a).
pub fn seed_for(id: &str) -> u64 {
    id.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ b as u64).wrapping_mul(0x0100_0000_01b3)
    })
}

/// A recorded point of a country's trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSnapshot {
    pub time: SimTime,
    pub state: EconomicState,
    /// Version of the [`crate::config::GrowthConfig`] that produced it.
    pub config_version: u32,
}

/// Baseline record of a country as stored by the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub id: CountryId,
    pub name: String,
    pub baseline: EconomicState,
    /// Simulated instant the baseline describes.
    pub baseline_time: SimTime,
    #[serde(default)]
    pub params: GrowthParameters,
    /// GDP tier table the baseline was authored against.
    pub tier_table_version: u32,
    #[serde(default)]
    pub government: Vec<GovernmentComponent>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl CountryRecord {
    /// Parameters with the seed resolved from the id when unset.
    pub fn growth_params(&self) -> GrowthParameters {
        GrowthParameters {
            seed: Some(self.params.seed.unwrap_or_else(|| seed_for(&self.id))),
            ..self.params.clone()
        }
    }
}
