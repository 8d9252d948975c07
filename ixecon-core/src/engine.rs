//! The growth step.
//!
//! One call to [`GrowthEngine::advance`] moves a country's state forward by
//! `elapsed_years`:
//!
//! ```text
//! rate = cap × global × local × growth_mult + growth_add
//! rate = convergence(rate)          catch-up toward the reference level
//! rate = dampen(rate)               diminishing returns above threshold
//! rate = rate × cycle(t)            business + innovation waves + noise
//! rate = clamp(rate, floor, cap)    the cap holds regardless of modifiers
//! gdp_pc' = gdp_pc × (1 + rate)^years
//! ```
//!
//! Population follows its own bounded rate and is never tier-capped.

use crate::aggregate::EffectSet;
use crate::config::GrowthConfig;
use crate::defines::indicators as defines;
use crate::error::{EconError, EconResult};
use crate::state::{EconomicState, GrowthParameters};
use crate::tiers::Tier;
use crate::time::SimTime;
use crate::{convergence, cycles, dampening};
use serde::Serialize;
use tracing::instrument;

/// Intermediate rates of one step, for auditing and logs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateTrace {
    /// Tier cap the step started from.
    pub base: f64,
    /// After global, local and modifier factors.
    pub modified: f64,
    pub converged: f64,
    pub dampened: f64,
    pub cycle_multiplier: f64,
    /// Rate actually compounded into GDP per capita.
    pub applied: f64,
    pub population_rate: f64,
    /// True when the tier cap (or floor) bound the rate.
    pub clamped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StepOutcome {
    pub state: EconomicState,
    pub trace: RateTrace,
}

/// Composes the rate adjusters under one configuration.
#[derive(Debug, Clone, Copy)]
pub struct GrowthEngine<'a> {
    config: &'a GrowthConfig,
}

impl<'a> GrowthEngine<'a> {
    /// Fails with [`EconError::InvalidConfiguration`] unless `config` validates.
    pub fn new(config: &'a GrowthConfig) -> EconResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &'a GrowthConfig {
        self.config
    }

    /// GDP-per-capita and population tiers of `state`.
    pub fn classify(&self, state: &EconomicState) -> (Tier, Tier) {
        (
            self.config.gdp_tiers.classify(state.gdp_per_capita),
            self.config.population_tiers.classify(state.population),
        )
    }

    /// GDP-per-capita growth rate for a step starting at `at`.
    pub fn growth_rate(
        &self,
        state: &EconomicState,
        params: &GrowthParameters,
        tier: &Tier,
        effects: &EffectSet,
        at: SimTime,
    ) -> RateTrace {
        let cfg = self.config;
        let gdp = state.gdp_per_capita;

        let base = tier.max_growth_rate;
        let modified = base * cfg.global_growth_factor * params.local_growth_factor
            * effects.growth_multiplier()
            + effects.growth_additive();
        let converged = convergence::adjust(
            modified,
            gdp,
            cfg.reference_gdp_per_capita,
            cfg.convergence_strength,
        );
        let dampened = dampening::dampen(converged, gdp, cfg.high_gdp_threshold);
        let cycle_multiplier = cycles::modulate(at, params.stability, params.seed(), &cfg.cycles);
        let cycled = dampened * cycle_multiplier;

        let floor = cfg.growth_floor.min(tier.max_growth_rate);
        let applied = cycled.clamp(floor, tier.max_growth_rate);

        let population_rate = cfg
            .population_bounds
            .clamp(effects.population_growth.apply(params.population_growth_rate));

        RateTrace {
            base,
            modified,
            converged,
            dampened,
            cycle_multiplier,
            applied,
            population_rate,
            clamped: applied != cycled,
        }
    }

    /// Produces the state `elapsed_years` after `state`, with the step's
    /// cyclical term evaluated at `at`.
    ///
    /// Rejects negative elapsed time and invalid indicators with
    /// [`EconError::InvalidState`]; nothing is silently corrected.
    #[instrument(skip_all, name = "advance")]
    pub fn advance(
        &self,
        state: &EconomicState,
        params: &GrowthParameters,
        tier: &Tier,
        elapsed_years: f64,
        effects: &EffectSet,
        at: SimTime,
    ) -> EconResult<StepOutcome> {
        if !elapsed_years.is_finite() || elapsed_years < 0.0 {
            return Err(EconError::invalid_state(format!(
                "elapsed years must be >= 0, got {}",
                elapsed_years
            )));
        }
        state.validate()?;
        params.validate()?;

        let trace = self.growth_rate(state, params, tier, effects, at);

        let gdp_per_capita = state.gdp_per_capita * (1.0 + trace.applied).powf(elapsed_years);
        let population = state.population * (1.0 + trace.population_rate).powf(elapsed_years);

        let inflation_target = effects.inflation.apply(params.inflation_target);
        let inflation_rate = revert(
            state.inflation_rate,
            inflation_target,
            defines::INFLATION_REVERSION,
            elapsed_years,
        )
        .clamp(defines::INFLATION_MIN, defines::INFLATION_MAX);

        let natural = effects.unemployment.apply(params.natural_unemployment);
        let okun =
            defines::OKUN_COEFFICIENT * (trace.applied - defines::TREND_GROWTH) * elapsed_years;
        let unemployment_rate = (revert(
            state.unemployment_rate,
            natural,
            defines::UNEMPLOYMENT_REVERSION,
            elapsed_years,
        ) - okun)
            .clamp(defines::UNEMPLOYMENT_MIN, defines::UNEMPLOYMENT_MAX);

        let next = EconomicState {
            population,
            gdp_per_capita,
            unemployment_rate,
            inflation_rate,
        };

        log::debug!(
            "step {} +{:.2}y tier={} base={:.4} applied={:.4} cycle={:.3} gdp_pc {:.0} -> {:.0}",
            at,
            elapsed_years,
            tier.label,
            trace.base,
            trace.applied,
            trace.cycle_multiplier,
            state.gdp_per_capita,
            next.gdp_per_capita
        );

        Ok(StepOutcome { state: next, trace })
    }
}

/// Moves `value` toward `target`, closing `rate` of the gap per year.
fn revert(value: f64, target: f64, rate: f64, years: f64) -> f64 {
    let closed = 1.0 - (1.0 - rate).powf(years);
    value + (target - value) * closed
}
