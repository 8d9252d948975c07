//! Recalculating one country from its baseline record.

use crate::aggregate::aggregate;
use crate::config::GrowthConfig;
use crate::engine::RateTrace;
use crate::error::{EconError, EconResult};
use crate::government::derive_modifiers;
use crate::modifiers::Modifier;
use crate::projection::Projection;
use crate::state::{CountryId, CountryRecord, EconomicState, HistoricalSnapshot};
use crate::tiers::Tier;
use crate::time::SimTime;
use serde::Serialize;

/// Granularity of baseline-to-now recalculation, in simulated years.
pub const RECALC_STEP_YEARS: f64 = 1.0;

/// Current economy of a country, ready for persistence or display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryEconomy {
    pub country: CountryId,
    pub time: SimTime,
    pub state: EconomicState,
    pub total_gdp: f64,
    pub gdp_tier: Tier,
    pub population_tier: Tier,
    /// Rates of the final step; `None` when no time has passed.
    pub last_trace: Option<RateTrace>,
    /// Product of tax-multiplier modifiers active at `time`, 1.0 when none.
    pub tax_multiplier: f64,
    pub config_version: u32,
}

/// Record modifiers plus those derived from the government selection.
pub fn effective_modifiers(record: &CountryRecord) -> Vec<Modifier> {
    let mut modifiers = record.modifiers.clone();
    modifiers.extend(derive_modifiers(&record.government));
    modifiers
}

fn check_record(record: &CountryRecord, config: &GrowthConfig, to: SimTime) -> EconResult<()> {
    if record.tier_table_version != config.gdp_tiers.version() {
        return Err(EconError::InvalidInput(format!(
            "{} was authored against tier table v{}, config has v{}",
            record.id,
            record.tier_table_version,
            config.gdp_tiers.version()
        )));
    }
    if to < record.baseline_time {
        return Err(EconError::invalid_state(format!(
            "{}: requested time {} precedes baseline {}",
            record.id, to, record.baseline_time
        )));
    }
    record.params.validate()
}

/// Advances `record` from its baseline to `now`.
pub fn recalculate(
    record: &CountryRecord,
    config: &GrowthConfig,
    now: SimTime,
) -> EconResult<CountryEconomy> {
    check_record(record, config, now)?;
    let modifiers = effective_modifiers(record);
    let projection = Projection::new(
        config,
        record.baseline,
        record.growth_params(),
        &modifiers,
        record.baseline_time,
        now,
        RECALC_STEP_YEARS,
    )?;

    let mut iter = projection.iter();
    let mut last = None;
    for snapshot in iter.by_ref() {
        last = Some(snapshot?);
    }
    let last_trace = iter.last_trace().copied();
    let snapshot =
        last.ok_or_else(|| EconError::invalid_state(format!("{}: empty projection", record.id)))?;

    let state = snapshot.state;
    let tax_multiplier = aggregate(&modifiers, now).tax_multiplier.apply(1.0);
    log::debug!(
        "{} recalculated to {}: gdp/capita {:.0}, population {:.0}",
        record.id,
        now,
        state.gdp_per_capita,
        state.population
    );

    Ok(CountryEconomy {
        country: record.id.clone(),
        time: now,
        state,
        total_gdp: state.total_gdp(),
        gdp_tier: config.gdp_tiers.classify(state.gdp_per_capita),
        population_tier: config.population_tiers.classify(state.population),
        last_trace,
        tax_multiplier,
        config_version: config.version,
    })
}

/// Trajectory of `record` from its baseline to `to` for charting.
pub fn history(
    record: &CountryRecord,
    config: &GrowthConfig,
    to: SimTime,
    step_years: f64,
) -> EconResult<Vec<HistoricalSnapshot>> {
    check_record(record, config, to)?;
    let modifiers = effective_modifiers(record);
    Projection::new(
        config,
        record.baseline,
        record.growth_params(),
        &modifiers,
        record.baseline_time,
        to,
        step_years,
    )?
    .snapshots()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::government::GovernmentComponent;
    use crate::modifiers::{Effect, ModifierTarget};
    use crate::testing::CountryBuilder;

    fn t(s: &str) -> SimTime {
        SimTime::parse_rfc3339(s).unwrap()
    }

    #[test]
    fn test_recalculate_at_baseline_is_identity() {
        let record = CountryBuilder::new("kiravia").build();
        let config = GrowthConfig::default();
        let econ = recalculate(&record, &config, record.baseline_time).unwrap();
        assert_eq!(econ.state, record.baseline);
        assert!(econ.last_trace.is_none());
        assert_eq!(econ.total_gdp, record.baseline.total_gdp());
    }

    #[test]
    fn test_recalculate_grows_and_labels_tiers() {
        let record = CountryBuilder::new("kiravia")
            .gdp_per_capita(9_000.0)
            .population(45_000_000.0)
            .build();
        let config = GrowthConfig::default();
        let now = record.baseline_time.add_years(3.0);
        let econ = recalculate(&record, &config, now).unwrap();

        assert!(econ.state.gdp_per_capita > 9_000.0);
        assert!(econ.state.gdp_per_capita <= 9_000.0 * 1.10f64.powi(3));
        assert_eq!(econ.population_tier.label, "Tier 3");
        assert!(econ.last_trace.is_some());
        assert_eq!(econ.time, now);
    }

    #[test]
    fn test_time_before_baseline_is_invalid_state() {
        let record = CountryBuilder::new("kiravia").build();
        let err = recalculate(&record, &GrowthConfig::default(), t("2000-01-01T00:00:00Z"))
            .unwrap_err();
        assert!(matches!(err, EconError::InvalidState { .. }));
    }

    #[test]
    fn test_stale_tier_version_rejected() {
        let record = CountryBuilder::new("kiravia").tier_table_version(7).build();
        let err = recalculate(&record, &GrowthConfig::default(), record.baseline_time)
            .unwrap_err();
        assert!(matches!(err, EconError::InvalidInput(_)));
    }

    #[test]
    fn test_government_modifiers_included() {
        let record = CountryBuilder::new("kiravia")
            .government(&[
                GovernmentComponent::MilitaryJunta,
                GovernmentComponent::DemocraticProcess,
            ])
            .modifier(Modifier::event(
                crate::modifiers::EconomicEventKind::Boom,
                t("2030-01-01T00:00:00Z"),
            ))
            .build();
        assert_eq!(effective_modifiers(&record).len(), 2);
    }

    #[test]
    fn test_tax_multiplier_reported_while_active() {
        let start = CountryBuilder::new("kiravia").build().baseline_time;
        let record = CountryBuilder::new("kiravia")
            .modifier(
                Modifier::dm_input(
                    "tax reform",
                    ModifierTarget::TaxMultiplier,
                    Effect::Multiplicative(1.2),
                    start,
                    Some(2.0),
                )
                .unwrap(),
            )
            .modifier(
                Modifier::dm_input(
                    "tariff surcharge",
                    ModifierTarget::TaxMultiplier,
                    Effect::Additive(0.05),
                    start,
                    None,
                )
                .unwrap(),
            )
            .build();
        let config = GrowthConfig::default();

        let during = recalculate(&record, &config, start.add_years(1.0)).unwrap();
        assert!((during.tax_multiplier - 1.25).abs() < 1e-12);
        let after = recalculate(&record, &config, start.add_years(3.0)).unwrap();
        assert!((after.tax_multiplier - 1.05).abs() < 1e-12);

        let plain = CountryBuilder::new("kiravia").build();
        assert_eq!(recalculate(&plain, &config, start).unwrap().tax_multiplier, 1.0);
    }

    #[test]
    fn test_inverted_population_bounds_is_config_error() {
        let record = CountryBuilder::new("kiravia").build();
        let config = GrowthConfig {
            population_bounds: crate::config::RateBounds {
                min: 0.1,
                max: -0.1,
            },
            ..GrowthConfig::default()
        };
        let err = recalculate(&record, &config, record.baseline_time.add_years(1.0)).unwrap_err();
        assert!(matches!(err, EconError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_history_matches_recalculate_endpoint() {
        let record = CountryBuilder::new("kiravia").build();
        let config = GrowthConfig::default();
        let to = record.baseline_time.add_years(4.0);
        let snaps = history(&record, &config, to, RECALC_STEP_YEARS).unwrap();
        let econ = recalculate(&record, &config, to).unwrap();
        assert_eq!(snaps.last().unwrap().state, econ.state);
        assert_eq!(snaps.len(), 5);
    }
}
