//! Trajectories and growth-rate queries.
//!
//! A [`Projection`] describes a run of repeated [`GrowthEngine::advance`]
//! calls over a time range. It never mutates stored state; each call to
//! [`Projection::iter`] replays the run from the start.

use crate::aggregate::aggregate;
use crate::config::GrowthConfig;
use crate::engine::{GrowthEngine, RateTrace};
use crate::error::{EconError, EconResult};
use crate::modifiers::Modifier;
use crate::state::{EconomicState, GrowthParameters, HistoricalSnapshot};
use crate::time::SimTime;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Upper bound on steps in one projection.
pub const MAX_STEPS: usize = 100_000;

/// A lazily evaluated, finite trajectory.
#[derive(Debug, Clone)]
pub struct Projection<'a> {
    engine: GrowthEngine<'a>,
    initial: EconomicState,
    params: GrowthParameters,
    modifiers: &'a [Modifier],
    from: SimTime,
    to: SimTime,
    step_years: f64,
}

impl<'a> Projection<'a> {
    /// Steps of `step_years` from `from` to `to`; the last step is shortened
    /// so the trajectory ends exactly at `to`.
    pub fn new(
        config: &'a GrowthConfig,
        initial: EconomicState,
        params: GrowthParameters,
        modifiers: &'a [Modifier],
        from: SimTime,
        to: SimTime,
        step_years: f64,
    ) -> EconResult<Self> {
        if to < from {
            return Err(EconError::InvalidInput(format!(
                "projection end {} precedes start {}",
                to, from
            )));
        }
        if !step_years.is_finite() || step_years <= 0.0 || from.add_years(step_years) <= from {
            return Err(EconError::InvalidInput(format!(
                "step must be a positive number of years, got {}",
                step_years
            )));
        }
        let steps = (from.years_until(to) / step_years).ceil();
        if steps > MAX_STEPS as f64 {
            return Err(EconError::InvalidInput(format!(
                "projection would take {} steps (max {})",
                steps, MAX_STEPS
            )));
        }

        Ok(Self {
            engine: GrowthEngine::new(config)?,
            initial,
            params,
            modifiers,
            from,
            to,
            step_years,
        })
    }

    pub fn iter(&self) -> ProjectionIter<'_, 'a> {
        ProjectionIter {
            projection: self,
            current: None,
            last_trace: None,
            done: false,
        }
    }

    /// Every snapshot, initial state included.
    #[instrument(skip_all, name = "projection")]
    pub fn snapshots(&self) -> EconResult<Vec<HistoricalSnapshot>> {
        self.iter().collect()
    }

    /// Snapshot at `to`.
    pub fn final_snapshot(&self) -> EconResult<HistoricalSnapshot> {
        let mut last = None;
        for snapshot in self.iter() {
            last = Some(snapshot?);
        }
        // The first item is always produced.
        last.ok_or_else(|| EconError::invalid_state("projection produced no snapshots"))
    }
}

impl<'p, 'a> IntoIterator for &'p Projection<'a> {
    type Item = EconResult<HistoricalSnapshot>;
    type IntoIter = ProjectionIter<'p, 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`Projection`]. Stops after the first error.
#[derive(Debug, Clone)]
pub struct ProjectionIter<'p, 'a> {
    projection: &'p Projection<'a>,
    current: Option<HistoricalSnapshot>,
    last_trace: Option<RateTrace>,
    done: bool,
}

impl ProjectionIter<'_, '_> {
    /// Rates of the most recent step.
    pub fn last_trace(&self) -> Option<&RateTrace> {
        self.last_trace.as_ref()
    }

    fn fail(&mut self, err: EconError) -> Option<EconResult<HistoricalSnapshot>> {
        self.done = true;
        Some(Err(err))
    }
}

impl Iterator for ProjectionIter<'_, '_> {
    type Item = EconResult<HistoricalSnapshot>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let p = self.projection;
        let version = p.engine.config().version;

        let Some(current) = self.current else {
            if let Err(e) = p.initial.validate() {
                return self.fail(e);
            }
            let first = HistoricalSnapshot {
                time: p.from,
                state: p.initial,
                config_version: version,
            };
            self.current = Some(first);
            return Some(Ok(first));
        };

        if current.time >= p.to {
            self.done = true;
            return None;
        }

        let end = current.time.add_years(p.step_years).min(p.to);
        let mut state = current.state;
        let mut start = current.time;
        // Sub-steps between window edges keep the effect set constant.
        for stop in window_edges(p.modifiers, current.time, end) {
            let years = start.years_until(stop);
            let tier = p.engine.config().gdp_tiers.classify(state.gdp_per_capita);
            let effects = aggregate(p.modifiers, start);
            match p
                .engine
                .advance(&state, &p.params, &tier, years, &effects, start)
            {
                Ok(outcome) => {
                    state = outcome.state;
                    self.last_trace = Some(outcome.trace);
                }
                Err(e) => return self.fail(e),
            }
            start = stop;
        }

        let next = HistoricalSnapshot {
            time: end,
            state,
            config_version: version,
        };
        self.current = Some(next);
        Some(Ok(next))
    }
}

/// Modifier window edges strictly inside `(from, to)`, sorted and ending with `to`.
fn window_edges(modifiers: &[Modifier], from: SimTime, to: SimTime) -> Vec<SimTime> {
    let mut edges: Vec<SimTime> = modifiers
        .iter()
        .flat_map(|m| [m.window().start, m.window().end()])
        .flatten()
        .filter(|&t| from < t && t < to)
        .collect();
    edges.push(to);
    edges.sort();
    edges.dedup();
    edges
}

/// Indicator a rate query is computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    GdpPerCapita,
    Population,
    TotalGdp,
}

impl Metric {
    pub fn value(self, state: &EconomicState) -> f64 {
        match self {
            Metric::GdpPerCapita => state.gdp_per_capita,
            Metric::Population => state.population,
            Metric::TotalGdp => state.total_gdp(),
        }
    }
}

/// Compound annual growth rate between two snapshots.
pub fn cagr(a: &HistoricalSnapshot, b: &HistoricalSnapshot, metric: Metric) -> EconResult<f64> {
    if b.time < a.time {
        return Err(EconError::InvalidInput(format!(
            "second snapshot {} precedes first {}",
            b.time, a.time
        )));
    }
    cagr_values(
        metric.value(&a.state),
        metric.value(&b.state),
        a.time.years_until(b.time),
    )
}

/// `(value_b / value_a)^(1 / years) - 1`
pub fn cagr_values(value_a: f64, value_b: f64, years: f64) -> EconResult<f64> {
    if years == 0.0 {
        return Err(EconError::DivisionByZero(
            "CAGR over a zero-length interval".to_string(),
        ));
    }
    if !(value_a.is_finite() && value_a > 0.0) {
        return Err(EconError::InvalidInput(format!(
            "CAGR start value must be positive, got {}",
            value_a
        )));
    }
    if !(value_b.is_finite() && value_b >= 0.0) || !years.is_finite() || years < 0.0 {
        return Err(EconError::InvalidInput(format!(
            "CAGR needs a non-negative end value and interval, got {} over {} years",
            value_b, years
        )));
    }
    Ok((value_b / value_a).powf(1.0 / years) - 1.0)
}

/// Closed-form compound growth.
pub fn compound(value: f64, rate: f64, years: f64) -> f64 {
    value * (1.0 + rate).powf(years)
}

/// Years until `current` reaches `target` growing at `rate`.
///
/// Zero when already there. Fails when the target can never be reached.
pub fn years_to_target(current: f64, target: f64, rate: f64) -> EconResult<f64> {
    if !(current.is_finite() && current > 0.0) || !target.is_finite() {
        return Err(EconError::InvalidInput(format!(
            "years-to-target needs a positive current value, got {}",
            current
        )));
    }
    if target <= current {
        return Ok(0.0);
    }
    if !rate.is_finite() || rate <= 0.0 {
        return Err(EconError::InvalidInput(format!(
            "target {} is unreachable at rate {}",
            target, rate
        )));
    }
    Ok((target / current).ln() / rate.ln_1p())
}
