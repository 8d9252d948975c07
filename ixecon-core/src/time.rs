//! Simulated time ("IxTime").
//!
//! The in-game clock runs at a fixed multiple of real elapsed time from an
//! anchor. An administrator may change the multiplier; every change starts a
//! new [`ClockSegment`] at the real instant it takes effect, so instants
//! mapped before the change keep their simulated value.
//!
//! ```text
//! sim = segment.sim_start + (real - segment.real_start) * segment.multiplier
//! ```

use crate::defines::time as defines;
use crate::error::{EconError, EconResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! millis_instant {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub const fn from_millis(ms: i64) -> Self {
                Self(ms)
            }

            pub const fn millis(self) -> i64 {
                self.0
            }

            pub fn from_datetime(dt: DateTime<Utc>) -> Self {
                Self(dt.timestamp_millis())
            }

            /// `None` only for instants outside chrono's representable range.
            pub fn to_datetime(self) -> Option<DateTime<Utc>> {
                DateTime::<Utc>::from_timestamp_millis(self.0)
            }

            pub fn parse_rfc3339(s: &str) -> EconResult<Self> {
                DateTime::parse_from_rfc3339(s)
                    .map(|dt| Self::from_datetime(dt.with_timezone(&Utc)))
                    .map_err(|e| EconError::InvalidInput(format!("bad timestamp {:?}: {}", s, e)))
            }

            /// Years since 1970-01-01 on this clock.
            pub fn as_years(self) -> f64 {
                self.0 as f64 / defines::MS_PER_YEAR
            }

            /// Signed years from `self` to `later`.
            pub fn years_until(self, later: Self) -> f64 {
                later.0.saturating_sub(self.0) as f64 / defines::MS_PER_YEAR
            }

            pub fn add_years(self, years: f64) -> Self {
                Self(
                    self.0
                        .saturating_add((years * defines::MS_PER_YEAR).round() as i64),
                )
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self.to_datetime() {
                    Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%SZ")),
                    None => write!(f, "{}ms", self.0),
                }
            }
        }
    };
}

millis_instant!(
    /// A wall-clock instant, milliseconds since the Unix epoch.
    RealTime
);

millis_instant!(
    /// An in-game instant, milliseconds since 1970-01-01 on the simulated calendar.
    SimTime
);

impl RealTime {
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }
}

/// Clock acceleration. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Multiplier(f64);

impl Multiplier {
    pub fn new(value: f64) -> EconResult<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(EconError::InvalidConfiguration(format!(
                "time multiplier must be positive, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

/// `sim = epoch_anchor + (real - reference_real) * multiplier`
pub fn simulated_time(
    real: RealTime,
    epoch_anchor: SimTime,
    reference_real: RealTime,
    multiplier: Multiplier,
) -> SimTime {
    let elapsed = real.millis().saturating_sub(reference_real.millis()) as f64;
    SimTime::from_millis(
        epoch_anchor
            .millis()
            .saturating_add((elapsed * multiplier.get()).round() as i64),
    )
}

/// Inverse of [`simulated_time`].
pub fn real_time(
    sim: SimTime,
    epoch_anchor: SimTime,
    reference_real: RealTime,
    multiplier: Multiplier,
) -> RealTime {
    let elapsed = sim.millis().saturating_sub(epoch_anchor.millis()) as f64;
    RealTime::from_millis(
        reference_real
            .millis()
            .saturating_add((elapsed / multiplier.get()).round() as i64),
    )
}

/// One constant-multiplier stretch of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClockSegment {
    pub real_start: RealTime,
    pub sim_start: SimTime,
    pub multiplier: Multiplier,
}

/// Maps real time to simulated time and back.
///
/// Holds configuration only; every query is a pure function of its argument.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAuthority {
    /// Non-empty, ordered by `real_start`.
    segments: Vec<ClockSegment>,
}

impl TimeAuthority {
    pub fn new(reference_real: RealTime, epoch_anchor: SimTime, multiplier: Multiplier) -> Self {
        Self {
            segments: vec![ClockSegment {
                real_start: reference_real,
                sim_start: epoch_anchor,
                multiplier,
            }],
        }
    }

    /// The IxTime clock: 4x from 2020-10-04 (sim 2028-01-01), 2x from 2025-07-27.
    pub fn ixtime() -> Self {
        let mut authority = Self::new(
            RealTime::from_millis(defines::REAL_EPOCH_MS),
            SimTime::from_millis(defines::SIM_EPOCH_MS),
            Multiplier(defines::INITIAL_MULTIPLIER),
        );
        authority.segments.push(ClockSegment {
            real_start: RealTime::from_millis(defines::SLOWDOWN_REAL_MS),
            sim_start: authority.simulated(RealTime::from_millis(defines::SLOWDOWN_REAL_MS)),
            multiplier: Multiplier(defines::SLOWDOWN_MULTIPLIER),
        });
        authority
    }

    pub fn segments(&self) -> &[ClockSegment] {
        &self.segments
    }

    pub fn current_multiplier(&self) -> Multiplier {
        self.last().multiplier
    }

    fn last(&self) -> &ClockSegment {
        // segments is never empty
        &self.segments[self.segments.len() - 1]
    }

    /// Simulated instant for `real`. Instants before the first segment are
    /// extrapolated with its multiplier.
    pub fn simulated(&self, real: RealTime) -> SimTime {
        let idx = self
            .segments
            .partition_point(|s| s.real_start <= real)
            .saturating_sub(1);
        let seg = &self.segments[idx];
        simulated_time(real, seg.sim_start, seg.real_start, seg.multiplier)
    }

    /// Real instant at which the clock shows `sim`.
    pub fn real(&self, sim: SimTime) -> RealTime {
        let idx = self
            .segments
            .partition_point(|s| s.sim_start <= sim)
            .saturating_sub(1);
        let seg = &self.segments[idx];
        real_time(sim, seg.sim_start, seg.real_start, seg.multiplier)
    }

    pub fn now(&self) -> SimTime {
        self.simulated(RealTime::now())
    }

    /// Simulated years elapsed between two real instants.
    pub fn years_between(&self, from: RealTime, to: RealTime) -> f64 {
        self.simulated(from).years_until(self.simulated(to))
    }

    /// Administrative multiplier change taking effect at `at`.
    ///
    /// Appends a segment; only instants after `at` are affected. `at` must be
    /// strictly after the current segment start.
    pub fn change_multiplier(&mut self, at: RealTime, multiplier: Multiplier) -> EconResult<()> {
        let last = *self.last();
        if at <= last.real_start {
            return Err(EconError::InvalidConfiguration(format!(
                "multiplier change at {} must follow the current segment start {}",
                at, last.real_start
            )));
        }

        let sim_start = self.simulated(at);
        self.segments.push(ClockSegment {
            real_start: at,
            sim_start,
            multiplier,
        });

        log::info!(
            "Clock multiplier set to {}x from {} (sim {})",
            multiplier.get(),
            at,
            self.simulated(at)
        );
        Ok(())
    }
}

impl Default for TimeAuthority {
    fn default() -> Self {
        Self::ixtime()
    }
}
