//! # IxEcon Core
//!
//! Deterministic economic growth engine for the IxTime calendar.
//!
//! Countries are stored as an authored baseline plus modifiers. Their current
//! economy is always recomputed from that baseline: `(baseline, modifiers,
//! config, time) -> state`. The same inputs give the same result.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ TimeAuthority│────▶│  Projection  │────▶│ GrowthEngine │
//! │ (real → sim) │     │ (lazy steps) │     │  (one step)  │
//! └──────────────┘     └──────┬───────┘     └──────┬───────┘
//!                             │                    │ tiers, convergence,
//!                     ┌───────▼──────┐             │ dampening, cycles
//!                     │  Modifiers   │─────────────┘
//!                     │ (EffectSet)  │
//!                     └──────────────┘
//!
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ CountryBook  │────▶│  Scheduler   │────▶│ BatchReport  │
//! │ (per-country │     │ (rayon fan-  │     │ (results +   │
//! │   mutexes)   │     │    out)      │     │  skipped)    │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! ## Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`TimeAuthority`] | Maps real time to simulated time across multiplier changes |
//! | [`GrowthConfig`] | Versioned tuning: tier tables, global factor, cycles |
//! | [`GrowthEngine`] | Pure function: `(state, effects, elapsed) -> state` |
//! | [`Projection`] | Restartable lazy iterator of [`HistoricalSnapshot`]s |
//! | [`Modifier`] | Time-windowed effect from government, events or DM input |
//! | [`Scheduler`] | Parallel recalculation of many countries |
//!
//! ## Determinism
//!
//! Cyclical volatility draws from a [`rand::rngs::StdRng`] seeded with the
//! country seed and the simulated year, so re-running a projection yields
//! bit-identical snapshots.

pub mod aggregate;
pub mod batch;
pub mod config;
pub mod convergence;
pub mod cycles;
pub mod dampening;
pub mod defines;
pub mod engine;
pub mod error;
pub mod government;
pub mod metrics;
pub mod modifiers;
pub mod profiling;
pub mod projection;
pub mod recalc;
pub mod state;
pub mod testing;
pub mod tiers;
pub mod time;


pub use aggregate::{aggregate, EffectSet, FieldEffect};
pub use batch::{
    BatchReport, CancelToken, CountryBook, RecalcReason, RecalcRequest, Scheduler, SkippedCountry,
};
pub use config::{ConfigRegistry, GrowthConfig, RateBounds};
pub use cycles::CycleSettings;
pub use engine::{GrowthEngine, RateTrace, StepOutcome};
pub use error::{EconError, EconResult};
pub use government::{derive_modifiers, GovernmentComponent};
pub use metrics::BatchMetrics;
pub use modifiers::{
    prune_expired, ActiveWindow, EconomicEventKind, Effect, Modifier, ModifierKind,
    ModifierTarget,
};
pub use projection::{cagr, cagr_values, compound, years_to_target, Metric, Projection};
pub use recalc::{history, recalculate, CountryEconomy};
pub use state::{CountryId, CountryRecord, EconomicState, GrowthParameters, HistoricalSnapshot};
pub use tiers::{Tier, TierBand, TierTable};
pub use time::{Multiplier, RealTime, SimTime, TimeAuthority};
