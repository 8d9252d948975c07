//! Batch recalculation across countries.
//!
//! Each country is guarded by its own mutex: modifier edits and the
//! recalculation of that country serialize, while different countries run
//! in parallel on the rayon pool.

use crate::config::GrowthConfig;
use crate::error::{EconError, EconResult};
use crate::metrics::BatchMetrics;
use crate::modifiers::{prune_expired, Modifier};
use crate::profiling::frame_mark_batch;
use crate::recalc::{recalculate, CountryEconomy};
use crate::state::{CountryId, CountryRecord, EconomicState};
use crate::time::SimTime;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::instrument;

/// Why a country needs recomputing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecalcReason {
    ModifiersChanged,
    TimeAdvanced,
    BaselineEdited,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecalcRequest {
    pub country: CountryId,
    pub reason: RecalcReason,
}

impl RecalcRequest {
    pub fn new(country: impl Into<CountryId>, reason: RecalcReason) -> Self {
        Self {
            country: country.into(),
            reason,
        }
    }
}

/// Shared cancellation flag, checked between countries.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Country records, one writer at a time per country.
#[derive(Debug, Default)]
pub struct CountryBook {
    records: HashMap<CountryId, Mutex<CountryRecord>>,
}

impl CountryBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = CountryRecord>) -> Self {
        let mut book = Self::new();
        for record in records {
            book.insert(record);
        }
        book
    }

    /// Adds or replaces a country.
    pub fn insert(&mut self, record: CountryRecord) -> RecalcRequest {
        let id = record.id.clone();
        self.records.insert(id.clone(), Mutex::new(record));
        RecalcRequest::new(id, RecalcReason::BaselineEdited)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Country ids in sorted order.
    pub fn ids(&self) -> Vec<CountryId> {
        let mut ids: Vec<_> = self.records.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Consistent copy of one record.
    pub fn snapshot(&self, id: &str) -> EconResult<CountryRecord> {
        Ok(self.lock(id)?.clone())
    }

    pub fn add_modifier(&self, id: &str, modifier: Modifier) -> EconResult<RecalcRequest> {
        self.lock(id)?.modifiers.push(modifier);
        Ok(RecalcRequest::new(id, RecalcReason::ModifiersChanged))
    }

    pub fn replace_modifiers(
        &self,
        id: &str,
        modifiers: Vec<Modifier>,
    ) -> EconResult<RecalcRequest> {
        self.lock(id)?.modifiers = modifiers;
        Ok(RecalcRequest::new(id, RecalcReason::ModifiersChanged))
    }

    /// Replaces the authored baseline. The state is validated first.
    pub fn update_baseline(
        &self,
        id: &str,
        baseline: EconomicState,
        baseline_time: SimTime,
    ) -> EconResult<RecalcRequest> {
        baseline.validate()?;
        let mut record = self.lock(id)?;
        record.baseline = baseline;
        record.baseline_time = baseline_time;
        Ok(RecalcRequest::new(id, RecalcReason::BaselineEdited))
    }

    fn lock(&self, id: &str) -> EconResult<MutexGuard<'_, CountryRecord>> {
        let cell = self
            .records
            .get(id)
            .ok_or_else(|| EconError::InvalidInput(format!("unknown country {id}")))?;
        // A panic mid-edit leaves at worst a partially pushed modifier list.
        Ok(cell.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// A country the batch could not recompute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedCountry {
    pub country: CountryId,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Successful recalculations, sorted by country.
    pub results: Vec<CountryEconomy>,
    pub skipped: Vec<SkippedCountry>,
    pub cancelled: bool,
    pub metrics: BatchMetrics,
}

enum Outcome {
    Done {
        economy: CountryEconomy,
        pruned: usize,
        elapsed: Duration,
    },
    Failed(CountryId, EconError),
    NotStarted,
}

/// Fans recalculation requests out over the rayon pool.
pub struct Scheduler;

impl Scheduler {
    /// Recomputes every requested country at `now`.
    ///
    /// Requests are de-duplicated per country. Country-local failures are
    /// reported in [`BatchReport::skipped`]; an invalid configuration fails
    /// the whole batch before any country is touched.
    #[instrument(skip_all, name = "recalc_batch")]
    pub fn run(
        book: &CountryBook,
        requests: impl IntoIterator<Item = RecalcRequest>,
        config: &GrowthConfig,
        now: SimTime,
        cancel: &CancelToken,
    ) -> EconResult<BatchReport> {
        config.validate()?;
        let wall_start = Instant::now();

        let mut requested = 0u64;
        let mut pending: BTreeMap<CountryId, Vec<RecalcReason>> = BTreeMap::new();
        for request in requests {
            requested += 1;
            let reasons = pending.entry(request.country).or_default();
            if !reasons.contains(&request.reason) {
                reasons.push(request.reason);
            }
        }
        let work: Vec<_> = pending.into_iter().collect();
        let countries = work.len() as u64;

        let outcomes: Vec<Outcome> = {
            let _span = tracing::info_span!("countries_parallel", count = work.len()).entered();
            work.into_par_iter()
                .map(|(id, reasons)| {
                    if cancel.is_cancelled() {
                        return Outcome::NotStarted;
                    }
                    log::trace!("recalculating {id} ({reasons:?})");
                    recalc_one(book, id, config, now)
                })
                .collect()
        };

        let mut metrics = BatchMetrics {
            batches: 1,
            requested,
            countries,
            ..Default::default()
        };
        let mut results = Vec::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                Outcome::Done {
                    economy,
                    pruned,
                    elapsed,
                } => {
                    metrics.recalculated += 1;
                    metrics.expired_pruned += pruned as u64;
                    metrics.compute_time += elapsed;
                    results.push(economy);
                }
                Outcome::Failed(country, err) if err.is_country_local() => {
                    log::warn!("skipping {country}: {err}");
                    metrics.skipped += 1;
                    skipped.push(SkippedCountry {
                        country,
                        error: err.to_string(),
                    });
                }
                Outcome::Failed(country, err) => {
                    log::error!("batch halted by {country}: {err}");
                    return Err(err);
                }
                Outcome::NotStarted => metrics.not_started += 1,
            }
        }
        metrics.wall_time = wall_start.elapsed();
        let cancelled = metrics.not_started > 0;

        log::info!(
            "batch at {} (config v{}): {} recalculated, {} skipped{}",
            now,
            config.version,
            metrics.recalculated,
            metrics.skipped,
            if cancelled { ", cancelled" } else { "" }
        );
        frame_mark_batch();

        Ok(BatchReport {
            results,
            skipped,
            cancelled,
            metrics,
        })
    }

    /// Recomputes every country in the book.
    pub fn run_all(
        book: &CountryBook,
        config: &GrowthConfig,
        now: SimTime,
        cancel: &CancelToken,
    ) -> EconResult<BatchReport> {
        let requests = book
            .ids()
            .into_iter()
            .map(|id| RecalcRequest::new(id, RecalcReason::TimeAdvanced));
        Self::run(book, requests, config, now, cancel)
    }
}

fn recalc_one(book: &CountryBook, id: CountryId, config: &GrowthConfig, now: SimTime) -> Outcome {
    let start = Instant::now();
    let mut record = match book.lock(&id) {
        Ok(record) => record,
        Err(err) => return Outcome::Failed(id, err),
    };
    // Modifiers that ended before the baseline cannot affect any projection.
    let baseline_time = record.baseline_time;
    let pruned = prune_expired(&mut record.modifiers, baseline_time);
    match recalculate(&record, config, now) {
        Ok(economy) => Outcome::Done {
            economy,
            pruned,
            elapsed: start.elapsed(),
        },
        Err(err) => Outcome::Failed(id, err),
    }
}
