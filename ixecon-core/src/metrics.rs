use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Accumulated timing and counters for recalculation batches.
#[derive(Default, Clone, Debug, Serialize, Deserialize)]
pub struct BatchMetrics {
    pub batches: u64,
    pub requested: u64,
    /// Unique countries after de-duplication
    pub countries: u64,
    pub recalculated: u64,
    pub skipped: u64,
    /// Countries never started because the batch was cancelled
    pub not_started: u64,
    pub expired_pruned: u64,
    /// Summed per-country compute time (exceeds wall time under rayon)
    pub compute_time: Duration,
    pub wall_time: Duration,
}

impl BatchMetrics {
    pub fn country_avg_ms(&self) -> f64 {
        if self.recalculated == 0 {
            0.0
        } else {
            self.compute_time.as_secs_f64() * 1000.0 / self.recalculated as f64
        }
    }

    pub fn countries_per_second(&self) -> f64 {
        if self.wall_time.as_secs_f64() == 0.0 {
            0.0
        } else {
            self.recalculated as f64 / self.wall_time.as_secs_f64()
        }
    }

    /// Folds another batch's metrics into a running total.
    pub fn merge(&mut self, other: &BatchMetrics) {
        self.batches += other.batches;
        self.requested += other.requested;
        self.countries += other.countries;
        self.recalculated += other.recalculated;
        self.skipped += other.skipped;
        self.not_started += other.not_started;
        self.expired_pruned += other.expired_pruned;
        self.compute_time += other.compute_time;
        self.wall_time += other.wall_time;
    }
}
