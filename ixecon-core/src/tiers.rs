//! Tier classification.
//!
//! A [`TierTable`] is an ordered list of bands keyed by inclusive lower bound.
//! The first band extends down to negative infinity and the last band up to
//! positive infinity, so every finite value lands in exactly one band.
//! Tables are validated once at construction; classification cannot fail.

use crate::error::{EconError, EconResult};
use serde::{Deserialize, Serialize};

/// One row of a tier table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBand {
    pub label: String,
    /// Inclusive lower bound. Ignored for the first band.
    pub lower_bound: f64,
    /// Maximum permitted annual growth rate (0.05 = 5%).
    pub max_growth_rate: f64,
}

impl TierBand {
    pub fn new(label: &str, lower_bound: f64, max_growth_rate: f64) -> Self {
        Self {
            label: label.to_string(),
            lower_bound,
            max_growth_rate,
        }
    }
}

/// Result of classifying a value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tier {
    /// Position in the table, 0 = lowest band.
    pub index: usize,
    pub label: String,
    /// `None` for the open-ended lowest band.
    pub lower_bound: Option<f64>,
    /// Exclusive upper bound; `None` for the open-ended highest band.
    pub upper_bound: Option<f64>,
    pub max_growth_rate: f64,
}

impl Tier {
    /// A single-band tier with an explicit cap, for direct engine calls.
    pub fn with_cap(label: &str, max_growth_rate: f64) -> Self {
        Self {
            index: 0,
            label: label.to_string(),
            lower_bound: None,
            upper_bound: None,
            max_growth_rate,
        }
    }
}

/// Validated, versioned tier table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTierTable")]
pub struct TierTable {
    version: u32,
    bands: Vec<TierBand>,
}

#[derive(Deserialize)]
struct RawTierTable {
    version: u32,
    bands: Vec<TierBand>,
}

impl TryFrom<RawTierTable> for TierTable {
    type Error = EconError;

    fn try_from(raw: RawTierTable) -> Result<Self, Self::Error> {
        TierTable::new(raw.version, raw.bands)
    }
}

impl TierTable {
    pub fn new(version: u32, bands: Vec<TierBand>) -> EconResult<Self> {
        if bands.is_empty() {
            return Err(EconError::InvalidConfiguration(
                "tier table has no bands".to_string(),
            ));
        }

        for band in &bands {
            if !band.lower_bound.is_finite() || !band.max_growth_rate.is_finite() {
                return Err(EconError::InvalidConfiguration(format!(
                    "tier {:?} has a non-finite bound or rate",
                    band.label
                )));
            }
        }

        if let Some(pair) = bands
            .windows(2)
            .find(|w| w[1].lower_bound <= w[0].lower_bound)
        {
            return Err(EconError::InvalidConfiguration(format!(
                "tier table not strictly ascending: {:?} ({}) followed by {:?} ({})",
                pair[0].label, pair[0].lower_bound, pair[1].label, pair[1].lower_bound
            )));
        }

        Ok(Self { version, bands })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn bands(&self) -> &[TierBand] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Band containing `value`. Boundary values belong to the higher band.
    pub fn classify(&self, value: f64) -> Tier {
        // First band never participates in the search: it is open below.
        let index = self.bands[1..].partition_point(|b| b.lower_bound <= value);
        let band = &self.bands[index];

        Tier {
            index,
            label: band.label.clone(),
            lower_bound: (index > 0).then_some(band.lower_bound),
            upper_bound: self.bands.get(index + 1).map(|b| b.lower_bound),
            max_growth_rate: band.max_growth_rate,
        }
    }

    /// Seven GDP-per-capita bands, Impoverished to Extravagant.
    pub fn default_gdp_per_capita() -> Self {
        Self {
            version: 1,
            bands: vec![
                TierBand::new("Impoverished", 0.0, 0.10),
                TierBand::new("Developing", 10_000.0, 0.075),
                TierBand::new("Developed", 25_000.0, 0.05),
                TierBand::new("Healthy", 35_000.0, 0.035),
                TierBand::new("Strong", 45_000.0, 0.0275),
                TierBand::new("Very Strong", 55_000.0, 0.015),
                TierBand::new("Extravagant", 65_000.0, 0.005),
            ],
        }
    }

    /// Eight population bands. Their caps are informational; population
    /// growth is bounded separately.
    pub fn default_population() -> Self {
        Self {
            version: 1,
            bands: vec![
                TierBand::new("Tier 1", 0.0, 0.15),
                TierBand::new("Tier 2", 10_000_000.0, 0.12),
                TierBand::new("Tier 3", 30_000_000.0, 0.10),
                TierBand::new("Tier 4", 50_000_000.0, 0.08),
                TierBand::new("Tier 5", 80_000_000.0, 0.06),
                TierBand::new("Tier 6", 120_000_000.0, 0.05),
                TierBand::new("Tier 7", 350_000_000.0, 0.04),
                TierBand::new("Tier X", 500_000_000.0, 0.03),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify_interior_values() {
        let table = TierTable::default_gdp_per_capita();
        assert_eq!(table.classify(3_000.0).label, "Impoverished");
        assert_eq!(table.classify(30_000.0).label, "Developed");
        assert_eq!(table.classify(1_000_000.0).label, "Extravagant");
    }

    #[test]
    fn test_boundary_resolves_to_higher_tier() {
        let table = TierTable::default_gdp_per_capita();
        let tier = table.classify(10_000.0);
        assert_eq!(tier.label, "Developing");
        assert_eq!(tier.max_growth_rate, 0.075);
        assert_eq!(tier.lower_bound, Some(10_000.0));
        assert_eq!(tier.upper_bound, Some(25_000.0));
    }

    #[test]
    fn test_open_ended_extremes() {
        let table = TierTable::default_gdp_per_capita();
        let low = table.classify(-50.0);
        assert_eq!(low.index, 0);
        assert_eq!(low.lower_bound, None);

        let high = table.classify(f64::MAX);
        assert_eq!(high.index, 6);
        assert_eq!(high.upper_bound, None);
    }

    #[test]
    fn test_population_table_has_eight_bands() {
        let table = TierTable::default_population();
        assert_eq!(table.len(), 8);
        assert_eq!(table.classify(600_000_000.0).label, "Tier X");
        assert_eq!(table.classify(30_000_000.0).label, "Tier 3");
    }

    #[test]
    fn test_rejects_empty_table() {
        let err = TierTable::new(1, vec![]).unwrap_err();
        assert!(matches!(err, EconError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_rejects_unsorted_table() {
        let err = TierTable::new(
            1,
            vec![
                TierBand::new("a", 0.0, 0.1),
                TierBand::new("b", 500.0, 0.05),
                TierBand::new("c", 100.0, 0.01),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, EconError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_rejects_duplicate_bounds() {
        let err = TierTable::new(
            1,
            vec![TierBand::new("a", 0.0, 0.1), TierBand::new("b", 0.0, 0.05)],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let bad = r#"{"version": 2, "bands": []}"#;
        assert!(serde_json::from_str::<TierTable>(bad).is_err());

        let good = r#"{"version": 2, "bands": [
            {"label": "low", "lower_bound": 0.0, "max_growth_rate": 0.1},
            {"label": "high", "lower_bound": 100.0, "max_growth_rate": 0.02}
        ]}"#;
        let table: TierTable = serde_json::from_str(good).unwrap();
        assert_eq!(table.version(), 2);
        assert_eq!(table.classify(100.0).label, "high");
    }

    proptest! {
        #[test]
        fn prop_classified_band_contains_value(value in -1.0e6..1.0e7f64) {
            let table = TierTable::default_gdp_per_capita();
            let tier = table.classify(value);
            if let Some(lo) = tier.lower_bound {
                prop_assert!(value >= lo);
            }
            if let Some(hi) = tier.upper_bound {
                prop_assert!(value < hi);
            }
        }

        #[test]
        fn prop_tier_index_monotone(a in 0.0..1.0e6f64, b in 0.0..1.0e6f64) {
            let table = TierTable::default_gdp_per_capita();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(table.classify(lo).index <= table.classify(hi).index);
        }
    }
}
