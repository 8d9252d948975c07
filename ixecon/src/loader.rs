use anyhow::{Context, Result};
use ixecon_core::{CountryBook, CountryRecord, GrowthConfig};
use std::path::Path;

/// Reads a JSON array of country records.
pub fn load_countries(path: &Path) -> Result<Vec<CountryRecord>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading countries from {}", path.display()))?;
    let records: Vec<CountryRecord> = serde_json::from_str(&json)
        .with_context(|| format!("parsing countries in {}", path.display()))?;
    for record in &records {
        record
            .baseline
            .validate()
            .with_context(|| format!("baseline of {} in {}", record.id, path.display()))?;
    }
    log::debug!("Loaded {} countries from {}", records.len(), path.display());
    Ok(records)
}

pub fn load_book(path: &Path) -> Result<CountryBook> {
    Ok(CountryBook::from_records(load_countries(path)?))
}

/// The given config file, or the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<GrowthConfig> {
    match path {
        Some(path) => GrowthConfig::from_path(path)
            .with_context(|| format!("loading growth config {}", path.display())),
        None => Ok(GrowthConfig::default()),
    }
}
