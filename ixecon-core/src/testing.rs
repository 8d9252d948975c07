use crate::defines::time::SIM_EPOCH_MS;
use crate::government::GovernmentComponent;
use crate::modifiers::Modifier;
use crate::state::{CountryRecord, EconomicState, GrowthParameters};
use crate::time::SimTime;

/// Builder for country records in tests and demos.
pub struct CountryBuilder {
    record: CountryRecord,
}

impl CountryBuilder {
    /// A mid-income country of 10M at the start of the IxTime calendar.
    pub fn new(id: &str) -> Self {
        Self {
            record: CountryRecord {
                id: id.to_string(),
                name: id.to_string(),
                baseline: EconomicState {
                    population: 10_000_000.0,
                    gdp_per_capita: 20_000.0,
                    unemployment_rate: 0.05,
                    inflation_rate: 0.02,
                },
                baseline_time: SimTime::from_millis(SIM_EPOCH_MS),
                params: GrowthParameters::default(),
                tier_table_version: 1,
                government: Vec::new(),
                modifiers: Vec::new(),
            },
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.record.name = name.to_string();
        self
    }

    pub fn population(mut self, population: f64) -> Self {
        self.record.baseline.population = population;
        self
    }

    pub fn gdp_per_capita(mut self, gdp_per_capita: f64) -> Self {
        self.record.baseline.gdp_per_capita = gdp_per_capita;
        self
    }

    pub fn baseline_time(mut self, time: SimTime) -> Self {
        self.record.baseline_time = time;
        self
    }

    pub fn params(mut self, params: GrowthParameters) -> Self {
        self.record.params = params;
        self
    }

    pub fn tier_table_version(mut self, version: u32) -> Self {
        self.record.tier_table_version = version;
        self
    }

    pub fn government(mut self, components: &[GovernmentComponent]) -> Self {
        self.record.government = components.to_vec();
        self
    }

    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.record.modifiers.push(modifier);
        self
    }

    pub fn build(self) -> CountryRecord {
        self.record
    }
}
