//! Folding active modifiers into one effect per field.

use crate::modifiers::{Effect, Modifier, ModifierTarget};
use crate::time::SimTime;
use serde::{Deserialize, Serialize};

/// Combined effect on one field: `value * multiplier + additive`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldEffect {
    pub multiplier: f64,
    pub additive: f64,
}

impl FieldEffect {
    pub const IDENTITY: FieldEffect = FieldEffect {
        multiplier: 1.0,
        additive: 0.0,
    };

    pub fn apply(&self, value: f64) -> f64 {
        value * self.multiplier + self.additive
    }

    fn compose(&mut self, effect: Effect) {
        match effect {
            Effect::Multiplicative(f) => self.multiplier *= f,
            Effect::Additive(a) => self.additive += a,
        }
    }
}

impl Default for FieldEffect {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Per-field effects of every modifier active at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectSet {
    pub growth_rate: FieldEffect,
    pub population_growth: FieldEffect,
    pub inflation: FieldEffect,
    pub unemployment: FieldEffect,
    pub tax_multiplier: FieldEffect,
    /// Number of modifiers folded in.
    pub active_count: usize,
}

impl EffectSet {
    pub fn field(&self, target: ModifierTarget) -> &FieldEffect {
        match target {
            ModifierTarget::GrowthRate => &self.growth_rate,
            ModifierTarget::PopulationGrowth => &self.population_growth,
            ModifierTarget::Inflation => &self.inflation,
            ModifierTarget::Unemployment => &self.unemployment,
            ModifierTarget::TaxMultiplier => &self.tax_multiplier,
        }
    }

    fn field_mut(&mut self, target: ModifierTarget) -> &mut FieldEffect {
        match target {
            ModifierTarget::GrowthRate => &mut self.growth_rate,
            ModifierTarget::PopulationGrowth => &mut self.population_growth,
            ModifierTarget::Inflation => &mut self.inflation,
            ModifierTarget::Unemployment => &mut self.unemployment,
            ModifierTarget::TaxMultiplier => &mut self.tax_multiplier,
        }
    }

    pub fn growth_multiplier(&self) -> f64 {
        self.growth_rate.multiplier
    }

    pub fn growth_additive(&self) -> f64 {
        self.growth_rate.additive
    }
}

/// Combines every modifier active at `time`.
///
/// Multiplicative effects on the same field multiply, additive effects sum.
/// No de-duplication happens: overlapping synergy and conflict rules all
/// contribute.
pub fn aggregate<'a, I>(modifiers: I, time: SimTime) -> EffectSet
where
    I: IntoIterator<Item = &'a Modifier>,
{
    let mut set = EffectSet::default();
    for m in modifiers.into_iter().filter(|m| m.is_active(time)) {
        set.field_mut(m.target()).compose(m.effect());
        set.active_count += 1;
    }
    set
}
