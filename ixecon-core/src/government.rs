//! Atomic government components and their interactions.
//!
//! A country selects a set of components. Certain pairs reinforce each other
//! (synergy) or work against each other (conflict); every matching rule
//! becomes a permanent [`Modifier`]. Rules are not mutually exclusive: a pair
//! covered by both a synergy and a conflict rule gets both.

use crate::modifiers::{Effect, Modifier, ModifierTarget};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Selectable government building blocks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GovernmentComponent {
    TechnocraticAgency,
    ProfessionalBureaucracy,
    RuleOfLaw,
    IndependentJudiciary,
    FreeMarketSystem,
    PlannedEconomy,
    StateCapitalism,
    MilitaryJunta,
    CentralizedPower,
    FederalSystem,
    DemocraticProcess,
    OligarchicCapture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Synergy,
    Conflict,
}

/// A pairwise interaction rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentRule {
    pub kind: RuleKind,
    pub components: [GovernmentComponent; 2],
    pub target: ModifierTarget,
    pub effect: Effect,
}

impl ComponentRule {
    fn matches(&self, selection: &BTreeSet<GovernmentComponent>) -> bool {
        self.components.iter().all(|c| selection.contains(c))
    }

    fn to_modifier(self) -> Option<Modifier> {
        let built = match self.kind {
            RuleKind::Synergy => Modifier::synergy(self.components, self.target, self.effect),
            RuleKind::Conflict => Modifier::conflict(self.components, self.target, self.effect),
        };
        match built {
            Ok(m) => Some(m),
            Err(e) => {
                log::error!("Rule {:?} produced an invalid modifier: {}", self.components, e);
                None
            }
        }
    }
}

const fn rule(
    kind: RuleKind,
    a: GovernmentComponent,
    b: GovernmentComponent,
    target: ModifierTarget,
    effect: Effect,
) -> ComponentRule {
    ComponentRule {
        kind,
        components: [a, b],
        target,
        effect,
    }
}

use GovernmentComponent::*;
use ModifierTarget::{GrowthRate, Inflation, Unemployment};
use RuleKind::{Conflict, Synergy};

/// Built-in interaction table.
#[rustfmt::skip]
pub const COMPONENT_RULES: &[ComponentRule] = &[
    rule(Synergy, TechnocraticAgency, ProfessionalBureaucracy, GrowthRate, Effect::Multiplicative(1.15)),
    rule(Synergy, RuleOfLaw, IndependentJudiciary, GrowthRate, Effect::Multiplicative(1.10)),
    rule(Synergy, FreeMarketSystem, RuleOfLaw, GrowthRate, Effect::Multiplicative(1.12)),
    rule(Synergy, DemocraticProcess, IndependentJudiciary, GrowthRate, Effect::Multiplicative(1.05)),
    rule(Synergy, PlannedEconomy, CentralizedPower, GrowthRate, Effect::Multiplicative(1.08)),
    rule(Synergy, StateCapitalism, TechnocraticAgency, GrowthRate, Effect::Multiplicative(1.10)),
    rule(Synergy, MilitaryJunta, CentralizedPower, GrowthRate, Effect::Multiplicative(1.05)),
    rule(Conflict, FreeMarketSystem, PlannedEconomy, GrowthRate, Effect::Multiplicative(0.85)),
    rule(Conflict, MilitaryJunta, DemocraticProcess, GrowthRate, Effect::Multiplicative(0.80)),
    rule(Conflict, CentralizedPower, FederalSystem, GrowthRate, Effect::Multiplicative(0.90)),
    rule(Conflict, OligarchicCapture, RuleOfLaw, Inflation, Effect::Additive(0.01)),
    rule(Conflict, OligarchicCapture, FreeMarketSystem, GrowthRate, Effect::Multiplicative(0.92)),
    rule(Conflict, MilitaryJunta, CentralizedPower, Unemployment, Effect::Additive(0.01)),
];

/// Permanent modifiers for every rule whose components are all selected.
///
/// Duplicate components in `selection` are ignored.
pub fn derive_modifiers(selection: &[GovernmentComponent]) -> Vec<Modifier> {
    derive_with_rules(selection, COMPONENT_RULES)
}

pub fn derive_with_rules(
    selection: &[GovernmentComponent],
    rules: &[ComponentRule],
) -> Vec<Modifier> {
    let selected: BTreeSet<_> = selection.iter().copied().collect();
    rules
        .iter()
        .filter(|r| r.matches(&selected))
        .filter_map(|r| r.to_modifier())
        .collect()
}
