//! External modifiers on a country's economy.
//!
//! Modifiers come from government-component synergies and conflicts,
//! administrator ("DM") inputs and discrete economic events. Each one is
//! validated when constructed (or deserialized), so aggregation never has to
//! second-guess its inputs.

use crate::error::{EconError, EconResult};
use crate::government::GovernmentComponent;
use crate::time::SimTime;
use serde::{Deserialize, Serialize};

/// Indicator a modifier acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierTarget {
    GrowthRate,
    PopulationGrowth,
    Inflation,
    Unemployment,
    TaxMultiplier,
}

/// Numeric effect of a modifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Effect {
    /// Scales the field; composes by product.
    Multiplicative(f64),
    /// Added to the field; composes by sum.
    Additive(f64),
}

impl Effect {
    fn validate(&self) -> EconResult<()> {
        match *self {
            Effect::Multiplicative(f) if !f.is_finite() || f < 0.0 => Err(EconError::InvalidInput(
                format!("multiplicative effect must be finite and >= 0, got {}", f),
            )),
            Effect::Additive(a) if !a.is_finite() => Err(EconError::InvalidInput(format!(
                "additive effect must be finite, got {}",
                a
            ))),
            _ => Ok(()),
        }
    }
}

/// Discrete macro events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EconomicEventKind {
    Boom,
    Recession,
    FinancialCrisis,
    TechBreakthrough,
    CommodityShock,
    NaturalDisaster,
}

impl EconomicEventKind {
    /// Default `(target, effect, duration in simulated years)`.
    pub fn default_effect(self) -> (ModifierTarget, Effect, f64) {
        use EconomicEventKind::*;
        use ModifierTarget::*;
        match self {
            Boom => (GrowthRate, Effect::Multiplicative(1.25), 2.0),
            Recession => (GrowthRate, Effect::Multiplicative(0.5), 1.5),
            FinancialCrisis => (GrowthRate, Effect::Additive(-0.02), 2.0),
            TechBreakthrough => (GrowthRate, Effect::Multiplicative(1.15), 5.0),
            CommodityShock => (Inflation, Effect::Additive(0.03), 1.0),
            NaturalDisaster => (GrowthRate, Effect::Multiplicative(0.8), 1.0),
        }
    }
}

/// Where a modifier came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ModifierKind {
    Synergy {
        components: [GovernmentComponent; 2],
    },
    Conflict {
        components: [GovernmentComponent; 2],
    },
    DmInput {
        note: String,
    },
    Event {
        event: EconomicEventKind,
    },
}

/// When a modifier applies. Both ends open means permanent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveWindow {
    /// `None` = active since forever.
    pub start: Option<SimTime>,
    /// Simulated years; `None` = never expires. Requires `start`.
    pub duration_years: Option<f64>,
}

impl ActiveWindow {
    pub const PERMANENT: ActiveWindow = ActiveWindow {
        start: None,
        duration_years: None,
    };

    pub fn starting(start: SimTime, duration_years: Option<f64>) -> Self {
        Self {
            start: Some(start),
            duration_years,
        }
    }

    fn validate(&self) -> EconResult<()> {
        match (self.start, self.duration_years) {
            (None, Some(_)) => Err(EconError::InvalidInput(
                "modifier duration given without a start time".to_string(),
            )),
            (_, Some(d)) if !d.is_finite() || d <= 0.0 => Err(EconError::InvalidInput(format!(
                "modifier duration must be positive, got {}",
                d
            ))),
            _ => Ok(()),
        }
    }

    /// Exclusive end instant, if the window expires.
    pub fn end(&self) -> Option<SimTime> {
        match (self.start, self.duration_years) {
            (Some(start), Some(d)) => Some(start.add_years(d)),
            _ => None,
        }
    }

    /// `start <= time < start + duration`
    pub fn contains(&self, time: SimTime) -> bool {
        self.start.map_or(true, |s| s <= time) && self.end().map_or(true, |e| time < e)
    }
}

/// A validated modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModifier")]
pub struct Modifier {
    kind: ModifierKind,
    target: ModifierTarget,
    effect: Effect,
    window: ActiveWindow,
}

#[derive(Deserialize)]
struct RawModifier {
    kind: ModifierKind,
    target: ModifierTarget,
    effect: Effect,
    #[serde(default)]
    window: ActiveWindow,
}

impl TryFrom<RawModifier> for Modifier {
    type Error = EconError;

    fn try_from(raw: RawModifier) -> Result<Self, Self::Error> {
        Modifier::new(raw.kind, raw.target, raw.effect, raw.window)
    }
}

impl Modifier {
    pub fn new(
        kind: ModifierKind,
        target: ModifierTarget,
        effect: Effect,
        window: ActiveWindow,
    ) -> EconResult<Self> {
        effect.validate()?;
        window.validate()?;
        Ok(Self {
            kind,
            target,
            effect,
            window,
        })
    }

    /// Permanent synergy bonus between two government components.
    pub fn synergy(
        components: [GovernmentComponent; 2],
        target: ModifierTarget,
        effect: Effect,
    ) -> EconResult<Self> {
        Self::new(
            ModifierKind::Synergy { components },
            target,
            effect,
            ActiveWindow::PERMANENT,
        )
    }

    /// Permanent conflict penalty between two government components.
    pub fn conflict(
        components: [GovernmentComponent; 2],
        target: ModifierTarget,
        effect: Effect,
    ) -> EconResult<Self> {
        Self::new(
            ModifierKind::Conflict { components },
            target,
            effect,
            ActiveWindow::PERMANENT,
        )
    }

    /// Administrator adjustment starting at `start`.
    pub fn dm_input(
        note: &str,
        target: ModifierTarget,
        effect: Effect,
        start: SimTime,
        duration_years: Option<f64>,
    ) -> EconResult<Self> {
        Self::new(
            ModifierKind::DmInput {
                note: note.to_string(),
            },
            target,
            effect,
            ActiveWindow::starting(start, duration_years),
        )
    }

    /// Economic event with its default effect and duration.
    pub fn event(event: EconomicEventKind, start: SimTime) -> Self {
        let (target, effect, duration) = event.default_effect();
        Self {
            kind: ModifierKind::Event { event },
            target,
            effect,
            window: ActiveWindow::starting(start, Some(duration)),
        }
    }

    pub fn kind(&self) -> &ModifierKind {
        &self.kind
    }

    pub fn target(&self) -> ModifierTarget {
        self.target
    }

    pub fn effect(&self) -> Effect {
        self.effect
    }

    pub fn window(&self) -> &ActiveWindow {
        &self.window
    }

    pub fn is_active(&self, time: SimTime) -> bool {
        self.window.contains(time)
    }

    pub fn is_expired(&self, time: SimTime) -> bool {
        self.window.end().is_some_and(|end| time >= end)
    }
}

/// Drops modifiers whose window has closed by `time`.
pub fn prune_expired(modifiers: &mut Vec<Modifier>, time: SimTime) -> usize {
    let before = modifiers.len();
    modifiers.retain(|m| !m.is_expired(time));
    before - modifiers.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> SimTime {
        SimTime::parse_rfc3339(s).unwrap()
    }

    #[test]
    fn test_window_bounds_are_half_open() {
        let start = t("2030-01-01T00:00:00Z");
        let m = Modifier::dm_input(
            "stimulus",
            ModifierTarget::GrowthRate,
            Effect::Additive(0.01),
            start,
            Some(1.0),
        )
        .unwrap();

        assert!(!m.is_active(SimTime::from_millis(start.millis() - 1)));
        assert!(m.is_active(start));
        let end = m.window().end().unwrap();
        assert!(m.is_active(SimTime::from_millis(end.millis() - 1)));
        assert!(!m.is_active(end));
        assert!(m.is_expired(end));
    }

    #[test]
    fn test_permanent_window() {
        let m = Modifier::synergy(
            [
                GovernmentComponent::RuleOfLaw,
                GovernmentComponent::IndependentJudiciary,
            ],
            ModifierTarget::GrowthRate,
            Effect::Multiplicative(1.1),
        )
        .unwrap();
        assert!(m.is_active(SimTime::from_millis(i64::MIN / 2)));
        assert!(m.is_active(SimTime::from_millis(i64::MAX / 2)));
        assert!(!m.is_expired(SimTime::from_millis(i64::MAX / 2)));
    }

    #[test]
    fn test_open_ended_start() {
        let m = Modifier::new(
            ModifierKind::DmInput {
                note: "from 2030".into(),
            },
            ModifierTarget::Inflation,
            Effect::Additive(0.01),
            ActiveWindow::starting(t("2030-01-01T00:00:00Z"), None),
        )
        .unwrap();
        assert!(!m.is_active(t("2029-12-31T00:00:00Z")));
        assert!(m.is_active(t("2130-01-01T00:00:00Z")));
    }

    #[test]
    fn test_rejects_invalid_effects() {
        let start = t("2030-01-01T00:00:00Z");
        for effect in [
            Effect::Multiplicative(-1.0),
            Effect::Multiplicative(f64::INFINITY),
            Effect::Additive(f64::NAN),
        ] {
            let err =
                Modifier::dm_input("bad", ModifierTarget::GrowthRate, effect, start, None).unwrap_err();
            assert!(matches!(err, EconError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_rejects_invalid_windows() {
        let start = t("2030-01-01T00:00:00Z");
        assert!(Modifier::dm_input(
            "zero",
            ModifierTarget::GrowthRate,
            Effect::Additive(0.01),
            start,
            Some(0.0)
        )
        .is_err());

        let no_start = ActiveWindow {
            start: None,
            duration_years: Some(2.0),
        };
        assert!(Modifier::new(
            ModifierKind::DmInput { note: "x".into() },
            ModifierTarget::GrowthRate,
            Effect::Additive(0.01),
            no_start
        )
        .is_err());
    }

    #[test]
    fn test_event_defaults() {
        let start = t("2031-01-01T00:00:00Z");
        let m = Modifier::event(EconomicEventKind::Recession, start);
        assert_eq!(m.target(), ModifierTarget::GrowthRate);
        assert_eq!(m.effect(), Effect::Multiplicative(0.5));
        assert!(m.is_active(t("2032-01-01T00:00:00Z")));
        assert!(!m.is_active(t("2033-01-01T00:00:00Z")));
    }

    #[test]
    fn test_prune_expired() {
        let start = t("2030-01-01T00:00:00Z");
        let mut mods = vec![
            Modifier::event(EconomicEventKind::Boom, start),
            Modifier::event(EconomicEventKind::TechBreakthrough, start),
        ];
        let removed = prune_expired(&mut mods, t("2033-01-01T00:00:00Z"));
        assert_eq!(removed, 1);
        assert_eq!(
            mods[0].kind(),
            &ModifierKind::Event {
                event: EconomicEventKind::TechBreakthrough
            }
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let good = r#"{
            "kind": {"type": "dm_input", "note": "tax holiday"},
            "target": "growth_rate",
            "effect": {"kind": "additive", "value": 0.01},
            "window": {"start": 1900000000000, "duration_years": 2.0}
        }"#;
        let m: Modifier = serde_json::from_str(good).unwrap();
        assert_eq!(m.effect(), Effect::Additive(0.01));

        let bad = r#"{
            "kind": {"type": "event", "event": "boom"},
            "target": "growth_rate",
            "effect": {"kind": "multiplicative", "value": -3.0}
        }"#;
        assert!(serde_json::from_str::<Modifier>(bad).is_err());
    }
}
