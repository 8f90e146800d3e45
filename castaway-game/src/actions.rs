//! Day actions: catalog data plus the single place their effects are applied.
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::{ConfigError, check_probability};
use crate::constants::{
    EXPLORE_ENERGY_COST, FISH_ENERGY_COST, FISH_PAYOUT_MAX, FISH_PAYOUT_MIN, FISH_SUCCESS_CHANCE,
    GAUGE_MAX, LOG_EXPLORE_EVENT, LOG_EXPLORE_QUIET, LOG_FISH_CATCH, LOG_FISH_MISS,
    LOG_FORAGE_CATCH, LOG_FORAGE_MISS, LOG_SLEEP, LOG_TOO_EXHAUSTED, LOG_WATER_FOUND,
    LOG_WATER_MISSED, SLEEP_ENERGY_GAIN, SLEEP_HUNGER_COST, SLEEP_THIRST_COST, WATER_ENERGY_COST,
    WATER_PAYOUT_MAX, WATER_PAYOUT_MIN, WATER_SUCCESS_CHANCE,
};
use crate::events::{ChoiceSelector, EventOutcome, EventTable};
use crate::rng::RandomSource;
use crate::vitals::{Gauge, GaugeDeltas, VitalState};

/// Stable identifier of a day action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    Fish,
    SearchWater,
    Sleep,
    Explore,
}

impl ActionId {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Fish => "fish",
            Self::SearchWater => "search_water",
            Self::Sleep => "sleep",
            Self::Explore => "explore",
        }
    }

    /// Parse a stable key; accepts `-` or `_` separators, any case.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fish" => Some(Self::Fish),
            "search_water" => Some(Self::SearchWater),
            "sleep" => Some(Self::Sleep),
            "explore" => Some(Self::Explore),
            _ => None,
        }
    }
}

impl std::fmt::Display for ActionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// What performing an action does once its energy cost is paid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionEffect {
    /// Roll `chance`; on success restore `gauge` by a uniform amount in `[min, max]`.
    Forage {
        chance: f32,
        gauge: Gauge,
        min: i32,
        max: i32,
    },
    /// Deterministic recovery that costs food and water.
    Rest {
        energy: i32,
        hunger_cost: i32,
        thirst_cost: i32,
    },
    /// One event draw, applied immediately.
    Explore,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDef {
    pub id: ActionId,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub energy_cost: i32,
    pub effect: ActionEffect,
}

/// Result of one `apply` call, for the presentation layer to render.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub action: ActionId,
    /// False when the player lacked the energy; nothing changed.
    pub available: bool,
    pub succeeded: bool,
    /// Payout rolled on a successful forage.
    pub amount: Option<i32>,
    pub deltas: GaugeDeltas,
    pub tag: &'static str,
    /// Event resolved while exploring.
    pub event: Option<EventOutcome>,
}

impl ActionOutcome {
    const fn unavailable(action: ActionId) -> Self {
        Self {
            action,
            available: false,
            succeeded: false,
            amount: None,
            deltas: GaugeDeltas {
                hunger: 0,
                thirst: 0,
                energy: 0,
            },
            tag: LOG_TOO_EXHAUSTED,
            event: None,
        }
    }
}

/// The ordered set of actions offered every day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCatalog {
    pub actions: Vec<ActionDef>,
}

impl Default for ActionCatalog {
    fn default() -> Self {
        Self::default_catalog()
    }
}

impl ActionCatalog {
    /// Fish, search for water, sleep, explore.
    #[must_use]
    pub fn default_catalog() -> Self {
        Self {
            actions: vec![
                ActionDef {
                    id: ActionId::Fish,
                    label: "Fish".to_string(),
                    description: "Try to catch fish".to_string(),
                    energy_cost: FISH_ENERGY_COST,
                    effect: ActionEffect::Forage {
                        chance: FISH_SUCCESS_CHANCE,
                        gauge: Gauge::Hunger,
                        min: FISH_PAYOUT_MIN,
                        max: FISH_PAYOUT_MAX,
                    },
                },
                ActionDef {
                    id: ActionId::SearchWater,
                    label: "Search for water".to_string(),
                    description: "Look for a water source".to_string(),
                    energy_cost: WATER_ENERGY_COST,
                    effect: ActionEffect::Forage {
                        chance: WATER_SUCCESS_CHANCE,
                        gauge: Gauge::Thirst,
                        min: WATER_PAYOUT_MIN,
                        max: WATER_PAYOUT_MAX,
                    },
                },
                ActionDef {
                    id: ActionId::Sleep,
                    label: "Sleep".to_string(),
                    description: "Rest to recover energy".to_string(),
                    energy_cost: 0,
                    effect: ActionEffect::Rest {
                        energy: SLEEP_ENERGY_GAIN,
                        hunger_cost: SLEEP_HUNGER_COST,
                        thirst_cost: SLEEP_THIRST_COST,
                    },
                },
                ActionDef {
                    id: ActionId::Explore,
                    label: "Explore".to_string(),
                    description: "Explore the surroundings (random event)".to_string(),
                    energy_cost: EXPLORE_ENERGY_COST,
                    effect: ActionEffect::Explore,
                },
            ],
        }
    }

    /// Load a catalog from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the catalog is invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let catalog: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check ids, costs, chances, and payout ranges.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for action in &self.actions {
            if !seen.insert(action.id) {
                return Err(ConfigError::DuplicateId {
                    kind: "action",
                    id: action.id.key().to_string(),
                });
            }
            if !(0..=GAUGE_MAX).contains(&action.energy_cost) {
                return Err(ConfigError::RangeViolation {
                    field: "energy_cost",
                    min: 0,
                    max: GAUGE_MAX,
                    value: action.energy_cost,
                });
            }
            if let ActionEffect::Forage {
                chance, min, max, ..
            } = &action.effect
            {
                check_probability("forage.chance", *chance)?;
                if min > max {
                    return Err(ConfigError::PayoutBounds {
                        id: action.id.key().to_string(),
                        min: *min,
                        max: *max,
                    });
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn actions(&self) -> &[ActionDef] {
        &self.actions
    }

    #[must_use]
    pub fn get(&self, id: ActionId) -> Option<&ActionDef> {
        self.actions.iter().find(|action| action.id == id)
    }

    /// Resolve raw input: a 1-based menu number or a stable key.
    #[must_use]
    pub fn lookup(&self, input: &str) -> Option<&ActionDef> {
        let trimmed = input.trim();
        if let Ok(number) = trimmed.parse::<usize>() {
            return number
                .checked_sub(1)
                .and_then(|idx| self.actions.get(idx));
        }
        ActionId::from_key(trimmed).and_then(|id| self.get(id))
    }

    /// 1-based menu key of an action in this catalog.
    #[must_use]
    pub fn menu_key(&self, id: ActionId) -> Option<usize> {
        self.actions
            .iter()
            .position(|action| action.id == id)
            .map(|idx| idx + 1)
    }

    #[must_use]
    pub const fn is_available(action: &ActionDef, state: &VitalState) -> bool {
        state.energy >= action.energy_cost
    }

    /// Apply one action to the player.
    ///
    /// An unavailable action leaves `state` untouched. Otherwise the energy cost
    /// is paid before any roll, so it is spent even when the attempt fails.
    pub fn apply<S, R>(
        action: &ActionDef,
        state: &mut VitalState,
        events: &EventTable,
        selector: &mut S,
        rng: &mut R,
    ) -> ActionOutcome
    where
        S: ChoiceSelector + ?Sized,
        R: RandomSource + ?Sized,
    {
        if !Self::is_available(action, state) {
            debug!(
                "action {} unavailable: energy {} < cost {}",
                action.id, state.energy, action.energy_cost
            );
            return ActionOutcome::unavailable(action.id);
        }

        let before = state.clone();
        state.adjust_energy(-action.energy_cost);

        let (succeeded, amount, tag, event) = match &action.effect {
            ActionEffect::Forage {
                chance,
                gauge,
                min,
                max,
            } => {
                let (catch_tag, miss_tag) = forage_tags(action.id);
                if rng.chance(*chance) {
                    let amount = rng.range_inclusive(*min, *max);
                    state.adjust(*gauge, amount);
                    (true, Some(amount), catch_tag, None)
                } else {
                    (false, None, miss_tag, None)
                }
            }
            ActionEffect::Rest {
                energy,
                hunger_cost,
                thirst_cost,
            } => {
                state.adjust_energy(*energy);
                state.adjust_hunger(-*hunger_cost);
                state.adjust_thirst(-*thirst_cost);
                (true, None, LOG_SLEEP, None)
            }
            ActionEffect::Explore => match events.draw_event(rng) {
                Some(event) => {
                    let outcome = EventTable::apply_event(event, state, selector, rng);
                    (true, None, LOG_EXPLORE_EVENT, Some(outcome))
                }
                None => (true, None, LOG_EXPLORE_QUIET, None),
            },
        };

        debug!(
            "action {} succeeded={} amount={:?} tag={}",
            action.id, succeeded, amount, tag
        );
        ActionOutcome {
            action: action.id,
            available: true,
            succeeded,
            amount,
            deltas: GaugeDeltas::between(&before, state),
            tag,
            event,
        }
    }
}

const fn forage_tags(id: ActionId) -> (&'static str, &'static str) {
    match id {
        ActionId::Fish => (LOG_FISH_CATCH, LOG_FISH_MISS),
        ActionId::SearchWater => (LOG_WATER_FOUND, LOG_WATER_MISSED),
        ActionId::Sleep | ActionId::Explore => (LOG_FORAGE_CATCH, LOG_FORAGE_MISS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventDef;

    /// Plays back scripted unit rolls and range results in order.
    struct Script {
        units: Vec<f32>,
        ranges: Vec<i32>,
    }

    impl RandomSource for Script {
        fn unit(&mut self) -> f32 {
            self.units.remove(0)
        }

        fn range_inclusive(&mut self, min: i32, max: i32) -> i32 {
            self.ranges.remove(0).clamp(min, max)
        }
    }

    fn script(units: &[f32], ranges: &[i32]) -> Script {
        Script {
            units: units.to_vec(),
            ranges: ranges.to_vec(),
        }
    }

    fn flee(_event: &EventDef) -> String {
        "1".to_string()
    }

    fn run(id: ActionId, state: &mut VitalState, rng: &mut Script) -> ActionOutcome {
        let catalog = ActionCatalog::default_catalog();
        let events = EventTable::default_table();
        let action = catalog.get(id).unwrap();
        ActionCatalog::apply(action, state, &events, &mut flee, rng)
    }

    #[test]
    fn catalog_order_and_lookup() {
        let catalog = ActionCatalog::default_catalog();
        let ids: Vec<ActionId> = catalog.actions().iter().map(|a| a.id).collect();
        assert_eq!(
            ids,
            [
                ActionId::Fish,
                ActionId::SearchWater,
                ActionId::Sleep,
                ActionId::Explore
            ]
        );
        assert_eq!(catalog.lookup("1").unwrap().id, ActionId::Fish);
        assert_eq!(catalog.lookup(" 4 ").unwrap().id, ActionId::Explore);
        assert_eq!(catalog.lookup("Search-Water").unwrap().id, ActionId::SearchWater);
        assert!(catalog.lookup("0").is_none());
        assert!(catalog.lookup("5").is_none());
        assert!(catalog.lookup("swim").is_none());
        assert_eq!(catalog.menu_key(ActionId::Sleep), Some(3));
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn fish_success_restores_hunger() {
        let mut state = VitalState::default();
        let outcome = run(ActionId::Fish, &mut state, &mut script(&[0.1], &[30]));
        assert!(outcome.available && outcome.succeeded);
        assert_eq!(outcome.amount, Some(30));
        assert_eq!((state.hunger, state.energy), (100, 85));
        assert_eq!(outcome.deltas.hunger, 30);
        assert_eq!(outcome.tag, LOG_FISH_CATCH);
    }

    #[test]
    fn fish_failure_still_costs_energy() {
        let mut state = VitalState::default();
        let outcome = run(ActionId::Fish, &mut state, &mut script(&[0.7], &[]));
        assert!(outcome.available);
        assert!(!outcome.succeeded);
        assert_eq!((state.hunger, state.energy), (70, 85));
        assert_eq!(outcome.tag, LOG_FISH_MISS);
    }

    #[test]
    fn fish_and_water_unavailable_below_cost() {
        let mut state = VitalState {
            energy: 14,
            ..VitalState::default()
        };
        let snapshot = state.clone();
        let outcome = run(ActionId::Fish, &mut state, &mut script(&[], &[]));
        assert!(!outcome.available);
        assert!(outcome.deltas.is_zero());
        assert_eq!(state, snapshot);

        state.energy = 9;
        let snapshot = state.clone();
        let outcome = run(ActionId::SearchWater, &mut state, &mut script(&[], &[]));
        assert!(!outcome.available);
        assert_eq!(outcome.tag, LOG_TOO_EXHAUSTED);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn exact_cost_is_enough() {
        let mut state = VitalState {
            energy: 10,
            ..VitalState::default()
        };
        let outcome = run(ActionId::SearchWater, &mut state, &mut script(&[0.0], &[25]));
        assert!(outcome.available);
        assert_eq!(state.energy, 0);
        assert_eq!(state.thirst, 95);
    }

    #[test]
    fn water_payout_within_range() {
        let mut state = VitalState {
            thirst: 10,
            ..VitalState::default()
        };
        run(ActionId::SearchWater, &mut state, &mut script(&[0.79], &[40]));
        assert_eq!(state.thirst, 50);
        assert_eq!(state.energy, 90);
    }

    #[test]
    fn sleep_deltas_are_fixed() {
        for (hunger, thirst, energy) in [(85, 80, 0), (70, 70, 100), (10, 5, 60), (15, 20, 49)] {
            let mut state = VitalState {
                hunger,
                thirst,
                energy,
                ..VitalState::default()
            };
            let outcome = run(ActionId::Sleep, &mut state, &mut script(&[], &[]));
            assert_eq!(state.energy, energy + 50_i32.min(100 - energy));
            assert_eq!(state.hunger, hunger - 15_i32.min(hunger));
            assert_eq!(state.thirst, thirst - 20_i32.min(thirst));
            assert!(outcome.succeeded);
            assert_eq!(outcome.tag, LOG_SLEEP);
        }
    }

    #[test]
    fn explore_quiet_only_costs_energy() {
        let mut state = VitalState::default();
        let outcome = run(ActionId::Explore, &mut state, &mut script(&[0.2], &[]));
        assert_eq!(state.energy, 90);
        assert!(outcome.event.is_none());
        assert_eq!(outcome.tag, LOG_EXPLORE_QUIET);
    }

    #[test]
    fn explore_applies_drawn_event() {
        let mut state = VitalState::default();
        // not quiet, then weighted roll lands on the boar; selector flees
        let outcome = run(ActionId::Explore, &mut state, &mut script(&[0.9, 0.25], &[]));
        let event = outcome.event.expect("event drawn");
        assert_eq!(event.event_id, "boar");
        assert_eq!(state.energy, 75);
        assert_eq!(outcome.deltas.energy, -25);
    }

    #[test]
    fn explore_unavailable_when_drained() {
        let mut state = VitalState {
            energy: 5,
            ..VitalState::default()
        };
        let outcome = run(ActionId::Explore, &mut state, &mut script(&[], &[]));
        assert!(!outcome.available);
        assert_eq!(state.energy, 5);
    }

    #[test]
    fn inverted_payout_is_rejected() {
        let mut catalog = ActionCatalog::default_catalog();
        catalog.actions[0].effect = ActionEffect::Forage {
            chance: 0.5,
            gauge: Gauge::Hunger,
            min: 40,
            max: 10,
        };
        assert!(matches!(
            catalog.validate(),
            Err(ConfigError::PayoutBounds { .. })
        ));
    }

    #[test]
    fn catalog_json_roundtrip() {
        let json = serde_json::to_string_pretty(&ActionCatalog::default_catalog()).unwrap();
        assert!(json.contains("\"search_water\""));
        let parsed = ActionCatalog::from_json(&json).unwrap();
        assert_eq!(parsed, ActionCatalog::default_catalog());
    }
}
