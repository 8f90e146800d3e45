//! Weighted random events and their effects.
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::{ConfigError, check_probability};
use crate::constants::{
    BOAR_FLEE_ENERGY, BOAR_HUNT_CHANCE, BOAR_HUNT_ENERGY, BOAR_HUNT_FOOD, DEFAULT_CHOICE_KEY,
    EAGLE_REST, EVENT_QUIET_CHANCE, FRUIT_FOOD, LOG_EVENT_APPLIED, LOG_EVENT_FALLBACK,
    LOG_EVENT_RISK_LOST, LOG_EVENT_RISK_WON, RAIN_WATER, SNAKE_ENERGY, SPRING_WATER,
};
use crate::rng::RandomSource;
use crate::vitals::{Gauge, GaugeDeltas, VitalState};

/// A signed change to one gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    pub gauge: Gauge,
    pub amount: i32,
}

impl Adjustment {
    #[must_use]
    pub const fn new(gauge: Gauge, amount: i32) -> Self {
        Self { gauge, amount }
    }
}

/// What an event (or one of its options) does to the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEffect {
    /// Fixed change to one gauge.
    Adjust { gauge: Gauge, amount: i32 },
    /// Pay `cost`, then gain `reward` with probability `chance`.
    Risk {
        cost: Adjustment,
        chance: f32,
        reward: Adjustment,
    },
}

impl EventEffect {
    #[must_use]
    pub const fn adjust(gauge: Gauge, amount: i32) -> Self {
        Self::Adjust { gauge, amount }
    }
}

/// One selectable answer to a choice event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOption {
    pub key: String,
    pub label: String,
    pub effect: EventEffect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    Automatic { effect: EventEffect },
    Choice { options: Vec<EventOption> },
}

/// An entry of the event table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDef {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    pub weight: f32,
    pub kind: EventKind,
}

impl EventDef {
    #[must_use]
    pub const fn is_choice(&self) -> bool {
        matches!(self.kind, EventKind::Choice { .. })
    }

    /// Options for choice events, empty for automatic ones.
    #[must_use]
    pub fn options(&self) -> &[EventOption] {
        match &self.kind {
            EventKind::Choice { options } => options,
            EventKind::Automatic { .. } => &[],
        }
    }
}

/// Presentation hook that answers a choice event with an option key.
pub trait ChoiceSelector {
    fn choose(&mut self, event: &EventDef) -> String;
}

impl<F> ChoiceSelector for F
where
    F: FnMut(&EventDef) -> String,
{
    fn choose(&mut self, event: &EventDef) -> String {
        self(event)
    }
}

/// Result of applying one event, for the presentation layer to render.
#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome {
    pub event_id: String,
    pub label: String,
    /// Option key actually applied, for choice events.
    pub choice: Option<String>,
    /// The selector's answer was unrecognized and the default option ran.
    pub fell_back: bool,
    pub succeeded: bool,
    pub deltas: GaugeDeltas,
    pub tag: &'static str,
}

/// The weighted event pool plus the chance that a draw yields nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTable {
    #[serde(default = "EventTable::default_quiet_chance")]
    pub quiet_chance: f32,
    pub events: Vec<EventDef>,
}

impl Default for EventTable {
    fn default() -> Self {
        Self::default_table()
    }
}

impl EventTable {
    const fn default_quiet_chance() -> f32 {
        EVENT_QUIET_CHANCE
    }

    /// The six events that ship with the game.
    #[must_use]
    pub fn default_table() -> Self {
        let automatic = |id: &str, label: &str, desc: &str, weight: f32, effect: EventEffect| {
            EventDef {
                id: id.to_string(),
                label: label.to_string(),
                description: desc.to_string(),
                weight,
                kind: EventKind::Automatic { effect },
            }
        };
        let boar = EventDef {
            id: "boar".to_string(),
            label: "Wild boar encounter".to_string(),
            description: "A wild boar appears! What do you do?".to_string(),
            weight: 0.15,
            kind: EventKind::Choice {
                options: vec![
                    EventOption {
                        key: DEFAULT_CHOICE_KEY.to_string(),
                        label: "Run away (costs energy)".to_string(),
                        effect: EventEffect::adjust(Gauge::Energy, -BOAR_FLEE_ENERGY),
                    },
                    EventOption {
                        key: "2".to_string(),
                        label: "Try to hunt (risky but food)".to_string(),
                        effect: EventEffect::Risk {
                            cost: Adjustment::new(Gauge::Energy, -BOAR_HUNT_ENERGY),
                            chance: BOAR_HUNT_CHANCE,
                            reward: Adjustment::new(Gauge::Hunger, BOAR_HUNT_FOOD),
                        },
                    },
                ],
            },
        };

        Self {
            quiet_chance: EVENT_QUIET_CHANCE,
            events: vec![
                automatic(
                    "rain",
                    "Rain",
                    "It's raining! You collect rainwater.",
                    0.20,
                    EventEffect::adjust(Gauge::Thirst, RAIN_WATER),
                ),
                boar,
                automatic(
                    "wild_fruit",
                    "Wild fruits discovery",
                    "You find edible fruits!",
                    0.25,
                    EventEffect::adjust(Gauge::Hunger, FRUIT_FOOD),
                ),
                automatic(
                    "water_source",
                    "Water source",
                    "You discover a clear water source!",
                    0.20,
                    EventEffect::adjust(Gauge::Thirst, SPRING_WATER),
                ),
                automatic(
                    "peaceful_observation",
                    "Peaceful observation",
                    "You watch an eagle soaring. Peaceful moment.",
                    0.15,
                    EventEffect::adjust(Gauge::Energy, EAGLE_REST),
                ),
                automatic(
                    "snake",
                    "Snake!",
                    "A snake! You barely avoid it but are exhausted.",
                    0.10,
                    EventEffect::adjust(Gauge::Energy, -SNAKE_ENERGY),
                ),
            ],
        }
    }

    /// Load an event table from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the table is invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let table: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Check weights, probabilities, ids, and choice options.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("quiet_chance", self.quiet_chance)?;
        if self.events.is_empty() && self.quiet_chance < 1.0 {
            return Err(ConfigError::EmptyTable {
                quiet_chance: self.quiet_chance,
            });
        }
        let mut seen = HashSet::new();
        for event in &self.events {
            if !seen.insert(event.id.as_str()) {
                return Err(ConfigError::DuplicateId {
                    kind: "event",
                    id: event.id.clone(),
                });
            }
            if !event.weight.is_finite() || event.weight < 0.0 {
                return Err(ConfigError::EventWeight {
                    id: event.id.clone(),
                    weight: event.weight,
                });
            }
            match &event.kind {
                EventKind::Automatic { effect } => validate_effect(effect)?,
                EventKind::Choice { options } => {
                    let has_default = options.iter().any(|opt| opt.key == DEFAULT_CHOICE_KEY);
                    if options.len() < 2 || !has_default {
                        return Err(ConfigError::ChoiceOptions {
                            id: event.id.clone(),
                            default_key: DEFAULT_CHOICE_KEY,
                        });
                    }
                    for option in options {
                        validate_effect(&option.effect)?;
                    }
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn events(&self) -> &[EventDef] {
        &self.events
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&EventDef> {
        self.events.iter().find(|event| event.id == id)
    }

    /// Roll for an event: `quiet_chance` yields nothing, otherwise a weighted pick.
    pub fn draw_event<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Option<&EventDef> {
        if rng.chance(self.quiet_chance) {
            return None;
        }
        let weights: Vec<f32> = self.events.iter().map(|event| event.weight).collect();
        let idx = rng.pick_weighted(&weights)?;
        self.events.get(idx)
    }

    /// Apply one event to the player, asking `selector` when it offers a choice.
    pub fn apply_event<S, R>(
        event: &EventDef,
        state: &mut VitalState,
        selector: &mut S,
        rng: &mut R,
    ) -> EventOutcome
    where
        S: ChoiceSelector + ?Sized,
        R: RandomSource + ?Sized,
    {
        let before = state.clone();
        let (choice, fell_back, effect) = match &event.kind {
            EventKind::Automatic { effect } => (None, false, Some(effect)),
            EventKind::Choice { options } => {
                let answer = selector.choose(event);
                match resolve_option(options, &answer) {
                    Some((option, fell_back)) => {
                        (Some(option.key.clone()), fell_back, Some(&option.effect))
                    }
                    None => (None, true, None),
                }
            }
        };
        let (succeeded, effect_tag) = match effect {
            Some(effect) => apply_effect(effect, state, rng),
            None => (false, LOG_EVENT_FALLBACK),
        };
        let tag = if fell_back {
            LOG_EVENT_FALLBACK
        } else {
            effect_tag
        };
        debug!(
            "event {} choice={:?} fell_back={} succeeded={}",
            event.id, choice, fell_back, succeeded
        );
        EventOutcome {
            event_id: event.id.clone(),
            label: event.label.clone(),
            choice,
            fell_back,
            succeeded,
            deltas: GaugeDeltas::between(&before, state),
            tag,
        }
    }
}

fn validate_effect(effect: &EventEffect) -> Result<(), ConfigError> {
    match effect {
        EventEffect::Adjust { .. } => Ok(()),
        EventEffect::Risk { chance, .. } => check_probability("risk.chance", *chance),
    }
}

/// Match the answer to an option key, falling back to the default option.
fn resolve_option<'a>(
    options: &'a [EventOption],
    answer: &str,
) -> Option<(&'a EventOption, bool)> {
    let answer = answer.trim();
    if let Some(option) = options.iter().find(|opt| opt.key == answer) {
        return Some((option, false));
    }
    options
        .iter()
        .find(|opt| opt.key == DEFAULT_CHOICE_KEY)
        .or_else(|| options.first())
        .map(|option| (option, true))
}

fn apply_effect<R: RandomSource + ?Sized>(
    effect: &EventEffect,
    state: &mut VitalState,
    rng: &mut R,
) -> (bool, &'static str) {
    match effect {
        EventEffect::Adjust { gauge, amount } => {
            state.adjust(*gauge, *amount);
            (true, LOG_EVENT_APPLIED)
        }
        EventEffect::Risk {
            cost,
            chance,
            reward,
        } => {
            state.adjust(cost.gauge, cost.amount);
            if rng.chance(*chance) {
                state.adjust(reward.gauge, reward.amount);
                (true, LOG_EVENT_RISK_WON)
            } else {
                (false, LOG_EVENT_RISK_LOST)
            }
        }
    }
}
