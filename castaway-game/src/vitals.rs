//! Player vital gauges and the day counter.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::{DecayCfg, StartCfg};
use crate::constants::{GAUGE_MAX, GAUGE_MIN};

/// One of the three vital gauges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gauge {
    Hunger,
    Thirst,
    Energy,
}

impl Gauge {
    pub const ALL: [Self; 3] = [Self::Hunger, Self::Thirst, Self::Energy];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Hunger => "hunger",
            Self::Thirst => "thirst",
            Self::Energy => "energy",
        }
    }
}

impl std::fmt::Display for Gauge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Reason a run ended in death, in reporting priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CauseOfDeath {
    Starvation,
    Dehydration,
    Exhaustion,
}

impl CauseOfDeath {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Starvation => "starvation",
            Self::Dehydration => "dehydration",
            Self::Exhaustion => "exhaustion",
        }
    }

    #[must_use]
    pub const fn gauge(self) -> Gauge {
        match self {
            Self::Starvation => Gauge::Hunger,
            Self::Dehydration => Gauge::Thirst,
            Self::Exhaustion => Gauge::Energy,
        }
    }
}

/// Signed change of every gauge across one resolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GaugeDeltas {
    pub hunger: i32,
    pub thirst: i32,
    pub energy: i32,
}

impl GaugeDeltas {
    /// Difference `after - before`, i.e. what was actually applied post-clamp.
    #[must_use]
    pub const fn between(before: &VitalState, after: &VitalState) -> Self {
        Self {
            hunger: after.hunger - before.hunger,
            thirst: after.thirst - before.thirst,
            energy: after.energy - before.energy,
        }
    }

    #[must_use]
    pub const fn get(&self, gauge: Gauge) -> i32 {
        match gauge {
            Gauge::Hunger => self.hunger,
            Gauge::Thirst => self.thirst,
            Gauge::Energy => self.energy,
        }
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.hunger == 0 && self.thirst == 0 && self.energy == 0
    }
}

/// The single mutable player record owned by the turn engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalState {
    pub name: String,
    pub day: u32,
    pub hunger: i32,
    pub thirst: i32,
    pub energy: i32,
}

impl Default for VitalState {
    fn default() -> Self {
        Self::from_start(&StartCfg::default())
    }
}

impl VitalState {
    /// Fresh new-game state with the given player name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// New-game state built from an explicit start configuration.
    #[must_use]
    pub fn from_start(start: &StartCfg) -> Self {
        let mut state = Self {
            name: start.name.clone(),
            day: 1,
            hunger: start.hunger,
            thirst: start.thirst,
            energy: start.energy,
        };
        state.clamp();
        state
    }

    /// Force every gauge back into range and the day counter to at least 1.
    pub fn clamp(&mut self) {
        self.hunger = self.hunger.clamp(GAUGE_MIN, GAUGE_MAX);
        self.thirst = self.thirst.clamp(GAUGE_MIN, GAUGE_MAX);
        self.energy = self.energy.clamp(GAUGE_MIN, GAUGE_MAX);
        self.day = self.day.max(1);
    }

    #[must_use]
    pub const fn gauge(&self, gauge: Gauge) -> i32 {
        match gauge {
            Gauge::Hunger => self.hunger,
            Gauge::Thirst => self.thirst,
            Gauge::Energy => self.energy,
        }
    }

    /// Add `delta` to a gauge and clamp; returns the change actually applied.
    pub fn adjust(&mut self, gauge: Gauge, delta: i32) -> i32 {
        let slot = match gauge {
            Gauge::Hunger => &mut self.hunger,
            Gauge::Thirst => &mut self.thirst,
            Gauge::Energy => &mut self.energy,
        };
        let before = *slot;
        *slot = before.saturating_add(delta).clamp(GAUGE_MIN, GAUGE_MAX);
        *slot - before
    }

    pub fn adjust_hunger(&mut self, delta: i32) -> i32 {
        self.adjust(Gauge::Hunger, delta)
    }

    pub fn adjust_thirst(&mut self, delta: i32) -> i32 {
        self.adjust(Gauge::Thirst, delta)
    }

    pub fn adjust_energy(&mut self, delta: i32) -> i32 {
        self.adjust(Gauge::Energy, delta)
    }

    /// End-of-day drain of all three gauges.
    pub fn apply_natural_decay(&mut self, decay: &DecayCfg) -> GaugeDeltas {
        let before = self.clone();
        self.adjust_hunger(-decay.hunger);
        self.adjust_thirst(-decay.thirst);
        self.adjust_energy(-decay.energy);
        GaugeDeltas::between(&before, self)
    }

    pub const fn advance_day(&mut self) {
        self.day = self.day.saturating_add(1);
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hunger > GAUGE_MIN && self.thirst > GAUGE_MIN && self.energy > GAUGE_MIN
    }

    /// First empty gauge in Starvation > Dehydration > Exhaustion order.
    #[must_use]
    pub const fn cause_of_death(&self) -> Option<CauseOfDeath> {
        if self.hunger <= GAUGE_MIN {
            Some(CauseOfDeath::Starvation)
        } else if self.thirst <= GAUGE_MIN {
            Some(CauseOfDeath::Dehydration)
        } else if self.energy <= GAUGE_MIN {
            Some(CauseOfDeath::Exhaustion)
        } else {
            None
        }
    }

    /// Gauges at or below `threshold`, in canonical order.
    #[must_use]
    pub fn critical_gauges(&self, threshold: i32) -> SmallVec<[Gauge; 3]> {
        Gauge::ALL
            .into_iter()
            .filter(|gauge| self.gauge(*gauge) <= threshold)
            .collect()
    }
}
