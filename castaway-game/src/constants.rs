//! Centralized balance defaults and narrative keys for Castaway game logic.
//!
//! The tuning values here seed the serde defaults of [`crate::config`] and the
//! default catalogs. Runtime code reads them through `SurvivalConfig`, the
//! action catalog, or the event table, never directly. Narrative keys are
//! public so front ends can map them to text.

// Narrative keys -----------------------------------------------------------
pub const LOG_FISH_CATCH: &str = "log.fish.catch";
pub const LOG_FISH_MISS: &str = "log.fish.miss";
pub const LOG_WATER_FOUND: &str = "log.water.found";
pub const LOG_WATER_MISSED: &str = "log.water.missed";
pub const LOG_FORAGE_CATCH: &str = "log.forage.catch";
pub const LOG_FORAGE_MISS: &str = "log.forage.miss";
pub const LOG_SLEEP: &str = "log.sleep";
pub const LOG_EXPLORE_EVENT: &str = "log.explore.event";
pub const LOG_EXPLORE_QUIET: &str = "log.explore.quiet";
pub const LOG_TOO_EXHAUSTED: &str = "log.action.too-exhausted";
pub const LOG_EVENT_APPLIED: &str = "log.event.applied";
pub const LOG_EVENT_RISK_WON: &str = "log.event.risk-won";
pub const LOG_EVENT_RISK_LOST: &str = "log.event.risk-lost";
pub const LOG_EVENT_FALLBACK: &str = "log.event.fallback";
pub const LOG_DAY_DECAY: &str = "log.day.decay";
pub const LOG_DAY_ADVANCE: &str = "log.day.advance";

// Gauge bounds -------------------------------------------------------------
pub const GAUGE_MIN: i32 = 0;
pub const GAUGE_MAX: i32 = 100;

// New-game defaults --------------------------------------------------------
pub const DEFAULT_NAME: &str = "Adventurer";
pub const START_DAY: u32 = 1;
pub const START_HUNGER: i32 = 70;
pub const START_THIRST: i32 = 70;
pub const START_ENERGY: i32 = 100;

// Daily cycle --------------------------------------------------------------
pub const TARGET_DAYS: u32 = 7;
pub const DECAY_HUNGER: i32 = 10;
pub const DECAY_THIRST: i32 = 15;
pub const DECAY_ENERGY: i32 = 5;
pub const DAILY_EVENT_CHANCE: f32 = 0.40;
pub const ALERT_THRESHOLD: i32 = 20;

// Actions ------------------------------------------------------------------
pub(crate) const FISH_ENERGY_COST: i32 = 15;
pub(crate) const FISH_SUCCESS_CHANCE: f32 = 0.70;
pub(crate) const FISH_PAYOUT_MIN: i32 = 20;
pub(crate) const FISH_PAYOUT_MAX: i32 = 35;
pub(crate) const WATER_ENERGY_COST: i32 = 10;
pub(crate) const WATER_SUCCESS_CHANCE: f32 = 0.80;
pub(crate) const WATER_PAYOUT_MIN: i32 = 25;
pub(crate) const WATER_PAYOUT_MAX: i32 = 40;
pub(crate) const SLEEP_ENERGY_GAIN: i32 = 50;
pub(crate) const SLEEP_HUNGER_COST: i32 = 15;
pub(crate) const SLEEP_THIRST_COST: i32 = 20;
pub(crate) const EXPLORE_ENERGY_COST: i32 = 10;

// Events -------------------------------------------------------------------
pub const EVENT_QUIET_CHANCE: f32 = 0.60;
pub const DEFAULT_CHOICE_KEY: &str = "1";
pub(crate) const BOAR_FLEE_ENERGY: i32 = 15;
pub(crate) const BOAR_HUNT_ENERGY: i32 = 25;
pub(crate) const BOAR_HUNT_CHANCE: f32 = 0.50;
pub(crate) const BOAR_HUNT_FOOD: i32 = 40;
pub(crate) const RAIN_WATER: i32 = 20;
pub(crate) const FRUIT_FOOD: i32 = 25;
pub(crate) const SPRING_WATER: i32 = 30;
pub(crate) const EAGLE_REST: i32 = 5;
pub(crate) const SNAKE_ENERGY: i32 = 20;
