//! Castaway Game Engine
//!
//! Platform-agnostic day-cycle simulation for the Castaway island survival game.
//! This crate owns the rules (gauges, actions, events, turn sequencing) and
//! performs no terminal or filesystem I/O.

pub mod actions;
pub mod config;
pub mod constants;
pub mod engine;
pub mod events;
pub mod result;
pub mod rng;
pub mod snapshot;
pub mod vitals;

// Re-export commonly used types
pub use actions::{ActionCatalog, ActionDef, ActionEffect, ActionId, ActionOutcome};
pub use config::{ConfigError, DecayCfg, StartCfg, SurvivalConfig};
pub use engine::{
    DayLog, DayResolution, DayStart, EngineError, QuitDecision, TurnCommand, TurnEngine,
    TurnPhase, TurnReport,
};
pub use events::{
    Adjustment, ChoiceSelector, EventDef, EventEffect, EventKind, EventOption, EventOutcome,
    EventTable,
};
pub use result::{Ending, ResultSummary, result_summary};
pub use rng::{CountingRng, RandomSource};
pub use snapshot::{Snapshot, SnapshotError};
pub use vitals::{CauseOfDeath, Gauge, GaugeDeltas, VitalState};

/// Trait for abstracting the single save slot.
/// Platform-specific implementations should provide this
pub trait SnapshotStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the snapshot, replacing any previous save.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be written.
    fn save(&self, snapshot: &Snapshot) -> Result<(), Self::Error>;

    /// Load the saved snapshot, `None` when no save exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the save exists but cannot be read or decoded.
    fn load(&self) -> Result<Option<Snapshot>, Self::Error>;

    /// Whether a save is present.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be queried.
    fn exists(&self) -> Result<bool, Self::Error>;

    /// Remove the save; returns whether one was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the save exists but cannot be deleted.
    fn delete(&self) -> Result<bool, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStore {
        slot: Rc<RefCell<Option<String>>>,
    }

    impl SnapshotStore for MemoryStore {
        type Error = SnapshotError;

        fn save(&self, snapshot: &Snapshot) -> Result<(), Self::Error> {
            *self.slot.borrow_mut() = Some(snapshot.to_json()?);
            Ok(())
        }

        fn load(&self) -> Result<Option<Snapshot>, Self::Error> {
            self.slot
                .borrow()
                .as_deref()
                .map(Snapshot::from_json)
                .transpose()
        }

        fn exists(&self) -> Result<bool, Self::Error> {
            Ok(self.slot.borrow().is_some())
        }

        fn delete(&self) -> Result<bool, Self::Error> {
            Ok(self.slot.borrow_mut().take().is_some())
        }
    }

    struct Always(f32);

    impl RandomSource for Always {
        fn unit(&mut self) -> f32 {
            self.0
        }

        fn range_inclusive(&mut self, min: i32, _max: i32) -> i32 {
            min
        }
    }

    #[test]
    fn engine_state_survives_store_roundtrip() {
        let store = MemoryStore::default();
        assert!(!store.exists().unwrap());
        assert!(store.load().unwrap().is_none());

        let mut engine =
            TurnEngine::new_game(SurvivalConfig::default(), "Wilson", Always(0.99)).unwrap();
        engine.play_day("sleep").unwrap();
        engine.play_day("search_water").unwrap();
        store
            .save(&Snapshot::capture(engine.state(), Some("2024-05-01 09:30:00".to_string())))
            .unwrap();
        assert!(store.exists().unwrap());

        let loaded = store.load().unwrap().expect("save exists");
        assert_eq!(loaded.save_date.as_deref(), Some("2024-05-01 09:30:00"));
        let resumed =
            TurnEngine::new(SurvivalConfig::default(), loaded.into_state(), Always(0.99)).unwrap();
        assert_eq!(resumed.state(), engine.state());
        assert_eq!(resumed.state().day, 3);
        assert_eq!(resumed.phase(), TurnPhase::AwaitingDay);

        assert!(store.delete().unwrap());
        assert!(!store.delete().unwrap());
    }

    #[test]
    fn corrupt_slot_surfaces_error() {
        let store = MemoryStore::default();
        *store.slot.borrow_mut() = Some("{ broken".to_string());
        assert!(store.load().is_err());
    }
}
