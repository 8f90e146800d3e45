//! Flat save-slot record for a [`VitalState`].
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_NAME, START_DAY, START_ENERGY, START_HUNGER, START_THIRST};
use crate::vitals::VitalState;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The persisted record. Missing fields load as new-game values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "Snapshot::default_name")]
    pub name: String,
    #[serde(default = "Snapshot::default_day")]
    pub day: u32,
    #[serde(default = "Snapshot::default_hunger")]
    pub hunger: i32,
    #[serde(default = "Snapshot::default_thirst")]
    pub thirst: i32,
    #[serde(default = "Snapshot::default_energy")]
    pub energy: i32,
    /// Wall-clock save time, formatted by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub save_date: Option<String>,
}

impl Snapshot {
    fn default_name() -> String {
        DEFAULT_NAME.to_string()
    }

    const fn default_day() -> u32 {
        START_DAY
    }

    const fn default_hunger() -> i32 {
        START_HUNGER
    }

    const fn default_thirst() -> i32 {
        START_THIRST
    }

    const fn default_energy() -> i32 {
        START_ENERGY
    }

    /// Record every identity and gauge field of `state`.
    #[must_use]
    pub fn capture(state: &VitalState, save_date: Option<String>) -> Self {
        Self {
            name: state.name.clone(),
            day: state.day,
            hunger: state.hunger,
            thirst: state.thirst,
            energy: state.energy,
            save_date,
        }
    }

    /// Rebuild the player, clamping anything a hand-edited file put out of range.
    #[must_use]
    pub fn into_state(self) -> VitalState {
        let mut state = VitalState {
            name: self.name,
            day: self.day,
            hunger: self.hunger,
            thirst: self.thirst,
            energy: self.energy,
        };
        state.clamp();
        state
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns an error if the text is not a JSON object of the expected shape.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<&VitalState> for Snapshot {
    fn from(state: &VitalState) -> Self {
        Self::capture(state, None)
    }
}

impl From<Snapshot> for VitalState {
    fn from(snapshot: Snapshot) -> Self {
        snapshot.into_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_fields() {
        let states = [
            VitalState::default(),
            VitalState {
                name: "Ana María".to_string(),
                day: 6,
                hunger: 1,
                thirst: 100,
                energy: 42,
            },
            VitalState {
                name: String::new(),
                day: 120,
                hunger: 0,
                thirst: 0,
                energy: 0,
            },
        ];
        for state in states {
            let json = Snapshot::capture(&state, Some("2024-01-01 10:00:00".to_string()))
                .to_json()
                .unwrap();
            let restored = Snapshot::from_json(&json).unwrap().into_state();
            assert_eq!(restored, state);
        }
    }

    #[test]
    fn missing_fields_use_new_game_values() {
        let restored = Snapshot::from_json("{}").unwrap().into_state();
        assert_eq!(restored, VitalState::default());

        let restored = Snapshot::from_json(r#"{ "name": "Kai", "thirst": 12 }"#)
            .unwrap()
            .into_state();
        assert_eq!(restored.name, "Kai");
        assert_eq!((restored.day, restored.hunger, restored.thirst), (1, 70, 12));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let restored = Snapshot::from_json(r#"{ "day": 0, "hunger": 180, "energy": -4 }"#)
            .unwrap()
            .into_state();
        assert_eq!(restored.day, 1);
        assert_eq!(restored.hunger, 100);
        assert_eq!(restored.energy, 0);
    }

    #[test]
    fn save_date_is_optional_on_disk() {
        let json = Snapshot::from(&VitalState::default()).to_json().unwrap();
        assert!(!json.contains("save_date"));
        let dated = Snapshot::capture(&VitalState::default(), Some("now".to_string()));
        assert!(dated.to_json().unwrap().contains("\"save_date\": \"now\""));
    }

    #[test]
    fn garbage_is_decode_error() {
        assert!(matches!(
            Snapshot::from_json("not json"),
            Err(SnapshotError::Decode(_))
        ));
    }
}
