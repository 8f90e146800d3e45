//! End-of-run result calculation
use serde::{Deserialize, Serialize};

use crate::vitals::{CauseOfDeath, VitalState};

/// Possible game ending types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "cause")]
pub enum Ending {
    /// Survived past the target day
    Victory,
    /// A gauge reached zero
    Death(CauseOfDeath),
}

impl Ending {
    #[must_use]
    pub const fn is_victory(self) -> bool {
        matches!(self, Self::Victory)
    }
}

impl std::fmt::Display for Ending {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ending::Victory => write!(f, "victory"),
            Ending::Death(cause) => write!(f, "death:{}", cause.key()),
        }
    }
}

/// Summary of a finished run for display on the result screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub ending: Ending,
    pub name: String,
    pub headline: String,
    /// Day counter at the moment the run ended.
    pub days: u32,
    pub target_days: u32,
}

/// Build the result screen summary for a finished run.
#[must_use]
pub fn result_summary(state: &VitalState, ending: Ending, target_days: u32) -> ResultSummary {
    let headline = match ending {
        Ending::Victory => format!("You survived {target_days} full days!"),
        Ending::Death(CauseOfDeath::Starvation) => "Died of starvation...".to_string(),
        Ending::Death(CauseOfDeath::Dehydration) => "Died of dehydration...".to_string(),
        Ending::Death(CauseOfDeath::Exhaustion) => "Died of exhaustion...".to_string(),
    };
    ResultSummary {
        ending,
        name: state.name.clone(),
        headline,
        days: state.day,
        target_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn death_headline_names_cause() {
        let state = VitalState {
            thirst: 0,
            day: 4,
            ..VitalState::default()
        };
        let summary = result_summary(&state, Ending::Death(CauseOfDeath::Dehydration), 7);
        assert_eq!(summary.headline, "Died of dehydration...");
        assert_eq!(summary.days, 4);
        assert!(!summary.ending.is_victory());
    }

    #[test]
    fn victory_headline_uses_target() {
        let state = VitalState {
            day: 8,
            ..VitalState::new("Robinson")
        };
        let summary = result_summary(&state, Ending::Victory, 7);
        assert_eq!(summary.headline, "You survived 7 full days!");
        assert_eq!(summary.name, "Robinson");
        assert_eq!(Ending::Victory.to_string(), "victory");
    }

    #[test]
    fn ending_serializes_with_cause() {
        let json = serde_json::to_string(&Ending::Death(CauseOfDeath::Exhaustion)).unwrap();
        assert_eq!(json, r#"{"type":"death","cause":"exhaustion"}"#);
    }
}
