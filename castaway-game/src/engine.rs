//! Day-cycle turn engine.
//!
//! A day runs `start_day` (optional pre-menu event) and then `submit` (one
//! action, natural decay, day advance). Save and quit commands are accepted at
//! any point of an unfinished run and never consume a turn.
use log::{debug, info};
use smallvec::SmallVec;
use thiserror::Error;

use crate::actions::{ActionCatalog, ActionOutcome};
use crate::config::{ConfigError, SurvivalConfig};
use crate::constants::{DEFAULT_CHOICE_KEY, LOG_DAY_ADVANCE, LOG_DAY_DECAY};
use crate::events::{ChoiceSelector, EventDef, EventOutcome, EventTable};
use crate::result::{Ending, ResultSummary, result_summary};
use crate::rng::RandomSource;
use crate::vitals::{GaugeDeltas, VitalState};

/// Narrative keys recorded while resolving one day.
pub type DayLog = SmallVec<[&'static str; 4]>;

/// Where the engine is within the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// Waiting for `start_day`.
    AwaitingDay,
    EventPhase,
    /// Waiting for the day's command.
    AwaitingAction,
    ActionPhase,
    DecayPhase,
    DayAdvance,
    Finished(Ending),
}

/// API misuse; gameplay problems are reported through [`TurnReport`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("the run has already ended ({0})")]
    GameFinished(Ending),
    #[error("start_day must be called before submitting an action")]
    DayNotStarted,
    #[error("the current day has already started")]
    DayAlreadyStarted,
}

/// One command from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnCommand {
    /// Raw action input: a menu number or an action key.
    Action(String),
    Save,
    Quit,
}

impl TurnCommand {
    /// `s`/`save` and `q`/`quit` are control commands; anything else is an action.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "s" | "save" => Self::Save,
            "q" | "quit" => Self::Quit,
            _ => Self::Action(trimmed.to_string()),
        }
    }
}

/// Answer to the quit prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitDecision {
    SaveAndExit,
    ExitWithoutSave,
    Cancel,
}

impl QuitDecision {
    /// `1` saves then exits, `2` exits, anything else resumes play.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "1" => Self::SaveAndExit,
            "2" => Self::ExitWithoutSave,
            _ => Self::Cancel,
        }
    }
}

/// What happened before the action menu.
#[derive(Debug, Clone, PartialEq)]
pub struct DayStart {
    pub day: u32,
    pub event: Option<EventOutcome>,
    /// Set when the event killed the player.
    pub ending: Option<Ending>,
}

/// A fully resolved day: action, decay and day advance always all run.
#[derive(Debug, Clone, PartialEq)]
pub struct DayResolution {
    pub action: ActionOutcome,
    /// Natural decay applied after the action, even a fatal one.
    pub decay: GaugeDeltas,
    /// Day counter after resolution.
    pub day: u32,
    pub ending: Option<Ending>,
    pub log: DayLog,
}

/// Result of submitting a command.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnReport {
    /// Unrecognized action; the day is not consumed.
    InvalidAction { input: String },
    /// Not enough energy; nothing changed and the day is not consumed.
    Unavailable(ActionOutcome),
    Resolved(DayResolution),
    SaveRequested,
    QuitRequested,
}

/// Owns the player for the whole run and sequences each day.
#[derive(Debug, Clone)]
pub struct TurnEngine<R> {
    cfg: SurvivalConfig,
    catalog: ActionCatalog,
    events: EventTable,
    state: VitalState,
    rng: R,
    phase: TurnPhase,
}

impl<R: RandomSource> TurnEngine<R> {
    /// Engine over the default action catalog and event table.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(cfg: SurvivalConfig, state: VitalState, rng: R) -> Result<Self, ConfigError> {
        Self::with_tables(
            cfg,
            ActionCatalog::default_catalog(),
            EventTable::default_table(),
            state,
            rng,
        )
    }

    /// Fresh run from the configured start values; a non-empty `name` overrides
    /// the configured default.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new_game(cfg: SurvivalConfig, name: &str, rng: R) -> Result<Self, ConfigError> {
        let mut state = VitalState::from_start(&cfg.start);
        let name = name.trim();
        if !name.is_empty() {
            state.name = name.to_string();
        }
        Self::new(cfg, state, rng)
    }

    /// Engine over explicit tables.
    ///
    /// A restored state that is already dead or past the target starts finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or either table fails validation.
    pub fn with_tables(
        cfg: SurvivalConfig,
        catalog: ActionCatalog,
        events: EventTable,
        mut state: VitalState,
        rng: R,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;
        catalog.validate()?;
        events.validate()?;
        state.clamp();
        let mut engine = Self {
            cfg,
            catalog,
            events,
            state,
            rng,
            phase: TurnPhase::AwaitingDay,
        };
        if let Some(ending) = engine.evaluate() {
            engine.finish(ending);
        }
        Ok(engine)
    }

    #[must_use]
    pub const fn state(&self) -> &VitalState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &SurvivalConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn catalog(&self) -> &ActionCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn events(&self) -> &EventTable {
        &self.events
    }

    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub const fn rng(&self) -> &R {
        &self.rng
    }

    #[must_use]
    pub const fn ending(&self) -> Option<Ending> {
        match self.phase {
            TurnPhase::Finished(ending) => Some(ending),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.phase, TurnPhase::Finished(_))
    }

    /// Result screen data once the run has ended.
    #[must_use]
    pub fn summary(&self) -> Option<ResultSummary> {
        self.ending()
            .map(|ending| result_summary(&self.state, ending, self.cfg.target_days))
    }

    /// Consume the engine, returning the player.
    #[must_use]
    pub fn into_state(self) -> VitalState {
        self.state
    }

    /// Open the day: roll the pre-menu event and apply it if one is drawn.
    ///
    /// # Errors
    ///
    /// Returns an error if the run is over or the day is already open.
    pub fn start_day<S>(&mut self, selector: &mut S) -> Result<DayStart, EngineError>
    where
        S: ChoiceSelector + ?Sized,
    {
        match self.phase {
            TurnPhase::AwaitingDay => {}
            TurnPhase::Finished(ending) => return Err(EngineError::GameFinished(ending)),
            _ => return Err(EngineError::DayAlreadyStarted),
        }

        self.enter(TurnPhase::EventPhase);
        let mut event = None;
        if self.rng.chance(self.cfg.daily_event_chance)
            && let Some(def) = self.events.draw_event(&mut self.rng)
        {
            event = Some(EventTable::apply_event(
                def,
                &mut self.state,
                selector,
                &mut self.rng,
            ));
        }

        let ending = self.check_death();
        if ending.is_none() {
            self.enter(TurnPhase::AwaitingAction);
        }
        Ok(DayStart {
            day: self.state.day,
            event,
            ending,
        })
    }

    /// Resolve one command for the open day.
    ///
    /// # Errors
    ///
    /// Returns an error if the run is over, or if an action is submitted before
    /// `start_day`.
    pub fn submit<S>(
        &mut self,
        command: TurnCommand,
        selector: &mut S,
    ) -> Result<TurnReport, EngineError>
    where
        S: ChoiceSelector + ?Sized,
    {
        if let TurnPhase::Finished(ending) = self.phase {
            return Err(EngineError::GameFinished(ending));
        }
        let input = match command {
            TurnCommand::Save => return Ok(TurnReport::SaveRequested),
            TurnCommand::Quit => return Ok(TurnReport::QuitRequested),
            TurnCommand::Action(input) => input,
        };
        if self.phase != TurnPhase::AwaitingAction {
            return Err(EngineError::DayNotStarted);
        }

        let Some(action) = self.catalog.lookup(&input).cloned() else {
            debug!("invalid action input {input:?}");
            return Ok(TurnReport::InvalidAction { input });
        };
        if !ActionCatalog::is_available(&action, &self.state) {
            let outcome = ActionCatalog::apply(
                &action,
                &mut self.state,
                &self.events,
                selector,
                &mut self.rng,
            );
            return Ok(TurnReport::Unavailable(outcome));
        }

        self.enter(TurnPhase::ActionPhase);
        let outcome = ActionCatalog::apply(
            &action,
            &mut self.state,
            &self.events,
            selector,
            &mut self.rng,
        );
        let mut log = DayLog::new();
        log.push(outcome.tag);

        self.enter(TurnPhase::DecayPhase);
        let decay = self.state.apply_natural_decay(&self.cfg.decay);
        log.push(LOG_DAY_DECAY);

        self.enter(TurnPhase::DayAdvance);
        self.state.advance_day();
        log.push(LOG_DAY_ADVANCE);
        let ending = self.evaluate();
        match ending {
            Some(ending) => self.finish(ending),
            None => self.enter(TurnPhase::AwaitingDay),
        }
        Ok(TurnReport::Resolved(DayResolution {
            action: outcome,
            decay,
            day: self.state.day,
            ending,
            log,
        }))
    }

    /// Run a whole day with one call, answering choice events with the default option.
    ///
    /// # Errors
    ///
    /// Returns an error if the run is over or a day is already open.
    pub fn play_day(&mut self, input: &str) -> Result<(DayStart, Option<TurnReport>), EngineError> {
        let mut safe = |_event: &EventDef| DEFAULT_CHOICE_KEY.to_string();
        let start = self.start_day(&mut safe)?;
        if start.ending.is_some() {
            return Ok((start, None));
        }
        let report = self.submit(TurnCommand::Action(input.to_string()), &mut safe)?;
        Ok((start, Some(report)))
    }

    fn enter(&mut self, phase: TurnPhase) {
        debug!("day {} phase {:?} -> {:?}", self.state.day, self.phase, phase);
        self.phase = phase;
    }

    fn finish(&mut self, ending: Ending) {
        info!(
            "run ended on day {}: {} (hunger {}, thirst {}, energy {})",
            self.state.day, ending, self.state.hunger, self.state.thirst, self.state.energy
        );
        self.enter(TurnPhase::Finished(ending));
    }

    fn check_death(&mut self) -> Option<Ending> {
        let ending = self.state.cause_of_death().map(Ending::Death)?;
        self.finish(ending);
        Some(ending)
    }

    fn evaluate(&self) -> Option<Ending> {
        if let Some(cause) = self.state.cause_of_death() {
            return Some(Ending::Death(cause));
        }
        (self.state.day > self.cfg.target_days).then_some(Ending::Victory)
    }
}
