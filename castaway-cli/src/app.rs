//! Interactive session: main menu, day loop, and the save slot.
use anyhow::Result;
use castaway_game::{
    ChoiceSelector, CountingRng, EventDef, QuitDecision, Snapshot, SnapshotStore, SurvivalConfig,
    TurnCommand, TurnEngine, TurnReport, VitalState,
};
use colored::Colorize;
use log::{error, info, warn};
use rand::rngs::SmallRng;
use std::fmt::Display;
use std::io::{BufRead, Write};

use crate::display;
use crate::store::save_timestamp;

type Engine = TurnEngine<CountingRng<SmallRng>>;

/// How a single run handed control back to the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunExit {
    Finished,
    Quit,
    InputClosed,
}

/// Answers choice events from the same input the menus read.
struct TerminalSelector<'a, I, O> {
    input: &'a mut I,
    output: &'a mut O,
}

impl<I: BufRead, O: Write> ChoiceSelector for TerminalSelector<'_, I, O> {
    fn choose(&mut self, event: &EventDef) -> String {
        let shown = display::show_event_banner(&mut *self.output, event)
            .and_then(|()| write!(self.output, "\nYour choice: "))
            .and_then(|()| self.output.flush());
        if let Err(err) = shown {
            warn!("failed to show event {}: {err}", event.id);
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(_) => line.trim().to_string(),
            Err(err) => {
                warn!("failed to read event choice: {err}");
                String::new()
            }
        }
    }
}

pub struct App<I, O, S> {
    cfg: SurvivalConfig,
    store: S,
    seed: Option<u64>,
    input: I,
    output: O,
}

impl<I, O, S> App<I, O, S>
where
    I: BufRead,
    O: Write,
    S: SnapshotStore + Display,
{
    pub const fn new(cfg: SurvivalConfig, store: S, seed: Option<u64>, input: I, output: O) -> Self {
        Self {
            cfg,
            store,
            seed,
            input,
            output,
        }
    }

    /// Main menu loop; returns when the player quits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be written or read.
    pub fn run(&mut self) -> Result<()> {
        display::show_title(&mut self.output, self.cfg.target_days)?;
        loop {
            display::show_main_menu(&mut self.output)?;
            let Some(choice) = self.prompt("\nYour choice: ")? else {
                break;
            };
            let exit = match choice.as_str() {
                "1" => self.new_game()?,
                "2" => self.load_game()?,
                "3" => break,
                _ => {
                    writeln!(
                        self.output,
                        "{}",
                        "\n❌ Invalid choice. Please enter 1, 2 or 3.".red()
                    )?;
                    None
                }
            };
            if exit == Some(RunExit::InputClosed) {
                break;
            }
        }
        writeln!(self.output, "\n👋 Thanks for playing! See you soon!")?;
        self.output.flush()?;
        Ok(())
    }

    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn rng(&self) -> CountingRng<SmallRng> {
        self.seed
            .map_or_else(CountingRng::from_entropy, CountingRng::from_user_seed)
    }

    fn new_game(&mut self) -> Result<Option<RunExit>> {
        display::show_heading(&mut self.output, "🆕 NEW GAME")?;
        let default_name = self.cfg.start.name.clone();
        let Some(name) =
            self.prompt(&format!("\nEnter your name (or Enter for '{default_name}'): "))?
        else {
            return Ok(Some(RunExit::InputClosed));
        };
        let mut engine = TurnEngine::new_game(self.cfg.clone(), &name, self.rng())?;
        writeln!(self.output, "\nWelcome {}! 🏝️", engine.state().name)?;
        writeln!(self.output, "You wake up on a deserted island...")?;
        writeln!(
            self.output,
            "You must survive by managing your vital resources."
        )?;
        info!("new game for {} (seed {:?})", engine.state().name, self.seed);
        self.play(&mut engine).map(Some)
    }

    fn load_game(&mut self) -> Result<Option<RunExit>> {
        display::show_heading(&mut self.output, "📂 LOADING")?;
        let snapshot = match self.store.load() {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                writeln!(self.output, "{}", "\n❌ No saved game found.".red())?;
                return Ok(None);
            }
            Err(err) => {
                error!("loading {} failed: {err}", self.store);
                writeln!(
                    self.output,
                    "{}",
                    format!("\n❌ Error while loading: {err}").red()
                )?;
                return Ok(None);
            }
        };
        writeln!(self.output, "{}", "\n✅ Game loaded successfully!".green())?;
        writeln!(
            self.output,
            "📅 Saved on: {}",
            snapshot.save_date.as_deref().unwrap_or("Unknown")
        )?;

        let mut engine = TurnEngine::new(self.cfg.clone(), snapshot.into_state(), self.rng())?;
        writeln!(self.output, "\nWelcome back {}!", engine.state().name)?;
        writeln!(self.output, "📅 Day {}", engine.state().day)?;
        if engine.is_finished() {
            return self.finish(&engine).map(Some);
        }
        self.play(&mut engine).map(Some)
    }

    fn play(&mut self, engine: &mut Engine) -> Result<RunExit> {
        writeln!(
            self.output,
            "\n🎯 Goal: Survive {} days!",
            engine.config().target_days
        )?;
        writeln!(self.output, "📋 Manage your vital resources each day.")?;

        while !engine.is_finished() {
            display::show_status(&mut self.output, engine.state(), self.cfg.alert_threshold)?;

            let start = engine.start_day(&mut TerminalSelector {
                input: &mut self.input,
                output: &mut self.output,
            })?;
            if let Some(event) = &start.event {
                display::show_event_outcome(
                    &mut self.output,
                    event,
                    engine.events().get(&event.event_id),
                )?;
                if start.ending.is_none() {
                    display::show_status(
                        &mut self.output,
                        engine.state(),
                        self.cfg.alert_threshold,
                    )?;
                }
            }
            if start.ending.is_some() {
                break;
            }

            if let Some(exit) = self.take_turn(engine)? {
                return Ok(exit);
            }
        }
        self.finish(engine)
    }

    /// Prompt until one command resolves the day; `Some` ends the run early.
    fn take_turn(&mut self, engine: &mut Engine) -> Result<Option<RunExit>> {
        loop {
            display::show_action_menu(&mut self.output, engine.catalog(), engine.state())?;
            let Some(line) = self.prompt("\nYour choice: ")? else {
                return Ok(Some(RunExit::InputClosed));
            };
            let report = engine.submit(
                TurnCommand::parse(&line),
                &mut TerminalSelector {
                    input: &mut self.input,
                    output: &mut self.output,
                },
            )?;
            match report {
                TurnReport::InvalidAction { input } => {
                    writeln!(
                        self.output,
                        "{}",
                        format!("\n❌ Invalid action {input:?}. Please choose a valid number.")
                            .red()
                    )?;
                }
                TurnReport::Unavailable(outcome) => {
                    if let Some(action) = engine.catalog().get(outcome.action) {
                        display::show_action_outcome(&mut self.output, action, &outcome, None)?;
                    }
                }
                TurnReport::Resolved(day) => {
                    let event_def = day
                        .action
                        .event
                        .as_ref()
                        .and_then(|event| engine.events().get(&event.event_id));
                    if let Some(action) = engine.catalog().get(day.action.action) {
                        display::show_action_outcome(
                            &mut self.output,
                            action,
                            &day.action,
                            event_def,
                        )?;
                    }
                    display::show_decay(&mut self.output, &day.decay)?;
                    return Ok(None);
                }
                TurnReport::SaveRequested => self.save(engine.state())?,
                TurnReport::QuitRequested => {
                    display::show_quit_prompt(&mut self.output)?;
                    let Some(answer) = self.prompt("\nYour choice: ")? else {
                        return Ok(Some(RunExit::InputClosed));
                    };
                    match QuitDecision::parse(&answer) {
                        QuitDecision::SaveAndExit => {
                            self.save(engine.state())?;
                            return Ok(Some(RunExit::Quit));
                        }
                        QuitDecision::ExitWithoutSave => {
                            writeln!(self.output, "\n👋 See you soon!")?;
                            return Ok(Some(RunExit::Quit));
                        }
                        QuitDecision::Cancel => {}
                    }
                }
            }
        }
    }

    fn save(&mut self, state: &VitalState) -> Result<()> {
        let snapshot = Snapshot::capture(state, Some(save_timestamp()));
        match self.store.save(&snapshot) {
            Ok(()) => {
                info!("saved day {} to {}", state.day, self.store);
                writeln!(self.output, "{}", "\n✅ Game saved successfully!".green())?;
                writeln!(self.output, "📁 File: {}", self.store)?;
            }
            Err(err) => {
                error!("saving to {} failed: {err}", self.store);
                writeln!(
                    self.output,
                    "{}",
                    format!("\n❌ Error while saving: {err}").red()
                )?;
            }
        }
        Ok(())
    }

    /// End screen, then clear the save slot.
    fn finish(&mut self, engine: &Engine) -> Result<RunExit> {
        if let Some(summary) = engine.summary() {
            display::show_summary(&mut self.output, &summary)?;
        }
        if let Err(err) = self.store.delete() {
            warn!("could not delete {} after the run ended: {err}", self.store);
        }
        Ok(RunExit::Finished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castaway_game::EventTable;
    use std::io::{self, Cursor};

    /// Terminal whose output side is gone.
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn boar() -> EventDef {
        EventTable::default_table()
            .get("boar")
            .cloned()
            .expect("default table has the boar")
    }

    #[test]
    fn selector_reads_the_trimmed_choice() {
        colored::control::set_override(false);
        let mut input = Cursor::new(" 2 \n");
        let mut output = Vec::new();
        let answer = TerminalSelector {
            input: &mut input,
            output: &mut output,
        }
        .choose(&boar());
        assert_eq!(answer, "2");
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Your choice: "));
    }

    #[test]
    fn selector_still_reads_when_output_fails() {
        let mut input = Cursor::new("2\n");
        let mut output = BrokenPipe;
        let answer = TerminalSelector {
            input: &mut input,
            output: &mut output,
        }
        .choose(&boar());
        assert_eq!(answer, "2");
    }
}
