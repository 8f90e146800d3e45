//! Terminal rendering for menus, gauges, events, and end screens.
use castaway_game::constants::{
    LOG_EVENT_FALLBACK, LOG_EVENT_RISK_LOST, LOG_EVENT_RISK_WON, LOG_EXPLORE_QUIET,
    LOG_FISH_CATCH, LOG_FISH_MISS, LOG_FORAGE_CATCH, LOG_FORAGE_MISS, LOG_SLEEP,
    LOG_TOO_EXHAUSTED, LOG_WATER_FOUND, LOG_WATER_MISSED,
};
use castaway_game::{
    ActionCatalog, ActionDef, ActionId, ActionOutcome, Ending, EventDef, EventOutcome, Gauge,
    GaugeDeltas, ResultSummary, VitalState,
};
use colored::Colorize;
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;
pub const BAR_CELLS: i32 = 20;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn thin_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

/// Fixed-width bar that empties from the right as the value falls.
pub fn gauge_bar(value: i32) -> String {
    let filled = (value.clamp(0, 100) * BAR_CELLS / 100) as usize;
    let empty = BAR_CELLS as usize - filled;
    format!("[{}{}]", "█".repeat(filled), "·".repeat(empty))
}

/// Level glyph: critical at or below 20, low at or below 50.
pub const fn gauge_glyph(gauge: Gauge, value: i32) -> &'static str {
    match (gauge, value) {
        (Gauge::Hunger, ..=20) => "🍖",
        (Gauge::Hunger, ..=50) => "🍞",
        (Gauge::Thirst, ..=20) => "💧",
        (Gauge::Thirst, ..=50) => "🚰",
        (Gauge::Energy, ..=20) => "😴",
        (Gauge::Energy, ..=50) => "😐",
        (Gauge::Energy, _) => "⚡",
        _ => "✅",
    }
}

pub const fn gauge_label(gauge: Gauge) -> &'static str {
    match gauge {
        Gauge::Hunger => "Hunger",
        Gauge::Thirst => "Thirst",
        Gauge::Energy => "Energy",
    }
}

pub const fn alert_text(gauge: Gauge) -> &'static str {
    match gauge {
        Gauge::Hunger => "⚠️  DANGER: You're starving!",
        Gauge::Thirst => "⚠️  DANGER: You're dying of thirst!",
        Gauge::Energy => "⚠️  DANGER: You're exhausted!",
    }
}

const fn action_glyph(id: ActionId) -> &'static str {
    match id {
        ActionId::Fish => "🎣",
        ActionId::SearchWater => "💧",
        ActionId::Sleep => "😴",
        ActionId::Explore => "🗺️",
    }
}

/// Signed, comma-separated summary of non-zero deltas.
pub fn format_deltas(deltas: &GaugeDeltas) -> String {
    let parts: Vec<String> = Gauge::ALL
        .iter()
        .filter(|gauge| deltas.get(**gauge) != 0)
        .map(|gauge| format!("{:+} {}", deltas.get(*gauge), gauge))
        .collect();
    if parts.is_empty() {
        "no change".to_string()
    } else {
        parts.join(", ")
    }
}

pub fn show_title<W: Write + ?Sized>(out: &mut W, target_days: u32) -> io::Result<()> {
    writeln!(out, "{}", rule().cyan())?;
    writeln!(out, "{}", "CASTAWAY - TERMINAL SURVIVAL".bright_cyan().bold())?;
    writeln!(out, "{}", rule().cyan())?;
    writeln!(out, "\nGoal: survive {target_days} days on a deserted island!")?;
    writeln!(out, "⚠️  Manage your hunger, thirst and energy to stay alive.")
}

pub fn show_main_menu<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\n{}", rule())?;
    writeln!(out, "{:^RULE_WIDTH$}", "MAIN MENU".bold())?;
    writeln!(out, "{}", rule())?;
    writeln!(out, "\n1. 🆕 New game")?;
    writeln!(out, "2. 📂 Load game")?;
    writeln!(out, "3. 🚪 Quit")?;
    writeln!(out, "\n{}", rule())
}

pub fn show_heading<W: Write + ?Sized>(out: &mut W, heading: &str) -> io::Result<()> {
    writeln!(out, "\n{}", rule())?;
    writeln!(out, "{heading:^RULE_WIDTH$}")?;
    writeln!(out, "{}", rule())
}

/// Day header, the three gauge bars, and alerts for critical gauges.
pub fn show_status<W: Write + ?Sized>(
    out: &mut W,
    state: &VitalState,
    alert_threshold: i32,
) -> io::Result<()> {
    writeln!(out, "\n{}", rule())?;
    writeln!(out, "📅 DAY {} - {}", state.day, state.name.bold())?;
    writeln!(out, "{}", rule())?;
    for gauge in Gauge::ALL {
        let value = state.gauge(gauge);
        let bar = gauge_bar(value);
        let bar = if value <= alert_threshold {
            bar.red()
        } else if value <= 50 {
            bar.yellow()
        } else {
            bar.green()
        };
        writeln!(
            out,
            "{} {}: {} {value}/100",
            gauge_glyph(gauge, value),
            gauge_label(gauge),
            bar
        )?;
    }
    writeln!(out, "{}", rule())?;

    let critical = state.critical_gauges(alert_threshold);
    if !critical.is_empty() {
        writeln!(out)?;
        for gauge in critical {
            writeln!(out, "{}", alert_text(gauge).red().bold())?;
        }
    }
    Ok(())
}

pub fn show_action_menu<W: Write + ?Sized>(
    out: &mut W,
    catalog: &ActionCatalog,
    state: &VitalState,
) -> io::Result<()> {
    writeln!(out, "\n🎮 WHAT DO YOU WANT TO DO?")?;
    writeln!(out, "{}", thin_rule())?;
    for (idx, action) in catalog.actions().iter().enumerate() {
        let line = format!(
            "  {}. {} {} - {}",
            idx + 1,
            action_glyph(action.id),
            action.label,
            action.description
        );
        if ActionCatalog::is_available(action, state) {
            writeln!(out, "{line}")?;
        } else {
            writeln!(
                out,
                "{} {}",
                line.dimmed(),
                format!("(needs {} energy)", action.energy_cost).dimmed()
            )?;
        }
    }
    writeln!(out, "\n  S. 💾 Save game")?;
    writeln!(out, "  Q. 🚪 Quit")?;
    writeln!(out, "{}", thin_rule())
}

/// Banner shown before a choice event asks for an answer.
pub fn show_event_banner<W: Write + ?Sized>(out: &mut W, event: &EventDef) -> io::Result<()> {
    writeln!(out, "\n{}", rule())?;
    writeln!(out, "📢 EVENT: {}", event.label.bold())?;
    writeln!(out, "{}", rule())?;
    writeln!(out, "{}", event.description)?;
    if event.is_choice() {
        writeln!(out, "\nOptions:")?;
        for option in event.options() {
            writeln!(out, "  {}. {}", option.key, option.label)?;
        }
    }
    Ok(())
}

/// Result of an applied event; automatic events get their banner here.
pub fn show_event_outcome<W: Write + ?Sized>(
    out: &mut W,
    outcome: &EventOutcome,
    def: Option<&EventDef>,
) -> io::Result<()> {
    if let Some(def) = def
        && !def.is_choice()
    {
        show_event_banner(out, def)?;
    }
    match outcome.tag {
        LOG_EVENT_FALLBACK => writeln!(
            out,
            "{}",
            "❌ Invalid choice. You fall back on the safe option.".red()
        )?,
        LOG_EVENT_RISK_WON => writeln!(out, "{}", "✅ The gamble paid off!".green())?,
        LOG_EVENT_RISK_LOST => writeln!(out, "{}", "❌ It failed. You wasted energy.".red())?,
        _ => {}
    }
    writeln!(out, "➡️  {}", format_deltas(&outcome.deltas))?;
    writeln!(out, "{}", rule())
}

/// Narrative for an action outcome, including any event met while exploring.
pub fn show_action_outcome<W: Write + ?Sized>(
    out: &mut W,
    action: &ActionDef,
    outcome: &ActionOutcome,
    event_def: Option<&EventDef>,
) -> io::Result<()> {
    writeln!(out, "\n{}", rule())?;
    writeln!(
        out,
        "⚡ ACTION: {} {}",
        action_glyph(action.id),
        action.label.bold()
    )?;
    writeln!(out, "{}", rule())?;

    let amount = outcome.amount.unwrap_or_default();
    match outcome.tag {
        LOG_TOO_EXHAUSTED => {
            let verb = match action.id {
                ActionId::Fish => "fish",
                ActionId::SearchWater => "search for water",
                ActionId::Sleep => "sleep",
                ActionId::Explore => "explore",
            };
            writeln!(out, "{}", format!("❌ You're too exhausted to {verb}!").red())?;
            writeln!(
                out,
                "   It needs {} energy. Sleep to recover.",
                action.energy_cost
            )?;
            return Ok(());
        }
        LOG_FISH_CATCH => writeln!(
            out,
            "{}",
            format!("✅ You catch a fish! (+{amount} hunger)").green()
        )?,
        LOG_FISH_MISS => writeln!(out, "{}", "❌ No catch today. You spent energy.".red())?,
        LOG_WATER_FOUND => writeln!(
            out,
            "{}",
            format!("✅ You find water! (+{amount} thirst)").green()
        )?,
        LOG_WATER_MISSED => writeln!(
            out,
            "{}",
            "❌ No water source found. You spent energy.".red()
        )?,
        LOG_FORAGE_CATCH => writeln!(out, "{}", format!("✅ Success! (+{amount})").green())?,
        LOG_FORAGE_MISS => writeln!(out, "{}", "❌ Nothing found. You spent energy.".red())?,
        LOG_SLEEP => {
            writeln!(
                out,
                "{}",
                format!("✅ You rest well. ({:+} energy)", outcome.deltas.energy).green()
            )?;
            writeln!(
                out,
                "⚠️  While sleeping: {:+} hunger, {:+} thirst",
                outcome.deltas.hunger, outcome.deltas.thirst
            )?;
        }
        LOG_EXPLORE_QUIET => writeln!(
            out,
            "🌲 You explore the area but find nothing particular."
        )?,
        _ => {}
    }
    if action.energy_cost > 0 {
        writeln!(out, "⚡ Energy consumed: -{}", action.energy_cost)?;
    }
    if let Some(event) = &outcome.event {
        show_event_outcome(out, event, event_def)?;
    } else {
        writeln!(out, "{}", rule())?;
    }
    Ok(())
}

pub fn show_decay<W: Write + ?Sized>(out: &mut W, decay: &GaugeDeltas) -> io::Result<()> {
    writeln!(
        out,
        "🌙 The night passes... ({})",
        format_deltas(decay).dimmed()
    )
}

pub fn show_quit_prompt<W: Write + ?Sized>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\n⚠️  Do you want to save before quitting?")?;
    writeln!(out, "1. Yes, save and quit")?;
    writeln!(out, "2. No, quit without saving")?;
    writeln!(out, "3. Cancel")
}

/// Game-over or victory screen.
pub fn show_summary<W: Write + ?Sized>(out: &mut W, summary: &ResultSummary) -> io::Result<()> {
    writeln!(out, "\n\n{}", rule())?;
    match summary.ending {
        Ending::Victory => {
            writeln!(out, "{:^RULE_WIDTH$}", "🎉 VICTORY! 🎉".green().bold())?;
            writeln!(out, "{}", rule())?;
            writeln!(out, "\n🏆 Congratulations {}!", summary.name)?;
            writeln!(out, "📅 {}", summary.headline)?;
            writeln!(out, "\n✨ You are a true survivor!")?;
        }
        Ending::Death(_) => {
            writeln!(out, "{:^RULE_WIDTH$}", "⚰️  GAME OVER  ⚰️".red().bold())?;
            writeln!(out, "{}", rule())?;
            writeln!(out, "\n{}", summary.headline)?;
            writeln!(out, "\n📅 You survived {} day(s).", summary.days)?;
            writeln!(out, "🎯 Goal: {} days", summary.target_days)?;
        }
    }
    writeln!(out, "\n{}", rule())
}

#[cfg(test)]
mod tests {
    use super::*;
    use castaway_game::{CauseOfDeath, result_summary};

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn bar_has_fixed_width() {
        assert_eq!(gauge_bar(100), format!("[{}]", "█".repeat(20)));
        assert_eq!(gauge_bar(0), format!("[{}]", "·".repeat(20)));
        assert_eq!(gauge_bar(55), format!("[{}{}]", "█".repeat(11), "·".repeat(9)));
        assert_eq!(gauge_bar(4), format!("[{}]", "·".repeat(20)));
    }

    #[test]
    fn glyphs_follow_levels() {
        assert_eq!(gauge_glyph(Gauge::Hunger, 20), "🍖");
        assert_eq!(gauge_glyph(Gauge::Hunger, 50), "🍞");
        assert_eq!(gauge_glyph(Gauge::Thirst, 90), "✅");
        assert_eq!(gauge_glyph(Gauge::Energy, 51), "⚡");
    }

    #[test]
    fn status_lists_alerts_for_critical_gauges() {
        let state = VitalState {
            hunger: 15,
            thirst: 20,
            energy: 21,
            ..VitalState::new("Ana")
        };
        let text = render(|out| show_status(out, &state, 20));
        assert!(text.contains("📅 DAY 1 - Ana"));
        assert!(text.contains("You're starving!"));
        assert!(text.contains("You're dying of thirst!"));
        assert!(!text.contains("You're exhausted!"));
        assert!(text.contains("15/100"));
    }

    #[test]
    fn menu_marks_unaffordable_actions() {
        let state = VitalState {
            energy: 12,
            ..VitalState::default()
        };
        let text = render(|out| show_action_menu(out, &ActionCatalog::default_catalog(), &state));
        assert!(text.contains("1. 🎣 Fish - Try to catch fish (needs 15 energy)"));
        assert!(text.contains("3. 😴 Sleep - Rest to recover energy\n"));
        assert!(text.contains("S. 💾 Save game"));
        assert!(text.contains("Q. 🚪 Quit"));
    }

    #[test]
    fn deltas_are_signed() {
        let deltas = GaugeDeltas {
            hunger: -10,
            thirst: 0,
            energy: 5,
        };
        assert_eq!(format_deltas(&deltas), "-10 hunger, +5 energy");
        assert_eq!(format_deltas(&GaugeDeltas::default()), "no change");
    }

    #[test]
    fn end_screens_show_headline() {
        let state = VitalState {
            day: 5,
            thirst: 0,
            ..VitalState::default()
        };
        let summary = result_summary(&state, Ending::Death(CauseOfDeath::Dehydration), 7);
        let text = render(|out| show_summary(out, &summary));
        assert!(text.contains("GAME OVER"));
        assert!(text.contains("Died of dehydration..."));
        assert!(text.contains("You survived 5 day(s)."));

        let summary = result_summary(&VitalState::new("Kai"), Ending::Victory, 7);
        let text = render(|out| show_summary(out, &summary));
        assert!(text.contains("VICTORY"));
        assert!(text.contains("You survived 7 full days!"));
    }
}
