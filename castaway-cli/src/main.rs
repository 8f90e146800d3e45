mod app;
mod display;
mod store;

use anyhow::{Context, Result};
use castaway_game::SurvivalConfig;
use clap::Parser;
use std::io;
use std::path::PathBuf;

use app::App;
use store::JsonFileStore;

#[derive(Debug, Parser)]
#[command(name = "castaway", version)]
#[command(about = "Survive a week on a deserted island - a terminal survival game")]
struct Args {
    /// JSON file overriding survival tuning (missing fields keep defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Days to survive for a victory
    #[arg(long)]
    target_days: Option<u32>,

    /// Seed for reproducible runs (OS entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding the save file
    #[arg(long, default_value = "saves")]
    save_dir: PathBuf,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    if args.no_color {
        colored::control::set_override(false);
    }

    let cfg = load_config(&args)?;
    log::debug!("survival config: {cfg:?}");
    let store = JsonFileStore::new(&args.save_dir);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut app = App::new(cfg, store, args.seed, stdin.lock(), stdout.lock());
    app.run()
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_config(args: &Args) -> Result<SurvivalConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SurvivalConfig::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SurvivalConfig::default(),
    };
    if let Some(days) = args.target_days {
        cfg.target_days = days;
    }
    cfg.validate().context("validating survival config")?;
    Ok(cfg)
}
