//! Hex Rail headless host
//!
//! Commands:
//! - generate: Generate a map and print a terrain summary
//! - run: Simulate a game, optionally replaying a JSON action script

mod clock;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use hexrail_core::{
    era_label, format_money, month_name, GameAction, GameSettings, GameSpeed, GameState,
};

use crate::clock::SimulationClock;

#[derive(Parser)]
#[command(name = "hexrail")]
#[command(about = "Hex Rail railway tycoon simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a map and print a summary
    Generate {
        #[command(flatten)]
        game: GameArgs,
        /// Print the whole map as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the simulation
    Run(RunArgs),
}

/// Options shared by every command that creates a game.
#[derive(Args)]
struct GameArgs {
    /// Settings JSON file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    /// Terrain seed
    #[arg(long)]
    seed: Option<u32>,
    #[arg(long)]
    funds: Option<i64>,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    game: GameArgs,

    /// Months to simulate after the script
    #[arg(long, default_value = "12")]
    months: u32,

    /// Simulated frames per real second
    #[arg(long, default_value = "30")]
    fps: u32,

    /// Speed level 0-3
    #[arg(long)]
    speed: Option<u8>,

    /// JSON array of actions applied before the simulation starts
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Seed for gameplay randomness
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { game, json } => generate(&game, json),
        Commands::Run(args) => run(&args),
    }
}

/// Load settings from `--config` and apply flag overrides.
fn load_settings(args: &GameArgs) -> Result<GameSettings> {
    let mut settings = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            GameSettings::from_json_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => GameSettings::default(),
    };

    if let Some(width) = args.width {
        settings.map_width = width;
    }
    if let Some(height) = args.height {
        settings.map_height = height;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }
    if let Some(funds) = args.funds {
        settings.starting_funds = funds;
    }

    settings.validate()?;
    Ok(settings)
}

fn generate(args: &GameArgs, json: bool) -> Result<()> {
    let settings = load_settings(args)?;
    let (state, seed) = GameState::generate(&settings)?;
    let map = &state.map;

    if json {
        println!("{}", serde_json::to_string_pretty(map)?);
        return Ok(());
    }

    println!("Map {}x{} (seed {})", map.width, map.height, seed);
    for (terrain, count) in map.terrain_histogram() {
        println!("  {:<10} {:>5}", terrain.name(), count);
    }
    println!("Cities:");
    for city in &map.cities {
        println!("  {:<14} {:>6} at {}", city.name, city.population, city.hex);
    }
    println!("Resources: {}", map.resources.len());
    println!("Explored: {}", map.explored.len());
    Ok(())
}

fn load_script(path: &Path) -> Result<Vec<GameAction>> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let actions = serde_json::from_str(&text)
        .with_context(|| format!("parsing actions in {}", path.display()))?;
    Ok(actions)
}

fn run(args: &RunArgs) -> Result<()> {
    if args.fps == 0 {
        bail!("--fps must be at least 1");
    }

    let settings = load_settings(&args.game)?;
    let (mut state, seed) = GameState::generate(&settings)?;
    if let Some(rng_seed) = args.rng_seed {
        state.reseed(rng_seed);
    }
    if let Some(level) = args.speed {
        state.speed = GameSpeed::from_level(level);
    }
    info!(seed, cities = state.map.cities.len(), "game created");

    if let Some(path) = &args.script {
        for action in load_script(path)? {
            match state.apply(&action) {
                Ok(outcome) => info!(action = %action.description(), ?outcome, "applied"),
                Err(e) => warn!(action = %action.description(), error = %e, "rejected"),
            }
        }
    }

    if args.months > 0 && state.speed.is_paused() {
        bail!("cannot simulate months while paused; pass --speed 1-3");
    }

    let mut clock = SimulationClock::new(settings.month_seconds);
    let delta = 1.0 / args.fps as f64;
    let mut elapsed = 0;

    while elapsed < args.months {
        state.update_trains(delta);
        for _ in 0..clock.tick(delta, state.speed) {
            let report = state.advance_time();
            println!(
                "{} {}  income {:>8}  expenses {:>8}  funds {:>8}",
                month_name(report.month),
                report.year,
                format_money(report.income),
                format_money(report.expenses),
                format_money(report.funds),
            );
            elapsed += 1;
            if elapsed >= args.months {
                break;
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    let stats = state.network_stats();
    println!();
    println!(
        "{} {}, {}",
        month_name(state.month),
        state.year,
        era_label(state.era)
    );
    println!("Funds:         {}", format_money(state.funds));
    println!("Total revenue: {}", format_money(state.total_revenue));
    println!(
        "Network:       {} tracks, {} stations, {} trains, {} cities served",
        stats.tracks, stats.stations, stats.trains, stats.connected_cities
    );
    println!("Maintenance:   {}/month", format_money(stats.monthly_maintenance));
    println!("Research:      {} RP", state.research.available_points());
    for note in state.notifications.iter() {
        println!("  [{:?}] {}: {}", note.severity, note.title, note.text);
    }

    Ok(())
}
