use anyhow::{Context, Result};
use clap::Parser;
use game_core::content::DEMO_ARENA;
use game_core::{Game, PlayerIntent, SimConfig, StopReason, TileKind};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML run configuration: a `seed` plus an optional `[sim]` table
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// ASCII level layout; the built-in demo arena when omitted
    #[arg(short, long)]
    layout: Option<PathBuf>,
    /// Overrides the seed from the run configuration
    #[arg(short, long)]
    seed: Option<u64>,
    #[arg(short, long, default_value_t = 500)]
    turns: u32,
    /// Write the final level snapshot as JSON
    #[arg(long)]
    snapshot_out: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RunConfig {
    seed: u64,
    sim: SimConfig,
}

fn load_run_config(path: &Path) -> Result<RunConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read run config: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse run config: {}", path.display()))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).compact().init();
}

/// Auto-explores, then keeps the player waiting so monsters and fire play out
/// until the turn budget is spent or the run ends.
fn run(game: &mut Game, turns: u32) -> StopReason {
    game.set_auto_explore(true);
    let mut taken = 0;
    loop {
        let result = game.advance(turns - taken);
        taken += result.turns_taken;
        match result.stop_reason {
            StopReason::AwaitingInput => game.submit_intent(PlayerIntent::Wait),
            StopReason::Halted => {}
            other => return other,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_run_config(path)?,
        None => RunConfig::default(),
    };
    let seed = args.seed.unwrap_or(config.seed);
    let layout = match &args.layout {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout: {}", path.display()))?,
        None => DEMO_ARENA.to_string(),
    };

    let mut game = Game::from_layout(&layout, seed, config.sim).context("Failed to build level")?;
    info!(seed, turns = args.turns, "simulation starting");
    let stop = run(&mut game, args.turns);

    let grid = game.grid();
    let open = grid.positions().filter(|pos| grid.kind_at(*pos) != TileKind::Wall).count();
    let explored = grid
        .positions()
        .filter(|pos| grid.kind_at(*pos) != TileKind::Wall && grid.is_explored(*pos))
        .count();

    println!("Simulation complete.");
    println!("Seed: {seed}");
    println!("Turns: {}", game.turn());
    println!("Stop reason: {stop:?}");
    println!("Explored: {explored}/{open}");
    println!("Live entities: {}", game.scheduler().live_count());
    println!("Snapshot Hash: {}", game.snapshot_hash());

    if let Some(path) = &args.snapshot_out {
        let json = serde_json::to_string_pretty(&game.snapshot())
            .context("Failed to serialize snapshot")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
    }

    Ok(())
}
