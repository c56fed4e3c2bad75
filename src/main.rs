//! Search Race entry point
//!
//! By default plays the referee protocol on stdin/stdout. Logs go to stderr
//! (`RUST_LOG=debug` shows per-tick search depth), since stdout belongs to the
//! referee.

use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use search_race::PlannerConfig;
use search_race::planner::Planner;
use search_race::protocol::{self, Command};
use search_race::race::run_race;

#[derive(Parser, Debug)]
#[command(name = "search-race", about = "Anytime beam-search pilot for Search Race")]
struct Args {
    /// JSON planner config (fields not given keep their defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// States kept per search round
    #[arg(long)]
    beam_width: Option<usize>,
    /// Per-tick time budget in milliseconds
    #[arg(long)]
    time_budget_ms: Option<u64>,
    /// Safety multiplier of the stop heuristic
    #[arg(long)]
    stop_factor: Option<f64>,
    /// Tiebreak RNG seed
    #[arg(long)]
    seed: Option<u64>,
    /// Race offline on the track in this file (protocol header format) and
    /// print a JSON summary instead of talking to a referee
    #[arg(long, value_name = "TRACK_FILE")]
    simulate: Option<PathBuf>,
    /// Tick limit for --simulate
    #[arg(long, default_value = "600")]
    max_ticks: u32,
}

impl Args {
    fn planner_config(&self) -> Result<PlannerConfig> {
        let mut config = match &self.config {
            Some(path) => PlannerConfig::load(path)?,
            None => PlannerConfig::default(),
        };
        if let Some(beam_width) = self.beam_width {
            config.beam_width = beam_width;
        }
        if let Some(time_budget_ms) = self.time_budget_ms {
            config.time_budget_ms = time_budget_ms;
        }
        if let Some(stop_factor) = self.stop_factor {
            config.stop_factor = stop_factor;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.planner_config().context("invalid planner configuration")?;
    log::info!(
        "Search Race starting (beam {}, budget {}ms, stop factor {})",
        config.beam_width,
        config.time_budget_ms,
        config.stop_factor
    );

    match &args.simulate {
        Some(path) => simulate(path, config, args.max_ticks),
        None => play(config),
    }
}

/// Referee loop: read the track once, then answer every tick
fn play(config: PlannerConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();

    let track = protocol::read_track(&mut input).context("failed to read track header")?;
    let mut planner = Planner::new(config)?;

    while let Some(tick) = protocol::read_tick(&mut input).context("failed to read tick")? {
        let remaining = track.remaining_from_index(tick.checkpoint_index);
        let decision = planner.plan(&track, remaining, &tick.car())?;
        writeln!(output, "{}", Command::from(&decision)).context("failed to write command")?;
        output.flush().context("failed to flush command")?;
    }

    log::info!("Input closed, exiting");
    Ok(())
}

fn simulate(path: &Path, config: PlannerConfig, max_ticks: u32) -> Result<()> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open track file {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let track = protocol::read_track(&mut reader)
        .with_context(|| format!("failed to parse track file {}", path.display()))?;

    let mut planner = Planner::new(config)?;
    let summary = run_race(&track, &mut planner, max_ticks)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
