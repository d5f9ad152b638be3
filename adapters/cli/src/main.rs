#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs the elemental trials in a terminal.
//!
//! The earth trial reads `row col` clicks from stdin, the water trial reads
//! one line of held keys per tick. Both print the board as they go and a
//! final report in the requested format.

mod session;
mod text;

use std::{
    fmt,
    io::{self, Write},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use elemental_trials_core::{
    GridSize, MazeConfig, DEFAULT_MAZE_HEIGHT, DEFAULT_MAZE_SPEED, DEFAULT_MAZE_WIDTH,
};
use elemental_trials_system_maze_generation::MazeGenerator;
use elemental_trials_system_maze_traversal::MazeRun;
use elemental_trials_system_sliding_puzzle::{
    PuzzleConfig, SlidingPuzzle, DEFAULT_PUZZLE_COLUMNS, DEFAULT_PUZZLE_ROWS,
};
use log::info;
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "elemental-trials", version)]
#[command(about = "Terminal runner for the earth and water trials")]
struct Cli {
    #[command(subcommand)]
    trial: Trial,
}

#[derive(Debug, Subcommand)]
enum Trial {
    /// Earth trial: slide the tiles back into order, one `row col` click per line
    Puzzle(PuzzleArgs),
    /// Water trial: guide the flow to the goal, one line of held keys (u d l r) per tick
    Maze(MazeArgs),
    /// Print a freshly carved maze without playing it
    Carve(CarveArgs),
}

#[derive(Debug, Args)]
struct PuzzleArgs {
    /// Number of tile columns
    #[arg(long, default_value_t = DEFAULT_PUZZLE_COLUMNS)]
    columns: u32,

    /// Number of tile rows
    #[arg(long, default_value_t = DEFAULT_PUZZLE_ROWS)]
    rows: u32,

    /// Only deal layouts that can be slid back into order
    #[arg(long)]
    ensure_solvable: bool,

    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Debug, Args)]
struct MazeArgs {
    /// Maze width in cells; must be even and at least 6
    #[arg(long, default_value_t = DEFAULT_MAZE_WIDTH)]
    width: u32,

    /// Maze height in cells; must be even and at least 6
    #[arg(long, default_value_t = DEFAULT_MAZE_HEIGHT)]
    height: u32,

    /// Cells covered by each accepted move
    #[arg(long, default_value_t = DEFAULT_MAZE_SPEED)]
    speed: u32,

    #[command(flatten)]
    session: SessionArgs,
}

#[derive(Debug, Args)]
struct CarveArgs {
    /// Maze width in cells; must be even and at least 6
    #[arg(long, default_value_t = DEFAULT_MAZE_WIDTH)]
    width: u32,

    /// Maze height in cells; must be even and at least 6
    #[arg(long, default_value_t = DEFAULT_MAZE_HEIGHT)]
    height: u32,

    /// Seed for the carving RNG; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Args)]
struct SessionArgs {
    /// Seed for the trial RNG; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Format of the closing report
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(rand::random)
}

/// Entry point for the elemental trials command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut output = stdout.lock();

    match cli.trial {
        Trial::Puzzle(args) => {
            let seed = resolve_seed(args.session.seed);
            info!("dealing earth trial with seed {seed}");
            let config = PuzzleConfig::new(args.columns, args.rows)
                .with_ensure_solvable(args.ensure_solvable);
            let puzzle = SlidingPuzzle::from_seed(&config, seed)
                .context("failed to set up the earth trial")?;
            let report = session::play_puzzle(puzzle, seed, stdin.lock(), &mut output)?;
            write_report(&mut output, &report, args.session.report)?;
        }
        Trial::Maze(args) => {
            let seed = resolve_seed(args.session.seed);
            info!("carving water trial with seed {seed}");
            let config = MazeConfig::new(args.width, args.height, args.speed);
            config
                .validate()
                .context("failed to set up the water trial")?;
            let maze = MazeGenerator::new(config.size())?.generate_from_seed(seed);
            let run = MazeRun::new(maze, config.speed())?;
            let report = session::play_maze(run, seed, stdin.lock(), &mut output)?;
            write_report(&mut output, &report, args.session.report)?;
        }
        Trial::Carve(args) => {
            let seed = resolve_seed(args.seed);
            let maze = MazeGenerator::new(GridSize::new(args.width, args.height))
                .context("failed to carve maze")?
                .generate_from_seed(seed);
            write!(output, "{}", text::render_maze(&maze, None))?;
            writeln!(
                output,
                "seed {seed}, {} passage cells",
                maze.passage_count()
            )?;
        }
    }

    output.flush().context("failed to flush stdout")
}

fn write_report<W, T>(output: &mut W, report: &T, format: ReportFormat) -> Result<()>
where
    W: Write,
    T: Serialize + fmt::Display,
{
    match format {
        ReportFormat::Text => writeln!(output, "{report}")?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *output, report)
                .context("failed to encode report")?;
            writeln!(output)?;
        }
    }
    Ok(())
}
