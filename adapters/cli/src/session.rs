//! Line-driven trial sessions that feed stdin into the engines.

use std::{
    fmt,
    io::{BufRead, Write},
};

use anyhow::{Context, Result};
use elemental_trials_core::{CellCoord, Direction, HeldDirections, RunState};
use elemental_trials_system_maze_traversal::MazeRun;
use elemental_trials_system_sliding_puzzle::SlidingPuzzle;
use log::{info, warn};
use serde::Serialize;

use crate::text::{render_maze, render_puzzle};

/// Summary of a finished earth trial.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct PuzzleReport {
    pub(crate) seed: u64,
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) solved: bool,
    pub(crate) moves: u64,
}

impl fmt::Display for PuzzleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = if self.solved { "solved" } else { "unsolved" };
        write!(
            f,
            "earth trial {outcome}: {}x{} board, {} moves, seed {}",
            self.columns, self.rows, self.moves, self.seed
        )
    }
}

/// Summary of a finished water trial.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct MazeReport {
    pub(crate) seed: u64,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) state: RunState,
    pub(crate) ticks: u64,
    pub(crate) trail_length: usize,
    pub(crate) position: CellCoord,
}

impl fmt::Display for MazeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let outcome = match self.state {
            RunState::Running => "abandoned",
            RunState::Won => "won",
            RunState::Lost => "lost",
        };
        write!(
            f,
            "water trial {outcome}: {}x{} maze, {} ticks, {} cells flowed, ended at {}, seed {}",
            self.width, self.height, self.ticks, self.trail_length, self.position, self.seed
        )
    }
}

/// Plays the puzzle until it is solved or `input` runs dry.
///
/// Every non-blank line is a click formatted as `row col`.
pub(crate) fn play_puzzle<R, W>(
    mut puzzle: SlidingPuzzle,
    seed: u64,
    input: R,
    output: &mut W,
) -> Result<PuzzleReport>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{}", render_puzzle(&puzzle))?;

    let mut lines = input.lines();
    while !puzzle.is_solved() {
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read puzzle input")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some(cell) = parse_click(trimmed) else {
            warn!("ignoring malformed click {trimmed:?}; expected `row col`");
            continue;
        };
        match puzzle.attempt_move_at(cell) {
            Ok(true) => write!(output, "\n{}", render_puzzle(&puzzle))?,
            Ok(false) => {}
            Err(error) => warn!("ignoring click: {error}"),
        }
    }

    let solved = puzzle.is_solved();
    if solved {
        info!("earth trial solved in {} moves", puzzle.move_count());
        writeln!(output, "You've managed to master earth!")?;
    }
    Ok(PuzzleReport {
        seed,
        columns: puzzle.size().columns(),
        rows: puzzle.size().rows(),
        solved,
        moves: puzzle.move_count(),
    })
}

/// Plays the maze until the run ends or `input` runs dry.
///
/// Every line is one tick listing the held keys (`u`, `d`, `l`, `r` or the
/// full direction names); a blank line is a tick with nothing held.
pub(crate) fn play_maze<R, W>(
    mut run: MazeRun,
    seed: u64,
    input: R,
    output: &mut W,
) -> Result<MazeReport>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{}", render_maze(run.maze(), Some(&run)))?;

    let mut lines = input.lines();
    while !run.state().is_terminal() {
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("failed to read maze input")?;
        let state = run.tick(parse_held(&line));
        writeln!(
            output,
            "tick {}: {} {:?}",
            run.ticks(),
            run.position(),
            state
        )?;
    }

    write!(output, "{}", render_maze(run.maze(), Some(&run)))?;
    match run.state() {
        RunState::Won => writeln!(output, "You've managed to master water!")?,
        RunState::Lost => writeln!(output, "Flow can't be reversed...")?,
        RunState::Running => {}
    }

    Ok(MazeReport {
        seed,
        width: run.maze().width(),
        height: run.maze().height(),
        state: run.state(),
        ticks: run.ticks(),
        trail_length: run.trail().len(),
        position: run.position(),
    })
}

fn parse_click(line: &str) -> Option<CellCoord> {
    let mut fields = line.split_whitespace();
    let row = fields.next()?.parse().ok()?;
    let column = fields.next()?.parse().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some(CellCoord::new(column, row))
}

fn parse_held(line: &str) -> HeldDirections {
    let mut held = HeldDirections::NONE;
    for token in line.split_whitespace() {
        let direction = match token.to_ascii_lowercase().as_str() {
            "u" | "up" => Direction::Up,
            "d" | "down" => Direction::Down,
            "l" | "left" => Direction::Left,
            "r" | "right" => Direction::Right,
            _ => {
                warn!("ignoring unknown key {token:?}");
                continue;
            }
        };
        held.set(direction, true);
    }
    held
}
