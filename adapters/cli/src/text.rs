//! Plain-text snapshots of engine state for terminal output.

use std::collections::HashSet;

use elemental_trials_core::{CellCoord, Maze, MazeCell};
use elemental_trials_system_maze_traversal::MazeRun;
use elemental_trials_system_sliding_puzzle::SlidingPuzzle;

const WALL_GLYPH: char = '#';
const PASSAGE_GLYPH: char = ' ';
const START_GLYPH: char = 'S';
const GOAL_GLYPH: char = 'G';
const TRAIL_GLYPH: char = '~';
const RUNNER_GLYPH: char = '@';

/// Renders the puzzle as rows of tile labels; tiles are shown one-based and
/// the empty slot as `.`.
pub(crate) fn render_puzzle(puzzle: &SlidingPuzzle) -> String {
    let columns = puzzle.size().columns() as usize;
    let width = puzzle.tiles().len().to_string().len();
    let mut out = String::new();
    for row in puzzle.tiles().chunks(columns) {
        let labels: Vec<String> = row
            .iter()
            .map(|tile| match tile {
                Some(tile) => format!("{:>width$}", tile.get() + 1),
                None => format!("{:>width$}", "."),
            })
            .collect();
        out.push_str(&labels.join(" "));
        out.push('\n');
    }
    out
}

/// Renders the maze, overlaying the runner and its trail when provided.
pub(crate) fn render_maze(maze: &Maze, run: Option<&MazeRun>) -> String {
    let trail: HashSet<CellCoord> = run
        .map(|run| run.trail().iter().copied().collect())
        .unwrap_or_default();
    let runner = run.map(MazeRun::position);

    let mut out = String::new();
    for (row_index, row) in (0u32..).zip(maze.rows()) {
        for (column_index, cell) in (0u32..).zip(row) {
            let coord = CellCoord::new(column_index, row_index);
            let glyph = if Some(coord) == runner {
                RUNNER_GLYPH
            } else if coord == maze.goal() {
                GOAL_GLYPH
            } else if coord == maze.start() {
                START_GLYPH
            } else if trail.contains(&coord) {
                TRAIL_GLYPH
            } else if *cell == MazeCell::Wall {
                WALL_GLYPH
            } else {
                PASSAGE_GLYPH
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}
