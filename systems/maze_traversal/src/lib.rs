#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Traversal rules for the water flow trial.
//!
//! A [`MazeRun`] tracks the runner's position and every cell it has
//! visited. Walls simply block movement, but stepping back onto the trail is
//! fatal: the flow cannot be reversed. Reaching the goal wins the run. Both
//! outcomes are terminal and freeze the run.

use elemental_trials_core::{CellCoord, Direction, GridError, HeldDirections, Maze, RunState};
use log::{info, trace};

/// Authoritative state of a single traversal through a generated maze.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeRun {
    maze: Maze,
    speed: u32,
    position: CellCoord,
    trail: Vec<CellCoord>,
    state: RunState,
    ticks: u64,
}

impl MazeRun {
    /// Places a runner on the maze start with an empty trail.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidSpeed`] when `speed` is zero.
    pub fn new(maze: Maze, speed: u32) -> Result<Self, GridError> {
        if speed == 0 {
            return Err(GridError::InvalidSpeed);
        }
        let position = maze.start();
        Ok(Self {
            maze,
            speed,
            position,
            trail: Vec::new(),
            state: RunState::Running,
            ticks: 0,
        })
    }

    /// Attempts a single move of `speed` cells in `direction`.
    ///
    /// The destination must lie strictly inside the perimeter and be a
    /// passage; otherwise the runner stays put. Accepted moves extend the
    /// trail. Termination is evaluated by [`MazeRun::tick`], not here.
    pub fn step(&mut self, direction: Direction) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        let Some(destination) = self
            .position
            .offset(direction, self.speed)
            .filter(|cell| self.maze.is_interior(*cell) && self.maze.is_passage(*cell))
        else {
            trace!("blocked {direction:?} from {}", self.position);
            return false;
        };

        self.position = destination;
        self.trail.push(destination);
        trace!("moved {direction:?} to {destination}");
        true
    }

    /// Advances the run by one input tick.
    ///
    /// Every held direction is applied in the order up, down, left, right, so
    /// two perpendicular keys move diagonally within a single tick. Afterwards
    /// the run is lost if the runner stands on a cell visited before its most
    /// recent move, and won if it stands on the goal; reaching the goal takes
    /// precedence. Ticks after a terminal state change nothing.
    pub fn tick(&mut self, held: HeldDirections) -> RunState {
        if self.state.is_terminal() {
            return self.state;
        }
        self.ticks += 1;

        for direction in held.iter() {
            let _ = self.step(direction);
        }

        if self.crossed_trail() {
            self.state = RunState::Lost;
        }
        if self.position == self.maze.goal() {
            self.state = RunState::Won;
        }
        if self.state.is_terminal() {
            info!(
                "maze run finished as {:?} after {} ticks ({} cells visited)",
                self.state,
                self.ticks,
                self.trail.len()
            );
        }
        self.state
    }

    fn crossed_trail(&self) -> bool {
        self.trail
            .split_last()
            .is_some_and(|(_, earlier)| earlier.contains(&self.position))
    }

    /// Maze being traversed.
    #[must_use]
    pub const fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Cells covered by each accepted move.
    #[must_use]
    pub const fn speed(&self) -> u32 {
        self.speed
    }

    /// Current runner position.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Every cell entered by an accepted move, in visit order. The start cell
    /// only joins the trail once the runner moves back onto it.
    #[must_use]
    pub fn trail(&self) -> &[CellCoord] {
        &self.trail
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Number of ticks processed while running.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }
}
