#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Elemental Trials engines.
//!
//! This crate defines the vocabulary that connects adapters with the pure
//! trial engines. Adapters translate clicks and held keys into [`CellCoord`]
//! and [`HeldDirections`] values, engines mutate their own state in response,
//! and adapters read back grid contents and a [`RunState`] to decide when a
//! trial is over. Nothing in here performs I/O.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Default number of maze cells along the horizontal axis.
///
/// Mirrors a 600 unit wide playfield divided into 15 unit cells.
pub const DEFAULT_MAZE_WIDTH: u32 = 40;
/// Default number of maze cells along the vertical axis.
pub const DEFAULT_MAZE_HEIGHT: u32 = 40;
/// Default number of cells the traversing agent covers per step.
pub const DEFAULT_MAZE_SPEED: u32 = 1;

const MIN_MAZE_EXTENT: u32 = 6;
const GOAL_INSET: u32 = 3;

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Moves the coordinate `distance` cells in `direction`.
    ///
    /// Returns `None` when the move would leave the non-negative quadrant or
    /// overflow.
    #[must_use]
    pub fn offset(self, direction: Direction, distance: u32) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::Up => (self.column, self.row.checked_sub(distance)?),
            Direction::Down => (self.column, self.row.checked_add(distance)?),
            Direction::Left => (self.column.checked_sub(distance)?, self.row),
            Direction::Right => (self.column.checked_add(distance)?, self.row),
        };
        Some(Self::new(column, row))
    }

    /// Returns the cell exactly halfway between two cells on the same axis.
    #[must_use]
    pub fn midpoint(self, other: CellCoord) -> CellCoord {
        Self::new(
            (self.column + other.column) / 2,
            (self.row + other.row) / 2,
        )
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Fixed rectangular dimensions of a grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Reports whether the cell falls inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Converts a cell into its row-major flattened index.
    #[must_use]
    pub fn index_of(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Converts a row-major flattened index back into a cell.
    #[must_use]
    pub fn cell_at(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cell_count() {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }
}

/// Cardinal movement directions available to the maze runner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in the order held keys are evaluated within a tick.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
}

/// Per-tick snapshot of which direction keys are currently held.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HeldDirections {
    /// Whether the up key is held.
    pub up: bool,
    /// Whether the down key is held.
    pub down: bool,
    /// Whether the left key is held.
    pub left: bool,
    /// Whether the right key is held.
    pub right: bool,
}

impl HeldDirections {
    /// Snapshot with no keys held.
    pub const NONE: HeldDirections = HeldDirections {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    /// Builds a snapshot with exactly the provided directions held.
    #[must_use]
    pub fn from_directions(directions: &[Direction]) -> Self {
        let mut held = Self::NONE;
        for direction in directions {
            held.set(*direction, true);
        }
        held
    }

    /// Reports whether `direction` is held.
    #[must_use]
    pub const fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Updates the held state for `direction`.
    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }

    /// Held directions in evaluation order: up, down, left, right.
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |direction| self.is_held(*direction))
    }
}

/// Identifier of a sliding puzzle tile; tile `i` belongs in slot `i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Contents of a single maze cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MazeCell {
    /// Solid cell that blocks movement.
    Wall,
    /// Carved cell the runner may occupy.
    Passage,
}

/// Rectangular maze grid addressed by `(column, row)`.
///
/// Interior lattice points sit on odd coordinates; the start is always
/// `(1, 1)` and the goal is inset three cells from the far corner. A `Maze`
/// cannot be edited once built; passages are opened through [`MazeCarver`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Maze {
    size: GridSize,
    cells: Vec<MazeCell>,
}

impl Maze {
    /// Creates a maze of the provided size with every cell walled.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] when the size cannot host a
    /// start and a goal on the odd lattice (see [`Maze::validate_size`]).
    pub fn walled(size: GridSize) -> Result<Self, GridError> {
        Self::validate_size(size)?;
        Ok(Self {
            size,
            cells: vec![MazeCell::Wall; size.cell_count()],
        })
    }

    /// Checks that a maze of `size` has room for distinct start and goal
    /// cells that both fall on odd coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] for extents smaller than six or
    /// odd extents, which would leave the goal on an uncarvable even
    /// coordinate.
    pub fn validate_size(size: GridSize) -> Result<(), GridError> {
        let invalid = |reason| GridError::InvalidDimensions {
            columns: size.columns(),
            rows: size.rows(),
            reason,
        };
        if size.columns() < MIN_MAZE_EXTENT || size.rows() < MIN_MAZE_EXTENT {
            return Err(invalid("maze extents must be at least six cells"));
        }
        if size.columns() % 2 != 0 || size.rows() % 2 != 0 {
            return Err(invalid("maze extents must be even so the goal lands on the odd lattice"));
        }
        Ok(())
    }

    /// Dimensions of the maze.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.columns()
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.rows()
    }

    /// Cell where carving and traversal begin.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        CellCoord::new(1, 1)
    }

    /// Cell the runner must reach to win.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        CellCoord::new(self.width() - GOAL_INSET, self.height() - GOAL_INSET)
    }

    /// Returns the contents of `cell`, or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<MazeCell> {
        self.size
            .index_of(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Reports whether `cell` is a carved passage.
    #[must_use]
    pub fn is_passage(&self, cell: CellCoord) -> bool {
        self.cell(cell) == Some(MazeCell::Passage)
    }

    /// Reports whether `cell` lies strictly inside the perimeter.
    #[must_use]
    pub const fn is_interior(&self, cell: CellCoord) -> bool {
        cell.column() > 0
            && cell.row() > 0
            && cell.column() < self.width() - 1
            && cell.row() < self.height() - 1
    }

    fn carve(&mut self, cell: CellCoord) {
        if let Some(index) = self.size.index_of(cell) {
            self.cells[index] = MazeCell::Passage;
        }
    }

    /// Number of carved passage cells.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| **cell == MazeCell::Passage)
            .count()
    }

    /// Iterates the maze row by row, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[MazeCell]> {
        self.cells.chunks(self.size.columns() as usize)
    }
}

impl<'de> Deserialize<'de> for Maze {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Encoded {
            size: GridSize,
            cells: Vec<MazeCell>,
        }

        let Encoded { size, cells } = Encoded::deserialize(deserializer)?;
        Maze::validate_size(size).map_err(<D::Error as de::Error>::custom)?;
        if cells.len() != size.cell_count() {
            return Err(<D::Error as de::Error>::custom(GridError::InvalidDimensions {
                columns: size.columns(),
                rows: size.rows(),
                reason: "cell data does not cover the maze extents",
            }));
        }
        Ok(Self { size, cells })
    }
}

/// Open grid a maze is carved into before it is frozen into a [`Maze`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeCarver {
    maze: Maze,
}

impl MazeCarver {
    /// Starts carving from a fully walled grid of `size`.
    ///
    /// # Errors
    ///
    /// Propagates [`Maze::validate_size`] failures.
    pub fn new(size: GridSize) -> Result<Self, GridError> {
        Ok(Self {
            maze: Maze::walled(size)?,
        })
    }

    /// Marks `cell` as a passage. Cells outside the grid are ignored.
    pub fn carve(&mut self, cell: CellCoord) {
        self.maze.carve(cell);
    }

    /// Read-only view of the grid carved so far.
    #[must_use]
    pub const fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Freezes the carved grid.
    #[must_use]
    pub fn finish(self) -> Maze {
        self.maze
    }
}

/// Validated dimensions and pacing for a maze trial.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeConfig {
    size: GridSize,
    speed: u32,
}

impl MazeConfig {
    /// Creates a new configuration from explicit values.
    #[must_use]
    pub const fn new(width: u32, height: u32, speed: u32) -> Self {
        Self {
            size: GridSize::new(width, height),
            speed,
        }
    }

    /// Dimensions of the maze to generate.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Number of cells covered by each accepted step.
    #[must_use]
    pub const fn speed(&self) -> u32 {
        self.speed
    }

    /// Checks the configuration against maze and traversal constraints.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] for unusable maze sizes and
    /// [`GridError::InvalidSpeed`] for a zero speed.
    pub fn validate(&self) -> Result<(), GridError> {
        Maze::validate_size(self.size)?;
        if self.speed == 0 {
            return Err(GridError::InvalidSpeed);
        }
        Ok(())
    }
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAZE_WIDTH, DEFAULT_MAZE_HEIGHT, DEFAULT_MAZE_SPEED)
    }
}

/// Lifecycle of a maze traversal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    /// The runner is still moving.
    #[default]
    Running,
    /// The runner reached the goal.
    Won,
    /// The runner crossed its own trail.
    Lost,
}

impl RunState {
    /// Reports whether no further input has any effect.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Reports whether the run ended at the goal.
    #[must_use]
    pub const fn is_won(self) -> bool {
        matches!(self, Self::Won)
    }
}

/// Caller contract violations rejected at the engine boundary.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The requested grid dimensions cannot host the trial.
    #[error("invalid {columns}x{rows} grid: {reason}")]
    InvalidDimensions {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
        /// Constraint the dimensions violate.
        reason: &'static str,
    },
    /// A flattened index exceeded the number of slots.
    #[error("index {index} is outside a grid of {len} slots")]
    IndexOutOfBounds {
        /// Index supplied by the caller.
        index: usize,
        /// Number of slots in the grid.
        len: usize,
    },
    /// A cell coordinate fell outside the grid.
    #[error("cell {cell} is outside a {columns}x{rows} grid")]
    CellOutOfBounds {
        /// Cell supplied by the caller.
        cell: CellCoord,
        /// Grid column count.
        columns: u32,
        /// Grid row count.
        rows: u32,
    },
    /// The traversal speed was zero.
    #[error("traversal speed must be at least one cell per step")]
    InvalidSpeed,
    /// A supplied tile layout was not a permutation with one empty slot.
    #[error("invalid tile layout: {0}")]
    InvalidTiles(&'static str),
    /// Solvable shuffling was requested on a grid where no tile can be
    /// rearranged into an unsolved but solvable layout.
    #[error("a {columns}x{rows} puzzle has no solvable unsolved arrangement")]
    UnsolvableRequest {
        /// Grid column count.
        columns: u32,
        /// Grid row count.
        rows: u32,
    },
}
