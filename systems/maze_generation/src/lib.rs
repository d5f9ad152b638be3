#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized depth-first backtracking carver for the water flow trial.
//!
//! Carving walks the odd-coordinate lattice starting at `(1, 1)`. Each step
//! picks an unvisited lattice neighbour two cells away uniformly at random,
//! opens the wall cell between them, and descends; dead ends pop the stack.
//! The result is a spanning tree over every interior lattice point.

use elemental_trials_core::{CellCoord, Direction, GridError, GridSize, Maze, MazeCarver};
use log::debug;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const LATTICE_STRIDE: u32 = 2;
const CARVE_ORDER: [Direction; 4] = [
    Direction::Right,
    Direction::Left,
    Direction::Down,
    Direction::Up,
];

/// Produces perfect mazes of a fixed, validated size.
#[derive(Clone, Debug)]
pub struct MazeGenerator {
    template: MazeCarver,
}

impl MazeGenerator {
    /// Creates a generator for mazes of the provided size.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] when the size cannot host a
    /// start and goal on the odd lattice.
    pub fn new(size: GridSize) -> Result<Self, GridError> {
        Ok(Self {
            template: MazeCarver::new(size)?,
        })
    }

    /// Dimensions of the mazes this generator produces.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.template.maze().size()
    }

    /// Carves a fresh maze using the supplied random source.
    pub fn generate<R>(&self, rng: &mut R) -> Maze
    where
        R: Rng + ?Sized,
    {
        let mut carver = self.template.clone();
        let start = carver.maze().start();
        carver.carve(start);

        let mut stack = vec![start];
        let mut unvisited = Vec::with_capacity(CARVE_ORDER.len());
        while let Some(&current) = stack.last() {
            carver.carve(current);

            let maze = carver.maze();
            unvisited.clear();
            unvisited.extend(
                CARVE_ORDER
                    .iter()
                    .filter_map(|direction| current.offset(*direction, LATTICE_STRIDE))
                    .filter(|neighbour| {
                        maze.is_interior(*neighbour) && !maze.is_passage(*neighbour)
                    }),
            );

            match unvisited.choose(rng) {
                Some(&next) => {
                    carver.carve(current.midpoint(next));
                    stack.push(next);
                }
                None => {
                    let _ = stack.pop();
                }
            }
        }

        let maze = carver.finish();
        debug!(
            "carved {} passage cells into a {}x{} maze",
            maze.passage_count(),
            maze.width(),
            maze.height()
        );
        maze
    }

    /// Carves a maze whose layout is fully determined by `seed`.
    #[must_use]
    pub fn generate_from_seed(&self, seed: u64) -> Maze {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate(&mut rng)
    }
}

/// Convenience wrapper that validates `size` and carves a single maze.
///
/// # Errors
///
/// Propagates [`MazeGenerator::new`] failures.
pub fn generate<R>(size: GridSize, rng: &mut R) -> Result<Maze, GridError>
where
    R: Rng + ?Sized,
{
    Ok(MazeGenerator::new(size)?.generate(rng))
}

/// Number of odd-coordinate lattice points strictly inside the perimeter.
#[must_use]
pub fn lattice_point_count(size: GridSize) -> usize {
    let across = size.columns().saturating_sub(2) / LATTICE_STRIDE;
    let down = size.rows().saturating_sub(2) / LATTICE_STRIDE;
    across as usize * down as usize
}

/// Reports whether `cell` sits on the odd-coordinate carving lattice.
#[must_use]
pub const fn is_lattice_point(cell: CellCoord) -> bool {
    cell.column() % 2 == 1 && cell.row() % 2 == 1
}
