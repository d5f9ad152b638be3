#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Sliding-tile puzzle engine behind the earth mosaic trial.
//!
//! The engine owns a permutation of `columns * rows` slots with exactly one
//! empty slot. Construction shuffles every tile except the empty slot, which
//! stays in the bottom-right corner. Players swap the empty slot with an
//! orthogonally adjacent tile; anything else is silently ignored.

use elemental_trials_core::{CellCoord, GridError, GridSize, TileId};
use log::{debug, trace};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default number of tile columns.
pub const DEFAULT_PUZZLE_COLUMNS: u32 = 3;
/// Default number of tile rows.
pub const DEFAULT_PUZZLE_ROWS: u32 = 3;

/// Configuration parameters required to construct a puzzle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PuzzleConfig {
    size: GridSize,
    ensure_solvable: bool,
}

impl PuzzleConfig {
    /// Creates a configuration for a `columns x rows` puzzle using a plain
    /// uniform shuffle.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self {
            size: GridSize::new(columns, rows),
            ensure_solvable: false,
        }
    }

    /// Requests that shuffles be repaired so the layout can be solved.
    #[must_use]
    pub fn with_ensure_solvable(self, ensure_solvable: bool) -> Self {
        Self {
            ensure_solvable,
            ..self
        }
    }

    /// Dimensions of the puzzle grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Whether shuffles are restricted to solvable layouts.
    #[must_use]
    pub const fn ensure_solvable(&self) -> bool {
        self.ensure_solvable
    }

    /// Checks the configuration before any tiles are allocated.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] when either extent is zero or
    /// the grid holds more slots than a [`TileId`] can number, and
    /// [`GridError::UnsolvableRequest`] when solvable shuffling is requested on
    /// a single row or column, where the only solvable layout with the empty
    /// slot in the corner is the solved one.
    pub fn validate(&self) -> Result<(), GridError> {
        let columns = self.size.columns();
        let rows = self.size.rows();
        if columns == 0 || rows == 0 {
            return Err(GridError::InvalidDimensions {
                columns,
                rows,
                reason: "puzzle extents must be at least one tile",
            });
        }
        if u32::try_from(self.size.cell_count()).is_err() {
            return Err(GridError::InvalidDimensions {
                columns,
                rows,
                reason: "puzzle holds more slots than tile identifiers can number",
            });
        }
        if self.ensure_solvable && (columns < 2 || rows < 2) {
            return Err(GridError::UnsolvableRequest { columns, rows });
        }
        Ok(())
    }
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PUZZLE_COLUMNS, DEFAULT_PUZZLE_ROWS)
    }
}

/// Sliding-tile puzzle state.
///
/// Slots are addressed by row-major flattened index. `None` marks the single
/// empty slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlidingPuzzle {
    size: GridSize,
    tiles: Vec<Option<TileId>>,
    empty_index: usize,
    moves: u64,
}

impl SlidingPuzzle {
    /// Builds the identity layout and shuffles every tile except the empty
    /// slot, which stays in the final slot.
    ///
    /// The shuffle is redrawn until the layout is unsolved, so a fresh puzzle
    /// is only ever solved when it holds fewer than two tiles.
    ///
    /// # Errors
    ///
    /// Propagates [`PuzzleConfig::validate`] failures.
    pub fn new<R>(config: &PuzzleConfig, rng: &mut R) -> Result<Self, GridError>
    where
        R: Rng + ?Sized,
    {
        config.validate()?;
        let mut puzzle = Self::solved(config.size());
        puzzle.shuffle(config.ensure_solvable(), rng);
        debug!(
            "shuffled {}x{} puzzle (solvable: {})",
            puzzle.size.columns(),
            puzzle.size.rows(),
            puzzle.is_solvable()
        );
        Ok(puzzle)
    }

    /// Builds a puzzle whose shuffle is fully determined by `seed`.
    ///
    /// # Errors
    ///
    /// Propagates [`PuzzleConfig::validate`] failures.
    pub fn from_seed(config: &PuzzleConfig, seed: u64) -> Result<Self, GridError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::new(config, &mut rng)
    }

    /// Restores a puzzle from an explicit row-major layout.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] for a zero extent and
    /// [`GridError::InvalidTiles`] unless `tiles` holds exactly one empty slot
    /// and each tile `0..len-1` exactly once.
    pub fn from_tiles(size: GridSize, tiles: Vec<Option<TileId>>) -> Result<Self, GridError> {
        PuzzleConfig::new(size.columns(), size.rows()).validate()?;
        if tiles.len() != size.cell_count() {
            return Err(GridError::InvalidTiles("layout length does not match grid"));
        }

        let mut seen = vec![false; tiles.len()];
        let mut empty_index = None;
        for (slot, tile) in tiles.iter().enumerate() {
            match tile {
                None if empty_index.is_some() => {
                    return Err(GridError::InvalidTiles("more than one empty slot"));
                }
                None => empty_index = Some(slot),
                Some(tile) => {
                    let Some(flag) = usize::try_from(tile.get())
                        .ok()
                        .filter(|value| *value + 1 < tiles.len())
                        .and_then(|value| seen.get_mut(value))
                    else {
                        return Err(GridError::InvalidTiles("tile identifier out of range"));
                    };
                    if *flag {
                        return Err(GridError::InvalidTiles("duplicate tile identifier"));
                    }
                    *flag = true;
                }
            }
        }
        let empty_index = empty_index.ok_or(GridError::InvalidTiles("no empty slot"))?;

        Ok(Self {
            size,
            tiles,
            empty_index,
            moves: 0,
        })
    }

    fn solved(size: GridSize) -> Self {
        let last = size.cell_count() - 1;
        let tiles = (0..size.cell_count())
            .map(|slot| {
                u32::try_from(slot)
                    .ok()
                    .filter(|_| slot < last)
                    .map(TileId::new)
            })
            .collect();
        Self {
            size,
            tiles,
            empty_index: last,
            moves: 0,
        }
    }

    fn shuffle<R>(&mut self, ensure_solvable: bool, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let last = self.tiles.len() - 1;
        if last < 2 {
            return;
        }
        loop {
            self.tiles[..last].shuffle(rng);
            if ensure_solvable && !self.is_solvable() {
                self.tiles.swap(0, 1);
            }
            if !self.is_solved() {
                break;
            }
        }
    }

    /// Attempts to slide the tile at flattened `index` into the empty slot.
    ///
    /// Returns `Ok(true)` when the swap happened and `Ok(false)` when the tile
    /// is not orthogonally adjacent to the empty slot. Horizontal neighbours
    /// never wrap across a row boundary.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IndexOutOfBounds`] when `index` is past the last
    /// slot.
    pub fn attempt_move(&mut self, index: usize) -> Result<bool, GridError> {
        let len = self.tiles.len();
        if index >= len {
            return Err(GridError::IndexOutOfBounds { index, len });
        }
        if !self.is_adjacent_to_empty(index) {
            trace!(
                "ignored move of slot {index}: empty slot is {}",
                self.empty_index
            );
            return Ok(false);
        }

        self.tiles.swap(index, self.empty_index);
        self.empty_index = index;
        self.moves += 1;
        debug_assert_eq!(self.tiles[self.empty_index], None);
        trace!("moved slot {index} into the empty slot (move {})", self.moves);
        Ok(true)
    }

    /// Attempts a move addressed by grid cell, as produced by a click.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CellOutOfBounds`] when `cell` is outside the grid.
    pub fn attempt_move_at(&mut self, cell: CellCoord) -> Result<bool, GridError> {
        let index = self.size.index_of(cell).ok_or(GridError::CellOutOfBounds {
            cell,
            columns: self.size.columns(),
            rows: self.size.rows(),
        })?;
        self.attempt_move(index)
    }

    fn is_adjacent_to_empty(&self, index: usize) -> bool {
        let columns = self.size.columns() as usize;
        let empty = self.empty_index;
        index == empty + columns
            || index + columns == empty
            || (index % columns != 0 && index == empty + 1)
            || ((index + 1) % columns != 0 && index + 1 == empty)
    }

    /// Reports whether tile `i` sits in slot `i` for every slot but the last,
    /// which holds the empty slot.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        let Some((last, placed)) = self.tiles.split_last() else {
            return false;
        };
        last.is_none()
            && placed
                .iter()
                .enumerate()
                .all(|(slot, tile)| {
                    u32::try_from(slot).is_ok_and(|slot| *tile == Some(TileId::new(slot)))
                })
    }

    /// Reports whether legal moves can reach the solved layout.
    ///
    /// Uses the inversion parity of the tiles in reading order; on even-width
    /// grids the empty slot's row counted from the bottom joins the parity.
    /// Single-row and single-column grids can never reorder their tiles.
    #[must_use]
    pub fn is_solvable(&self) -> bool {
        let order: Vec<u32> = self
            .tiles
            .iter()
            .filter_map(|tile| tile.map(|tile| tile.get()))
            .collect();
        let columns = self.size.columns() as usize;
        let rows = self.size.rows() as usize;
        if columns == 1 || rows == 1 {
            return order.windows(2).all(|pair| pair[0] < pair[1]);
        }

        let inversions = count_inversions(&order);
        if columns % 2 == 1 {
            inversions % 2 == 0
        } else {
            let row_from_bottom = rows - self.empty_index / columns;
            (inversions + row_from_bottom) % 2 == 1
        }
    }

    /// Flattened indices whose tiles would move if selected now.
    #[must_use]
    pub fn movable_indices(&self) -> Vec<usize> {
        (0..self.tiles.len())
            .filter(|index| self.is_adjacent_to_empty(*index))
            .collect()
    }

    /// Dimensions of the puzzle grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Current row-major layout; `None` marks the empty slot.
    #[must_use]
    pub fn tiles(&self) -> &[Option<TileId>] {
        &self.tiles
    }

    /// Tile occupying `cell`, or `None` for the empty slot or a cell outside
    /// the grid.
    #[must_use]
    pub fn tile_at(&self, cell: CellCoord) -> Option<TileId> {
        self.size
            .index_of(cell)
            .and_then(|index| self.tiles.get(index).copied().flatten())
    }

    /// Flattened index of the empty slot.
    #[must_use]
    pub const fn empty_index(&self) -> usize {
        self.empty_index
    }

    /// Number of successful moves made since construction.
    #[must_use]
    pub const fn move_count(&self) -> u64 {
        self.moves
    }
}

fn count_inversions(order: &[u32]) -> usize {
    order
        .iter()
        .enumerate()
        .map(|(position, tile)| {
            order[position + 1..]
                .iter()
                .filter(|later| *later < tile)
                .count()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    const E: Option<TileId> = None;

    fn layout(values: &[Option<u32>]) -> Vec<Option<TileId>> {
        values.iter().map(|value| value.map(TileId::new)).collect()
    }

    fn centre_empty() -> SlidingPuzzle {
        let tiles = layout(&[
            Some(0),
            Some(1),
            Some(2),
            Some(3),
            None,
            Some(4),
            Some(6),
            Some(7),
            Some(5),
        ]);
        SlidingPuzzle::from_tiles(GridSize::new(3, 3), tiles).expect("valid layout")
    }

    #[test]
    fn orthogonal_neighbours_of_centre_move() {
        for index in [1, 3, 5, 7] {
            let mut puzzle = centre_empty();
            assert_eq!(puzzle.attempt_move(index), Ok(true), "slot {index}");
            assert_eq!(puzzle.empty_index(), index);
            assert_eq!(puzzle.tiles()[4], centre_empty().tiles()[index]);
            assert_eq!(puzzle.move_count(), 1);
        }
    }

    #[test]
    fn diagonal_neighbours_of_centre_are_ignored() {
        for index in [0, 2, 6, 8, 4] {
            let mut puzzle = centre_empty();
            assert_eq!(puzzle.attempt_move(index), Ok(false), "slot {index}");
            assert_eq!(puzzle, centre_empty());
        }
    }

    #[test]
    fn horizontal_moves_do_not_wrap_rows() {
        let tiles = layout(&[
            Some(0),
            Some(1),
            Some(2),
            None,
            Some(3),
            Some(4),
            Some(5),
            Some(6),
            Some(7),
        ]);
        let mut puzzle = SlidingPuzzle::from_tiles(GridSize::new(3, 3), tiles).expect("valid");
        assert_eq!(puzzle.attempt_move(2), Ok(false));
        assert_eq!(puzzle.empty_index(), 3);
        assert_eq!(puzzle.movable_indices(), vec![0, 4, 6]);
    }

    #[test]
    fn solved_layout_is_detected() {
        let solved = SlidingPuzzle::from_tiles(
            GridSize::new(3, 3),
            (0..8).map(|value| Some(TileId::new(value))).chain([E]).collect(),
        )
        .expect("valid");
        assert!(solved.is_solved());

        let mut almost = SlidingPuzzle::from_tiles(
            GridSize::new(3, 3),
            layout(&[
                Some(0),
                Some(1),
                Some(2),
                Some(3),
                Some(4),
                Some(5),
                Some(6),
                None,
                Some(7),
            ]),
        )
        .expect("valid");
        assert!(!almost.is_solved());
        assert_eq!(almost.attempt_move(8), Ok(true));
        assert!(almost.is_solved());
    }

    #[test]
    fn solvability_follows_inversion_parity() {
        let swapped = SlidingPuzzle::from_tiles(
            GridSize::new(3, 3),
            layout(&[
                Some(1),
                Some(0),
                Some(2),
                Some(3),
                Some(4),
                Some(5),
                Some(6),
                Some(7),
                None,
            ]),
        )
        .expect("valid");
        assert!(!swapped.is_solvable());
        assert!(centre_empty().is_solvable());

        let even_width = SlidingPuzzle::from_tiles(
            GridSize::new(2, 2),
            layout(&[Some(0), None, Some(2), Some(1)]),
        )
        .expect("valid");
        assert!(even_width.is_solvable());
    }

    #[test]
    fn out_of_range_inputs_are_rejected() {
        let mut puzzle = centre_empty();
        assert_eq!(
            puzzle.attempt_move(9),
            Err(GridError::IndexOutOfBounds { index: 9, len: 9 })
        );
        assert!(matches!(
            puzzle.attempt_move_at(CellCoord::new(3, 0)),
            Err(GridError::CellOutOfBounds { .. })
        ));
        assert_eq!(puzzle.attempt_move_at(CellCoord::new(1, 0)), Ok(true));
        assert_eq!(puzzle.empty_index(), 1);
    }

    #[test]
    fn malformed_layouts_are_rejected() {
        let size = GridSize::new(2, 2);
        assert!(SlidingPuzzle::from_tiles(size, layout(&[Some(0), Some(1), Some(2)])).is_err());
        assert!(SlidingPuzzle::from_tiles(size, layout(&[Some(0), None, Some(1), None])).is_err());
        assert!(
            SlidingPuzzle::from_tiles(size, layout(&[Some(0), Some(0), Some(1), None])).is_err()
        );
        assert!(
            SlidingPuzzle::from_tiles(size, layout(&[Some(0), Some(3), Some(1), None])).is_err()
        );
        assert!(
            SlidingPuzzle::from_tiles(size, layout(&[Some(0), Some(1), Some(2), Some(3)]))
                .is_err()
        );
    }

    #[test]
    fn config_validation_guards_extents() {
        assert!(matches!(
            PuzzleConfig::new(0, 3).validate(),
            Err(GridError::InvalidDimensions { .. })
        ));
        assert_eq!(
            PuzzleConfig::new(4, 1).with_ensure_solvable(true).validate(),
            Err(GridError::UnsolvableRequest {
                columns: 4,
                rows: 1
            })
        );
        assert!(PuzzleConfig::default().validate().is_ok());
    }

    #[test]
    fn grids_beyond_tile_numbering_are_rejected_before_allocating() {
        let oversized = PuzzleConfig::new(65_536, 65_536);
        assert!(matches!(
            oversized.validate(),
            Err(GridError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            SlidingPuzzle::from_seed(&oversized, 0),
            Err(GridError::InvalidDimensions { .. })
        ));
        assert!(PuzzleConfig::new(65_535, 65_536).validate().is_ok());
    }

    #[test]
    fn tiny_puzzles_start_solved() {
        let puzzle = SlidingPuzzle::from_seed(&PuzzleConfig::new(1, 1), 3).expect("valid");
        assert!(puzzle.is_solved());
        assert_eq!(puzzle.tiles(), &[E]);
    }

    #[test]
    fn inversions_are_counted_pairwise() {
        assert_eq!(count_inversions(&[0, 1, 2]), 0);
        assert_eq!(count_inversions(&[2, 1, 0]), 3);
        assert_eq!(count_inversions(&[1, 0, 3, 2]), 2);
    }
}
