// Board-state engine
// Mine placement, adjacency counting, cascading reveal, flags and win predicates

use rand::Rng;
use rand::seq::index;
use tracing::{debug, trace};

use crate::sl_error::BoardError;

/// A cell position, 0-indexed from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Coord { row, col }
    }
}

/// What lies under a single cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub mine: bool, // Contains a mine
    pub adj: u8,    // Adjacent mine count (0-8)
}

/// Result of a reveal on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Cell was already revealed or is flagged; nothing changed
    Ignored,
    /// Cell holds a mine. The board itself is left untouched
    Exploded,
    /// Cells newly opened by this reveal, in opening order
    Opened(Vec<Coord>),
}

impl RevealOutcome {
    pub fn is_mine(&self) -> bool {
        matches!(self, RevealOutcome::Exploded)
    }
}

/// Result of a flag toggle on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagOutcome {
    Ignored,
    Placed,
    Removed,
}

/// Check board parameters: `size > 0` and `0 < mines < size * size`
pub fn validate_params(size: usize, mines: usize) -> Result<(), BoardError> {
    let area = size.checked_mul(size).unwrap_or(0);
    if size == 0 || mines == 0 || mines >= area {
        return Err(BoardError::InvalidConfiguration { size, mines });
    }
    Ok(())
}

/// Square minefield with reveal and flag state.
///
/// State is kept in flat row-major vectors. `revealed` never holds a mine and
/// never overlaps `flagged`; both counters mirror their vectors.
#[derive(Debug, Clone)]
pub struct Board {
    size: usize,
    mine_count: usize,
    cells: Vec<Cell>,
    revealed: Vec<bool>,
    flagged: Vec<bool>,
    revealed_count: usize,
    flag_count: usize,
}

impl Board {
    /// Create a board with `mines` mines sampled uniformly without replacement
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        mines: usize,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        validate_params(size, mines)?;
        let mut board = Board::blank(size, mines);
        board.place_mines(rng);
        Ok(board)
    }

    /// Create a board with an explicit mine layout
    pub fn with_mines<I>(size: usize, mines: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mines: Vec<Coord> = mines.into_iter().collect();
        validate_params(size, mines.len())?;
        let mut board = Board::blank(size, mines.len());
        for coord in mines {
            let idx = board.index(coord)?;
            if board.cells[idx].mine {
                return Err(BoardError::InvalidConfiguration {
                    size,
                    mines: board.mine_count,
                });
            }
            board.cells[idx].mine = true;
        }
        board.compute_adjacency();
        Ok(board)
    }

    fn blank(size: usize, mines: usize) -> Self {
        let n = size * size;
        Board {
            size,
            mine_count: mines,
            cells: vec![Cell::default(); n],
            revealed: vec![false; n],
            flagged: vec![false; n],
            revealed_count: 0,
            flag_count: 0,
        }
    }

    /// Clear all reveal and flag state and draw a fresh mine layout
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.revealed.fill(false);
        self.flagged.fill(false);
        self.revealed_count = 0;
        self.flag_count = 0;
        self.place_mines(rng);
    }

    fn place_mines<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let n = self.cells.len();
        self.cells.fill(Cell::default());
        for idx in index::sample(rng, n, self.mine_count).into_iter() {
            self.cells[idx].mine = true;
        }
        self.compute_adjacency();
        debug!(
            "Placed {} mines on {}x{} board",
            self.mine_count, self.size, self.size
        );
    }

    fn compute_adjacency(&mut self) {
        for idx in 0..self.cells.len() {
            let adj = self
                .neighbor_indices(idx)
                .filter(|&n| self.cells[n].mine)
                .count();
            // at most eight neighbors
            self.cells[idx].adj = adj as u8;
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn flag_count(&self) -> usize {
        self.flag_count
    }

    /// Mine counter for display; negative when more flags than mines are placed
    pub fn remaining_mines(&self) -> isize {
        self.mine_count as isize - self.flag_count as isize
    }

    /// Flat index of an in-bounds coordinate
    fn index(&self, coord: Coord) -> Result<usize, BoardError> {
        if coord.row >= self.size || coord.col >= self.size {
            return Err(BoardError::CoordinateOutOfRange {
                row: coord.row,
                col: coord.col,
                size: self.size,
            });
        }
        Ok(coord.row * self.size + coord.col)
    }

    fn coord_of(&self, idx: usize) -> Coord {
        Coord::new(idx / self.size, idx % self.size)
    }

    fn neighbor_indices(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        let size = self.size;
        let (row, col) = (idx / size, idx % size);
        (row.saturating_sub(1)..=(row + 1).min(size - 1))
            .flat_map(move |r| {
                (col.saturating_sub(1)..=(col + 1).min(size - 1)).map(move |c| r * size + c)
            })
            .filter(move |&n| n != idx)
    }

    /// Moore neighborhood clipped to the board: 3 at a corner, 5 on an edge, 8 inside
    pub fn neighbors(&self, coord: Coord) -> Result<Vec<Coord>, BoardError> {
        let idx = self.index(coord)?;
        Ok(self.neighbor_indices(idx).map(|n| self.coord_of(n)).collect())
    }

    /// Number of mines around `coord`, regardless of reveal state
    pub fn adjacent_mine_count(&self, coord: Coord) -> Result<u8, BoardError> {
        Ok(self.cells[self.index(coord)?].adj)
    }

    pub fn is_mine(&self, coord: Coord) -> Result<bool, BoardError> {
        Ok(self.cells[self.index(coord)?].mine)
    }

    pub fn is_revealed(&self, coord: Coord) -> Result<bool, BoardError> {
        Ok(self.revealed[self.index(coord)?])
    }

    pub fn is_flagged(&self, coord: Coord) -> Result<bool, BoardError> {
        Ok(self.flagged[self.index(coord)?])
    }

    /// Reveal a cell and cascade through connected zero-count cells.
    ///
    /// The cascade uses a worklist instead of recursion. A cell is skipped when
    /// popped if it has been revealed meanwhile, and flagged cells are never
    /// opened, so flags keep fencing off the region they sit in.
    pub fn reveal(&mut self, coord: Coord) -> Result<RevealOutcome, BoardError> {
        let start = self.index(coord)?;
        if self.revealed[start] || self.flagged[start] {
            return Ok(RevealOutcome::Ignored);
        }
        if self.cells[start].mine {
            return Ok(RevealOutcome::Exploded);
        }

        let mut opened = Vec::new();
        let mut pending = vec![start];
        while let Some(idx) = pending.pop() {
            if self.revealed[idx] || self.flagged[idx] {
                continue;
            }
            self.revealed[idx] = true;
            self.revealed_count += 1;
            opened.push(self.coord_of(idx));

            if self.cells[idx].adj == 0 {
                pending.extend(self.neighbor_indices(idx).filter(|&n| {
                    !self.cells[n].mine && !self.revealed[n] && !self.flagged[n]
                }));
            }
        }
        trace!("Reveal at {:?} opened {} cells", coord, opened.len());
        Ok(RevealOutcome::Opened(opened))
    }

    /// Toggle the flag on a hidden cell; revealed cells are left alone
    pub fn toggle_flag(&mut self, coord: Coord) -> Result<FlagOutcome, BoardError> {
        let idx = self.index(coord)?;
        if self.revealed[idx] {
            return Ok(FlagOutcome::Ignored);
        }
        if self.flagged[idx] {
            self.flagged[idx] = false;
            self.flag_count -= 1;
            Ok(FlagOutcome::Removed)
        } else {
            self.flagged[idx] = true;
            self.flag_count += 1;
            Ok(FlagOutcome::Placed)
        }
    }

    /// True when every non-mine cell has been revealed
    pub fn is_cleared(&self) -> bool {
        self.revealed_count + self.mine_count == self.cells.len()
    }

    /// True when the flag set equals the mine set
    pub fn flags_match_mines(&self) -> bool {
        self.flag_count == self.mine_count
            && self
                .cells
                .iter()
                .zip(&self.flagged)
                .all(|(cell, &flagged)| cell.mine == flagged)
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.cells.len()).map(|idx| self.coord_of(idx))
    }

    pub fn mines(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords_where(|b, idx| b.cells[idx].mine)
    }

    pub fn flags(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords_where(|b, idx| b.flagged[idx])
    }

    pub fn revealed(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords_where(|b, idx| b.revealed[idx])
    }

    /// Mines without a flag on them
    pub fn unflagged_mines(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords_where(|b, idx| b.cells[idx].mine && !b.flagged[idx])
    }

    /// Flags placed on safe cells
    pub fn misplaced_flags(&self) -> impl Iterator<Item = Coord> + '_ {
        self.coords_where(|b, idx| b.flagged[idx] && !b.cells[idx].mine)
    }

    fn coords_where<F>(&self, pred: F) -> impl Iterator<Item = Coord> + '_
    where
        F: Fn(&Board, usize) -> bool + 'static,
    {
        (0..self.cells.len())
            .filter(move |&idx| pred(self, idx))
            .map(|idx| self.coord_of(idx))
    }
}
