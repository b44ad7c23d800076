//! Core domain types for tic-tac-toe.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 9;

/// Who placed a mark.
///
/// The human player always plays X and moves first; the computer plays O.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Mark {
    /// The human player's mark (X).
    #[strum(to_string = "X")]
    Player,
    /// The computer's mark (O).
    #[strum(to_string = "O")]
    Computer,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::Player => Mark::Computer,
            Mark::Computer => Mark::Player,
        }
    }

    /// Board symbol for this mark.
    pub fn symbol(self) -> char {
        match self {
            Mark::Player => 'X',
            Mark::Computer => 'O',
        }
    }
}

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nobody has played here.
    #[default]
    Empty,
    /// Cell holds a mark.
    Marked(Mark),
}

/// Reasons a placement is refused by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum PlaceError {
    /// Index outside 0-8.
    #[display("Cell {} is out of range (0-8)", _0)]
    OutOfRange(usize),
    /// Cell already holds a mark.
    #[display("Cell {} is already occupied", _0)]
    Occupied(usize),
}

impl std::error::Error for PlaceError {}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; CELL_COUNT],
        }
    }

    /// Builds a board from a 9-character picture: `X`, `O`, anything else is empty.
    ///
    /// Handy for setting up positions: `Board::from_picture("XX.OO....")`.
    pub fn from_picture(picture: &str) -> Self {
        let mut board = Self::new();
        for (index, symbol) in picture.chars().take(CELL_COUNT).enumerate() {
            board.cells[index] = match symbol {
                'X' | 'x' => Cell::Marked(Mark::Player),
                'O' | 'o' => Cell::Marked(Mark::Computer),
                _ => Cell::Empty,
            };
        }
        board
    }

    /// Places `mark` at `index`.
    ///
    /// # Errors
    ///
    /// [`PlaceError::OutOfRange`] for an index past 8, [`PlaceError::Occupied`]
    /// when the cell already holds a mark. The board is unchanged on error.
    #[instrument(skip(self))]
    pub fn place(&mut self, index: usize, mark: Mark) -> Result<(), PlaceError> {
        match self.cells.get(index) {
            None => Err(PlaceError::OutOfRange(index)),
            Some(Cell::Marked(_)) => Err(PlaceError::Occupied(index)),
            Some(Cell::Empty) => {
                self.cells[index] = Cell::Marked(mark);
                Ok(())
            }
        }
    }

    /// Gets the cell at `index`, or `None` past the edge of the board.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks if the cell at `index` exists and is empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// True when no empty cells remain.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Clears every cell.
    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; CELL_COUNT];
    }

    /// Indices of empty cells, ascending.
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELL_COUNT).filter(|&i| self.is_empty(i)).collect()
    }

    /// Number of cells holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.cells
            .iter()
            .filter(|c| **c == Cell::Marked(mark))
            .count()
    }

    /// Returns all cells as a slice.
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Copy of this board with `mark` written at `index`, ignoring occupancy.
    ///
    /// Used for one-ply look-ahead; callers only probe empty cells.
    pub(crate) fn with_mark(&self, index: usize, mark: Mark) -> Self {
        let mut probe = self.clone();
        probe.cells[index] = Cell::Marked(mark);
        probe
    }

    /// Formats the board as a human-readable string.
    ///
    /// Empty cells show their 1-based number so a player can type it.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                let symbol = match self.cells[pos] {
                    Cell::Empty => char::from(b'1' + pos as u8),
                    Cell::Marked(mark) => mark.symbol(),
                };
                result.push(symbol);
                if col < 2 {
                    result.push('|');
                }
            }
            if row < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}
