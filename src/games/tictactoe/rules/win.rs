//! Win detection logic for tic-tac-toe.

use super::super::{Board, Cell, Mark, WinningLine};
use tracing::instrument;

/// Returns the first line (canonical order) fully held by `mark`.
#[instrument(skip(board))]
pub fn winning_line(board: &Board, mark: Mark) -> Option<WinningLine> {
    let held = Some(Cell::Marked(mark));
    WinningLine::ALL
        .into_iter()
        .find(|line| line.cells().iter().all(|&i| board.get(i) == held))
}

/// Whether `mark` would complete a line by playing the empty cell `index`.
pub(crate) fn wins_at(board: &Board, index: usize, mark: Mark) -> bool {
    board.is_empty(index) && winning_line(&board.with_mark(index, mark), mark).is_some()
}
