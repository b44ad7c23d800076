//! Game rules for tic-tac-toe.
//!
//! This module contains pure functions for evaluating game state
//! according to tic-tac-toe rules. Rules are separated from board
//! storage so the move selector can probe hypothetical boards.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::winning_line;

use super::{Board, GameOutcome, Mark};
use tracing::instrument;

/// Classifies `board` as a win, draw, or game still in progress.
///
/// Lines are scanned in canonical order and the first completed one is
/// reported, so the result is deterministic. The player's lines are checked
/// before the computer's; a board reachable by alternating play never has
/// both.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> GameOutcome {
    for mark in [Mark::Player, Mark::Computer] {
        if let Some(line) = winning_line(board, mark) {
            return GameOutcome::win_for(mark, line);
        }
    }

    if is_full(board) {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    }
}
