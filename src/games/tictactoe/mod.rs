//! Tic-tac-toe against a computer opponent.

mod action;
mod outcome;
mod position;
pub mod rules;
mod selector;
mod session;
mod types;

pub use action::{Move, MoveError, MoveErrorKind, Turn};
pub use outcome::{GameOutcome, WinningLine};
pub use position::Position;
pub use rules::evaluate;
pub use selector::{
    Difficulty, EASY_BLOCK_CHANCE, EASY_WIN_CHANCE, MoveChoice, MoveReason, NoLegalMove,
    RandomSource, RngSource, choose, select_computer_move,
};
pub use session::{ComputerTurn, GameSession};
pub use types::{Board, CELL_COUNT, Cell, Mark, PlaceError};
