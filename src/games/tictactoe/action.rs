//! Moves and the ways they can be refused.

use super::selector::NoLegalMove;
use super::types::{Mark, PlaceError};
use serde::{Deserialize, Serialize};

/// A mark placed on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Who moved.
    pub mark: Mark,
    /// Board index (0-8).
    pub index: usize,
}

impl Move {
    /// Creates a new move.
    pub fn new(mark: Mark, index: usize) -> Self {
        Self { mark, index }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.mark, self.index)
    }
}

/// Turn a game session is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Turn {
    /// The human player is to move.
    #[strum(to_string = "awaiting player move")]
    Player,
    /// The computer is to move.
    #[strum(to_string = "awaiting computer move")]
    Computer,
    /// The game has ended.
    #[strum(to_string = "finished")]
    Finished,
}

/// Broad category of a [`MoveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveErrorKind {
    /// Bad cell: out of range or occupied.
    InvalidMove,
    /// Right cell, wrong moment.
    IllegalMove,
    /// Computer asked to move on a full board.
    NoLegalMove,
}

/// Error returned when a move is refused. State is never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Index outside 0-8.
    #[display("Invalid move: cell {} is out of range (0-8)", _0)]
    OutOfRange(usize),

    /// The cell already holds a mark.
    #[display("Invalid move: cell {} is already occupied", _0)]
    Occupied(usize),

    /// The session is not waiting for this side to move.
    #[display("Illegal move: {} cannot move while {}", mover, turn)]
    WrongTurn {
        /// Side that tried to move.
        mover: Mark,
        /// What the session was waiting for.
        turn: Turn,
    },

    /// The selector found no empty cell.
    #[display("No legal move: the board is full")]
    NoLegalMove,
}

impl MoveError {
    /// Classifies this error.
    pub fn kind(&self) -> MoveErrorKind {
        match self {
            MoveError::OutOfRange(_) | MoveError::Occupied(_) => MoveErrorKind::InvalidMove,
            MoveError::WrongTurn { .. } => MoveErrorKind::IllegalMove,
            MoveError::NoLegalMove => MoveErrorKind::NoLegalMove,
        }
    }
}

impl std::error::Error for MoveError {}

impl From<PlaceError> for MoveError {
    fn from(err: PlaceError) -> Self {
        match err {
            PlaceError::OutOfRange(index) => MoveError::OutOfRange(index),
            PlaceError::Occupied(index) => MoveError::Occupied(index),
        }
    }
}

impl From<NoLegalMove> for MoveError {
    fn from(_: NoLegalMove) -> Self {
        MoveError::NoLegalMove
    }
}
