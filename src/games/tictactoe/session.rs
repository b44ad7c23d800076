//! One game of tic-tac-toe between the player (X) and the computer (O).
//!
//! The session is a small state machine:
//!
//! ```text
//! Player --valid move--> Computer --selector move--> Player
//!    \                      \
//!     `--terminal--> Finished <--terminal--'
//! ```
//!
//! A move in the wrong state or on a bad cell is refused and leaves the
//! session untouched.

use super::action::{Move, MoveError, Turn};
use super::outcome::GameOutcome;
use super::rules::evaluate;
use super::selector::{Difficulty, MoveChoice, RandomSource, choose};
use super::types::{Board, Mark};
use tracing::{debug, error, instrument, warn};

/// What the computer did on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputerTurn {
    /// The chosen cell; `None` only if the board was unexpectedly full.
    pub choice: Option<MoveChoice>,
    /// Board evaluation after the move.
    pub outcome: GameOutcome,
}

/// A single game in progress or finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    board: Board,
    turn: Turn,
    outcome: GameOutcome,
    history: Vec<Move>,
}

impl GameSession {
    /// Creates a new game: empty board, player to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Turn::Player,
            outcome: GameOutcome::InProgress,
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns whose move the session is waiting for.
    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// Latest evaluation of the board.
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// True once a win or draw has been reached.
    pub fn is_finished(&self) -> bool {
        self.turn == Turn::Finished
    }

    /// Moves played so far, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Clears the board and hands the first move back to the player.
    #[instrument(skip(self))]
    pub fn restart(&mut self) {
        self.board.reset();
        self.history.clear();
        self.turn = Turn::Player;
        self.outcome = GameOutcome::InProgress;
    }

    /// Places the player's mark at `index`.
    ///
    /// # Errors
    ///
    /// [`MoveError::WrongTurn`] unless the player is to move;
    /// [`MoveError::OutOfRange`] / [`MoveError::Occupied`] for a bad cell.
    #[instrument(skip(self))]
    pub fn submit_player_move(&mut self, index: usize) -> Result<GameOutcome, MoveError> {
        self.expect_turn(Mark::Player)?;
        self.apply(Move::new(Mark::Player, index))
    }

    /// Lets the computer choose and play a cell.
    ///
    /// A full board here means a terminal state was missed; it is logged and
    /// the game is closed as a draw rather than failing.
    ///
    /// # Errors
    ///
    /// [`MoveError::WrongTurn`] unless the computer is to move.
    #[instrument(skip(self, rng))]
    pub fn play_computer_move(
        &mut self,
        difficulty: Difficulty,
        rng: &mut dyn RandomSource,
    ) -> Result<ComputerTurn, MoveError> {
        self.expect_turn(Mark::Computer)?;

        let choice = match choose(&self.board, difficulty, rng) {
            Ok(choice) => choice,
            Err(err) => {
                error!(error = %err, board = ?self.board, "Computer asked to move on a full board");
                let outcome = match evaluate(&self.board) {
                    GameOutcome::InProgress => GameOutcome::Draw,
                    outcome => outcome,
                };
                self.finish(outcome);
                return Ok(ComputerTurn {
                    choice: None,
                    outcome,
                });
            }
        };

        let outcome = self.apply(Move::new(Mark::Computer, choice.index))?;
        Ok(ComputerTurn {
            choice: Some(choice),
            outcome,
        })
    }

    fn expect_turn(&self, mover: Mark) -> Result<(), MoveError> {
        let expected = match mover {
            Mark::Player => Turn::Player,
            Mark::Computer => Turn::Computer,
        };
        if self.turn == expected {
            Ok(())
        } else {
            warn!(%mover, turn = %self.turn, "Move out of turn rejected");
            Err(MoveError::WrongTurn {
                mover,
                turn: self.turn,
            })
        }
    }

    fn apply(&mut self, action: Move) -> Result<GameOutcome, MoveError> {
        self.board.place(action.index, action.mark).map_err(|err| {
            warn!(%action, error = %err, "Invalid move rejected");
            MoveError::from(err)
        })?;
        self.history.push(action);

        let outcome = evaluate(&self.board);
        if outcome.is_terminal() {
            self.finish(outcome);
        } else {
            self.turn = match action.mark {
                Mark::Player => Turn::Computer,
                Mark::Computer => Turn::Player,
            };
        }
        debug!(%action, %outcome, turn = %self.turn, "Move applied");
        Ok(outcome)
    }

    fn finish(&mut self, outcome: GameOutcome) {
        self.turn = Turn::Finished;
        self.outcome = outcome;
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::{MoveErrorKind, RngSource};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_full_board_on_computer_turn_closes_as_draw() {
        // Unreachable through the public API: a full drawn board still
        // waiting on the computer.
        let mut session = GameSession {
            board: Board::from_picture("XOXXOOOXX"),
            turn: Turn::Computer,
            outcome: GameOutcome::InProgress,
            history: Vec::new(),
        };
        let mut rng = RngSource(StdRng::seed_from_u64(1));

        let turn = session
            .play_computer_move(Difficulty::Hard, &mut rng)
            .expect("handled as a draw");

        assert_eq!(turn.choice, None);
        assert_eq!(turn.outcome, GameOutcome::Draw);
        assert!(session.is_finished());

        let err = session
            .play_computer_move(Difficulty::Hard, &mut rng)
            .unwrap_err();
        assert_eq!(err.kind(), MoveErrorKind::IllegalMove);
    }

    #[test]
    fn test_restart_clears_board_and_turn() {
        let mut session = GameSession::new();
        session.submit_player_move(4).unwrap();
        session.restart();
        assert_eq!(session, GameSession::new());
    }
}
