//! Bluey tic-tac-toe: a best-of-five tournament against the computer.
//!
//! # Architecture
//!
//! - **Games**: board model, win/draw evaluation, computer move selection
//!   and the single-game session state machine
//! - **Tournament**: series scoring, session clock, results export
//! - **Config**: tunable tournament parameters loaded from TOML
//!
//! # Example
//!
//! ```
//! use bluey_tictactoe::{
//!     Difficulty, RngSource, SystemClock, TournamentConfig, TournamentController,
//! };
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut controller = TournamentController::new(
//!     TournamentConfig::default(),
//!     SystemClock,
//!     RngSource(StdRng::seed_from_u64(7)),
//! );
//! controller.start_tournament("Bingo", Difficulty::Hard)?;
//! controller.submit_player_move(0)?;
//! let turn = controller.play_computer_move()?;
//! assert_eq!(turn.choice.map(|c| c.index), Some(4));
//! # Ok::<(), bluey_tictactoe::TournamentError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod games;
mod tournament;

// Crate-level exports - Configuration
pub use config::{ConfigError, TournamentConfig};

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{
    Board, CELL_COUNT, Cell, ComputerTurn, Difficulty, EASY_BLOCK_CHANCE, EASY_WIN_CHANCE,
    GameOutcome, GameSession, Mark, Move, MoveChoice, MoveError, MoveErrorKind, MoveReason,
    NoLegalMove, PlaceError, Position, RandomSource, RngSource, Turn, WinningLine, choose,
    evaluate, select_computer_move,
};

// Crate-level exports - Tic-tac-toe rule helpers
pub use games::tictactoe::rules;

// Crate-level exports - Tournament
pub use tournament::{
    Clock, EndReason, ExportError, GameRecord, ManualClock, PlayerResult, SeriesRules,
    SessionTimer, SystemClock, TSV_HEADER, TimerCheck, TournamentController, TournamentError,
    TournamentEvent, TournamentResult, TournamentState, TournamentStatus, elapsed_between,
    result_line, results_filename, results_tsv, summary, write_results,
};
