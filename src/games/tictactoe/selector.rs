//! Computer move selection.
//!
//! Two strengths are offered. [`Difficulty::Hard`] runs a fixed priority
//! cascade (win, block, center, corner, side). [`Difficulty::Easy`] only
//! sometimes takes a win or blocks a threat and otherwise plays anywhere,
//! which keeps games winnable for young players.
//!
//! All randomness flows through [`RandomSource`] so callers can inject a
//! seeded or scripted source.

use super::position::Position;
use super::rules::win::wins_at;
use super::types::{Board, CELL_COUNT, Mark};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Probability that Easy mode looks for its own winning move.
pub const EASY_WIN_CHANCE: f64 = 0.3;

/// Probability that Easy mode looks for a player threat to block.
pub const EASY_BLOCK_CHANCE: f64 = 0.4;

/// Computer strength, fixed for a whole tournament.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Mostly random play with occasional wins and blocks.
    #[default]
    Easy,
    /// Deterministic heuristic play.
    Hard,
}

impl Difficulty {
    /// Returns the display label for this difficulty.
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Bluey Mode",
            Difficulty::Hard => "Dad Mode",
        }
    }
}

/// Source of the random decisions made during move selection.
pub trait RandomSource {
    /// Bernoulli trial: true with probability `p`.
    fn chance(&mut self, p: f64) -> bool;

    /// Uniform index in `0..len`. Only called with `len > 0`.
    fn pick(&mut self, len: usize) -> usize;
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: rand::Rng> RandomSource for RngSource<R> {
    fn chance(&mut self, p: f64) -> bool {
        self.0.random_bool(p.clamp(0.0, 1.0))
    }

    fn pick(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }
}

/// Why the selector picked a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum MoveReason {
    /// Completes a computer line.
    Win,
    /// Stops a player line.
    Block,
    /// Took the free center.
    Center,
    /// Took a free corner.
    Corner,
    /// Took a free side.
    Side,
    /// Uniform pick among empty cells.
    Random,
}

/// A selected cell together with the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveChoice {
    /// Board index (0-8).
    pub index: usize,
    /// Rule that chose it.
    pub reason: MoveReason,
}

impl MoveChoice {
    fn new(index: usize, reason: MoveReason) -> Self {
        Self { index, reason }
    }
}

/// The board has no empty cell to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("No legal move: the board is full")]
pub struct NoLegalMove;

impl std::error::Error for NoLegalMove {}

/// Picks the computer's next cell.
///
/// # Errors
///
/// [`NoLegalMove`] when the board is full.
#[instrument(skip(board, rng))]
pub fn select_computer_move(
    board: &Board,
    difficulty: Difficulty,
    rng: &mut dyn RandomSource,
) -> Result<usize, NoLegalMove> {
    choose(board, difficulty, rng).map(|choice| choice.index)
}

/// Picks the computer's next cell and reports which rule fired.
///
/// # Errors
///
/// [`NoLegalMove`] when the board is full.
#[instrument(skip(board, rng))]
pub fn choose(
    board: &Board,
    difficulty: Difficulty,
    rng: &mut dyn RandomSource,
) -> Result<MoveChoice, NoLegalMove> {
    if board.is_full() {
        return Err(NoLegalMove);
    }

    let choice = match difficulty {
        Difficulty::Hard => choose_hard(board, rng),
        Difficulty::Easy => choose_easy(board, rng),
    }
    .ok_or(NoLegalMove)?;

    debug!(index = choice.index, reason = %choice.reason, "Computer chose cell");
    Ok(choice)
}

fn choose_hard(board: &Board, rng: &mut dyn RandomSource) -> Option<MoveChoice> {
    if let Some(index) = first_winning_cell(board, Mark::Computer) {
        return Some(MoveChoice::new(index, MoveReason::Win));
    }
    if let Some(index) = first_winning_cell(board, Mark::Player) {
        return Some(MoveChoice::new(index, MoveReason::Block));
    }
    if board.is_empty(Position::Center.to_index()) {
        return Some(MoveChoice::new(
            Position::Center.to_index(),
            MoveReason::Center,
        ));
    }
    if let Some(pos) = pick_open(board, &Position::CORNERS, rng) {
        return Some(MoveChoice::new(pos.to_index(), MoveReason::Corner));
    }
    pick_open(board, &Position::SIDES, rng)
        .map(|pos| MoveChoice::new(pos.to_index(), MoveReason::Side))
}

fn choose_easy(board: &Board, rng: &mut dyn RandomSource) -> Option<MoveChoice> {
    if rng.chance(EASY_WIN_CHANCE)
        && let Some(index) = first_winning_cell(board, Mark::Computer)
    {
        return Some(MoveChoice::new(index, MoveReason::Win));
    }
    if rng.chance(EASY_BLOCK_CHANCE)
        && let Some(index) = first_winning_cell(board, Mark::Player)
    {
        return Some(MoveChoice::new(index, MoveReason::Block));
    }

    let open = board.empty_cells();
    if open.is_empty() {
        return None;
    }
    Some(MoveChoice::new(open[rng.pick(open.len())], MoveReason::Random))
}

/// Lowest empty index where `mark` would complete a line.
fn first_winning_cell(board: &Board, mark: Mark) -> Option<usize> {
    (0..CELL_COUNT).find(|&index| wins_at(board, index, mark))
}

fn pick_open(board: &Board, group: &[Position], rng: &mut dyn RandomSource) -> Option<Position> {
    let open = Position::open(board, group);
    if open.is_empty() {
        None
    } else {
        Some(open[rng.pick(open.len())])
    }
}
