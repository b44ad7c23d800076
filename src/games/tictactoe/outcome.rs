//! Game outcomes and the lines that decide them.

use super::types::Mark;
use serde::{Deserialize, Serialize};

/// Three cell indices forming a row, column or diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WinningLine([usize; 3]);

impl WinningLine {
    /// All eight lines in canonical order: rows, columns, diagonals.
    pub const ALL: [WinningLine; 8] = [
        // Rows
        WinningLine([0, 1, 2]),
        WinningLine([3, 4, 5]),
        WinningLine([6, 7, 8]),
        // Columns
        WinningLine([0, 3, 6]),
        WinningLine([1, 4, 7]),
        WinningLine([2, 5, 8]),
        // Diagonals
        WinningLine([0, 4, 8]),
        WinningLine([2, 4, 6]),
    ];

    /// Indices covered by this line.
    pub fn cells(&self) -> [usize; 3] {
        self.0
    }

    /// Whether `index` lies on this line.
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }
}

impl std::fmt::Display for WinningLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "[{a}, {b}, {c}]")
    }
}

/// Result of evaluating a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The player completed a line.
    PlayerWin(WinningLine),
    /// The computer completed a line.
    ComputerWin(WinningLine),
    /// Board full, no line completed.
    Draw,
    /// Moves remain and nobody has won.
    InProgress,
}

impl GameOutcome {
    /// Outcome for `mark` having completed `line`.
    pub fn win_for(mark: Mark, line: WinningLine) -> Self {
        match mark {
            Mark::Player => GameOutcome::PlayerWin(line),
            Mark::Computer => GameOutcome::ComputerWin(line),
        }
    }

    /// True for every outcome except [`GameOutcome::InProgress`].
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    /// The winning mark, if any.
    pub fn winner(&self) -> Option<Mark> {
        match self {
            GameOutcome::PlayerWin(_) => Some(Mark::Player),
            GameOutcome::ComputerWin(_) => Some(Mark::Computer),
            GameOutcome::Draw | GameOutcome::InProgress => None,
        }
    }

    /// The completed line, if any.
    pub fn winning_line(&self) -> Option<WinningLine> {
        match self {
            GameOutcome::PlayerWin(line) | GameOutcome::ComputerWin(line) => Some(*line),
            GameOutcome::Draw | GameOutcome::InProgress => None,
        }
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::PlayerWin(line) => write!(f, "Player wins on {line}"),
            GameOutcome::ComputerWin(line) => write!(f, "Computer wins on {line}"),
            GameOutcome::Draw => write!(f, "Draw"),
            GameOutcome::InProgress => write!(f, "In progress"),
        }
    }
}
