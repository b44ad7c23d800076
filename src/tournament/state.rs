//! Tournament bookkeeping: series score and game history.

use crate::games::tictactoe::{Difficulty, GameOutcome};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Result of one game from the player's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum PlayerResult {
    /// Player won the game.
    Win,
    /// Computer won the game.
    Loss,
    /// Game ended in a draw.
    Draw,
}

impl PlayerResult {
    /// Maps a board outcome to the player's result.
    ///
    /// An unfinished outcome counts as a draw; records are only created for
    /// finished games.
    pub fn from_outcome(outcome: &GameOutcome) -> Self {
        match outcome {
            GameOutcome::PlayerWin(_) => Self::Win,
            GameOutcome::ComputerWin(_) => Self::Loss,
            GameOutcome::Draw | GameOutcome::InProgress => Self::Draw,
        }
    }
}

/// One finished game. Never modified after it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct GameRecord {
    /// 1-based position of the game in its tournament.
    game_number: u32,
    /// How the game ended.
    outcome: GameOutcome,
    /// Time from first move opportunity to the final move.
    duration_ms: u64,
    /// When the game ended.
    timestamp: DateTime<Utc>,
}

impl GameRecord {
    /// The player's result for this game.
    pub fn result(&self) -> PlayerResult {
        PlayerResult::from_outcome(&self.outcome)
    }
}

/// Who took the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum TournamentResult {
    /// The player has more wins.
    PlayerWins,
    /// The computer has more wins.
    ComputerWins,
    /// Wins are level.
    Tie,
}

impl TournamentResult {
    /// Compares win counts.
    pub fn from_score(player_wins: u32, computer_wins: u32) -> Self {
        match player_wins.cmp(&computer_wins) {
            std::cmp::Ordering::Greater => Self::PlayerWins,
            std::cmp::Ordering::Less => Self::ComputerWins,
            std::cmp::Ordering::Equal => Self::Tie,
        }
    }
}

/// Limits deciding when a series is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct SeriesRules {
    /// Games after which the series always ends.
    max_games: u32,
    /// A side with more wins than this has clinched the series.
    clinch_threshold: u32,
}

impl Default for SeriesRules {
    fn default() -> Self {
        Self::new(5, 2)
    }
}

/// State of a tournament, owned by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TournamentState {
    /// Player's display name.
    player_name: String,
    /// Computer strength for every game of the tournament.
    difficulty: Difficulty,
    /// When the tournament started.
    start_time: DateTime<Utc>,
    /// 1-based number of the game being played (or last played).
    current_game_number: u32,
    /// Games the player won.
    player_wins: u32,
    /// Games the computer won.
    computer_wins: u32,
    /// Finished games, oldest first.
    history: Vec<GameRecord>,
}

impl TournamentState {
    /// Fresh state for game 1.
    pub fn new(player_name: String, difficulty: Difficulty, start_time: DateTime<Utc>) -> Self {
        Self {
            player_name,
            difficulty,
            start_time,
            current_game_number: 1,
            player_wins: 0,
            computer_wins: 0,
            history: Vec::new(),
        }
    }

    /// Appends a finished game and updates the series score.
    #[instrument(skip(self, record), fields(game_number = record.game_number))]
    pub(crate) fn record(&mut self, record: GameRecord) {
        match record.result() {
            PlayerResult::Win => self.player_wins += 1,
            PlayerResult::Loss => self.computer_wins += 1,
            PlayerResult::Draw => {}
        }
        self.history.push(record);
    }

    /// Moves on to the next game number.
    pub(crate) fn advance(&mut self) {
        self.current_game_number += 1;
    }

    /// Whether the series is over, judged at the current game number.
    pub fn is_complete(&self, rules: &SeriesRules) -> bool {
        self.current_game_number >= rules.max_games
            || self.player_wins > rules.clinch_threshold
            || self.computer_wins > rules.clinch_threshold
    }

    /// Series result as the score stands now.
    pub fn standing(&self) -> TournamentResult {
        TournamentResult::from_score(self.player_wins, self.computer_wins)
    }
}
