//! Tournament controller: sequences games and keeps the series score.
//!
//! The controller is an ordinary value. It owns the tournament state, the
//! current game, an injected [`Clock`] and an injected [`RandomSource`], and
//! reports what happens through an optional event channel. Real-time
//! concerns stay outside: the caller decides when the computer moves and how
//! often [`TournamentController::tick`] runs.

use super::clock::{Clock, SessionTimer, TimerCheck, elapsed_between};
use super::state::{GameRecord, SeriesRules, TournamentResult, TournamentState};
use crate::config::TournamentConfig;
use crate::games::tictactoe::{
    Board, ComputerTurn, Difficulty, GameOutcome, GameSession, Mark, MoveError, RandomSource,
};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Notifications for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TournamentEvent {
    /// A game began (or was restarted) with an empty board.
    GameStarted {
        /// Game number within the tournament.
        game_number: u32,
    },
    /// A mark was placed.
    CellMarked {
        /// Board index (0-8).
        index: usize,
        /// Whose mark.
        mark: Mark,
    },
    /// A game reached a win or draw and was recorded.
    GameEnded {
        /// Game number within the tournament.
        game_number: u32,
        /// Final outcome, including the winning line if any.
        outcome: GameOutcome,
        /// Final board.
        board: Board,
    },
    /// The series continues with the next game.
    TournamentAdvanced(TournamentState),
    /// The series is over.
    TournamentEnded {
        /// Final state.
        state: TournamentState,
        /// Who took the series.
        result: TournamentResult,
        /// Why it ended.
        reason: EndReason,
    },
    /// The session clock crossed a warning mark.
    TimeWarning {
        /// Time left in the session.
        remaining: Duration,
    },
}

/// Why a tournament ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum EndReason {
    /// Game limit reached or a side clinched the series.
    Completed,
    /// The session time budget ran out.
    TimedOut,
    /// Ended on request before completion.
    Abandoned,
}

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentStatus {
    /// No tournament has been started.
    Idle,
    /// Games are being played.
    InProgress,
    /// The last tournament is over; its state remains readable.
    Ended {
        /// Who took the series.
        result: TournamentResult,
        /// Why it ended.
        reason: EndReason,
        /// When it ended.
        ended_at: DateTime<Utc>,
    },
}

/// Error returned by controller operations. State is never changed.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum TournamentError {
    /// No tournament is being played.
    #[display("No tournament is in progress")]
    NotActive,
    /// A tournament needs a player name.
    #[display("Player name must not be empty")]
    EmptyPlayerName,
    /// The current game refused the move.
    #[display("{}", _0)]
    Move(MoveError),
}

impl std::error::Error for TournamentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TournamentError::Move(err) => Some(err),
            TournamentError::NotActive | TournamentError::EmptyPlayerName => None,
        }
    }
}

impl From<MoveError> for TournamentError {
    fn from(err: MoveError) -> Self {
        TournamentError::Move(err)
    }
}

/// Drives a best-of-N tournament between the player and the computer.
pub struct TournamentController {
    config: TournamentConfig,
    rules: SeriesRules,
    clock: Box<dyn Clock>,
    rng: Box<dyn RandomSource>,
    events: Option<mpsc::UnboundedSender<TournamentEvent>>,
    status: TournamentStatus,
    state: Option<TournamentState>,
    game: GameSession,
    game_started_at: DateTime<Utc>,
    timer: Option<SessionTimer>,
}

impl TournamentController {
    /// Creates an idle controller.
    #[instrument(skip_all)]
    pub fn new(
        config: TournamentConfig,
        clock: impl Clock + 'static,
        rng: impl RandomSource + 'static,
    ) -> Self {
        let rules = SeriesRules::new(*config.games_per_tournament(), *config.clinch_threshold());
        let now = clock.now();
        debug!(?rules, "Creating tournament controller");
        Self {
            config,
            rules,
            clock: Box::new(clock),
            rng: Box::new(rng),
            events: None,
            status: TournamentStatus::Idle,
            state: None,
            game: GameSession::new(),
            game_started_at: now,
            timer: None,
        }
    }

    /// Sends events to `tx` from now on.
    pub fn with_events(mut self, tx: mpsc::UnboundedSender<TournamentEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// Returns the configuration.
    pub fn config(&self) -> &TournamentConfig {
        &self.config
    }

    /// Returns the lifecycle status.
    pub fn status(&self) -> TournamentStatus {
        self.status
    }

    /// True while games are being played.
    pub fn is_active(&self) -> bool {
        self.status == TournamentStatus::InProgress
    }

    /// Current or most recent tournament state.
    pub fn state(&self) -> Option<&TournamentState> {
        self.state.as_ref()
    }

    /// Current or most recent game.
    pub fn game(&self) -> &GameSession {
        &self.game
    }

    /// Session time left, while a tournament is active.
    pub fn remaining_time(&self) -> Option<Duration> {
        match (&self.timer, self.is_active()) {
            (Some(timer), true) => Some(timer.remaining(self.clock.now())),
            _ => None,
        }
    }

    /// Time spent on the current game so far.
    pub fn game_elapsed(&self) -> Duration {
        elapsed_between(self.game_started_at, self.clock.now())
    }

    /// Starts a new tournament, replacing any previous one, and opens game 1.
    ///
    /// # Errors
    ///
    /// [`TournamentError::EmptyPlayerName`] if the name is blank.
    #[instrument(skip(self))]
    pub fn start_tournament(
        &mut self,
        player_name: &str,
        difficulty: Difficulty,
    ) -> Result<(), TournamentError> {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            warn!("Refusing to start a tournament without a player name");
            return Err(TournamentError::EmptyPlayerName);
        }

        let now = self.clock.now();
        self.state = Some(TournamentState::new(
            player_name.to_string(),
            difficulty,
            now,
        ));
        self.timer = Some(SessionTimer::new(
            now,
            self.config.session_time_limit(),
            &self.config.time_warnings(),
        ));
        self.status = TournamentStatus::InProgress;
        self.game = GameSession::new();
        self.game_started_at = now;

        info!(
            player = player_name,
            %difficulty,
            limit_secs = self.config.session_time_limit().as_secs(),
            "Tournament started"
        );
        self.emit(TournamentEvent::GameStarted { game_number: 1 });
        Ok(())
    }

    /// Places the player's mark in the current game.
    ///
    /// Returns the board evaluation after the move. A finishing move records
    /// the game and either advances the series or ends it.
    ///
    /// # Errors
    ///
    /// [`TournamentError::NotActive`] without a running tournament, or the
    /// game's [`MoveError`].
    #[instrument(skip(self))]
    pub fn submit_player_move(&mut self, index: usize) -> Result<GameOutcome, TournamentError> {
        self.ensure_active()?;
        let outcome = self.game.submit_player_move(index)?;
        self.emit(TournamentEvent::CellMarked {
            index,
            mark: Mark::Player,
        });
        if outcome.is_terminal() {
            self.finish_game(outcome);
        }
        Ok(outcome)
    }

    /// Lets the computer take its turn in the current game.
    ///
    /// # Errors
    ///
    /// [`TournamentError::NotActive`] without a running tournament, or
    /// [`MoveError::WrongTurn`] if the player is to move.
    #[instrument(skip(self))]
    pub fn play_computer_move(&mut self) -> Result<ComputerTurn, TournamentError> {
        let difficulty = *self.active_state()?.difficulty();
        let turn = self
            .game
            .play_computer_move(difficulty, self.rng.as_mut())?;
        if let Some(choice) = turn.choice {
            self.emit(TournamentEvent::CellMarked {
                index: choice.index,
                mark: Mark::Computer,
            });
        }
        if turn.outcome.is_terminal() {
            self.finish_game(turn.outcome);
        }
        Ok(turn)
    }

    /// Abandons the current board and restarts it under the same game number.
    ///
    /// Nothing is recorded for the abandoned board.
    ///
    /// # Errors
    ///
    /// [`TournamentError::NotActive`] without a running tournament.
    #[instrument(skip(self))]
    pub fn start_new_game(&mut self) -> Result<(), TournamentError> {
        let game_number = *self.active_state()?.current_game_number();
        self.game.restart();
        self.game_started_at = self.clock.now();
        info!(game_number, "Game restarted");
        self.emit(TournamentEvent::GameStarted { game_number });
        Ok(())
    }

    /// Ends the tournament now, whatever the state of the current game.
    ///
    /// # Errors
    ///
    /// [`TournamentError::NotActive`] without a running tournament.
    #[instrument(skip(self))]
    pub fn force_end_tournament(&mut self) -> Result<TournamentResult, TournamentError> {
        self.ensure_active()?;
        Ok(self.end(EndReason::Abandoned))
    }

    /// Polls the session clock.
    ///
    /// Emits a warning when a mark is crossed and ends the tournament when
    /// the budget is spent. Returns `None` when no tournament is active.
    #[instrument(skip(self))]
    pub fn tick(&mut self) -> Option<TimerCheck> {
        if !self.is_active() {
            return None;
        }
        let now = self.clock.now();
        let check = self.timer.as_mut()?.check(now);
        match check {
            TimerCheck::Running { .. } => {}
            TimerCheck::Warning { remaining, .. } => {
                info!(remaining_secs = remaining.as_secs(), "Session time running low");
                self.emit(TournamentEvent::TimeWarning { remaining });
            }
            TimerCheck::Expired => {
                warn!("Session time budget spent");
                self.end(EndReason::TimedOut);
            }
        }
        Some(check)
    }

    fn ensure_active(&self) -> Result<(), TournamentError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(TournamentError::NotActive)
        }
    }

    fn active_state(&self) -> Result<&TournamentState, TournamentError> {
        self.ensure_active()?;
        self.state.as_ref().ok_or(TournamentError::NotActive)
    }

    /// Records a finished game, then advances or ends the series.
    fn finish_game(&mut self, outcome: GameOutcome) {
        let now = self.clock.now();
        let duration_ms =
            u64::try_from(elapsed_between(self.game_started_at, now).as_millis()).unwrap_or(u64::MAX);

        let Some(state) = self.state.as_mut() else {
            return;
        };
        let game_number = *state.current_game_number();
        state.record(GameRecord::new(game_number, outcome, duration_ms, now));
        info!(
            game_number,
            %outcome,
            duration_ms,
            player_wins = *state.player_wins(),
            computer_wins = *state.computer_wins(),
            "Game finished"
        );

        let complete = state.is_complete(&self.rules);
        let board = self.game.board().clone();
        self.emit(TournamentEvent::GameEnded {
            game_number,
            outcome,
            board,
        });

        if complete {
            self.end(EndReason::Completed);
            return;
        }

        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.advance();
        let next = *state.current_game_number();
        let snapshot = state.clone();
        self.game = GameSession::new();
        self.game_started_at = now;
        debug!(game_number = next, "Advancing to next game");
        self.emit(TournamentEvent::TournamentAdvanced(snapshot));
        self.emit(TournamentEvent::GameStarted { game_number: next });
    }

    fn end(&mut self, reason: EndReason) -> TournamentResult {
        let ended_at = self.clock.now();
        let Some(state) = self.state.clone() else {
            return TournamentResult::Tie;
        };
        let result = state.standing();
        self.status = TournamentStatus::Ended {
            result,
            reason,
            ended_at,
        };
        info!(
            %result,
            %reason,
            games = state.history().len(),
            player_wins = *state.player_wins(),
            computer_wins = *state.computer_wins(),
            "Tournament ended"
        );
        self.emit(TournamentEvent::TournamentEnded {
            state,
            result,
            reason,
        });
        result
    }

    fn emit(&mut self, event: TournamentEvent) {
        if let Some(tx) = &self.events
            && tx.send(event).is_err()
        {
            warn!("Event receiver dropped; no further events will be sent");
            self.events = None;
        }
    }
}
