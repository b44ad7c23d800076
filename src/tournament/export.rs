//! Tournament results: TSV export and the end-of-tournament summary.

use super::clock::elapsed_between;
use super::controller::EndReason;
use super::state::{PlayerResult, TournamentResult, TournamentState};
use chrono::{DateTime, SecondsFormat, Utc};
use derive_more::{Display, Error};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Header row of the results file.
pub const TSV_HEADER: &str = "Timestamp\tPlayerName\tDifficulty\tGameNumber\tResult\tPlayerScore\tComputerScore\tGameDuration\tSessionDuration\n";

/// Renders the results of `state` as TSV, one row per recorded game.
///
/// Scores and session duration are taken at `exported_at` and repeated on
/// every row.
#[instrument(skip(state), fields(player = %state.player_name(), games = state.history().len()))]
pub fn results_tsv(state: &TournamentState, exported_at: DateTime<Utc>) -> String {
    let session_secs = elapsed_between(*state.start_time(), exported_at).as_secs();
    let mut out = String::from(TSV_HEADER);

    for record in state.history() {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            record
                .timestamp()
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            state.player_name(),
            state.difficulty(),
            record.game_number(),
            record.result(),
            state.player_wins(),
            state.computer_wins(),
            record.duration_ms() / 1000,
            session_secs,
        );
    }
    out
}

/// File name for an export made at `exported_at`.
///
/// Path separators in the player name are replaced so the file always lands
/// in the chosen directory.
pub fn results_filename(state: &TournamentState, exported_at: DateTime<Utc>) -> String {
    let name: String = state
        .player_name()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!(
        "bluey_tictactoe_results_{}_{}.tsv",
        name,
        exported_at.format("%Y-%m-%d")
    )
}

/// Writes the TSV export into `dir` and returns the file path.
#[instrument(skip(dir, state), fields(dir = %dir.as_ref().display()))]
pub fn write_results(
    dir: impl AsRef<Path>,
    state: &TournamentState,
    exported_at: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let path = dir.as_ref().join(results_filename(state, exported_at));
    std::fs::write(&path, results_tsv(state, exported_at)).map_err(|e| {
        ExportError::new(format!("Failed to write {}: {}", path.display(), e))
    })?;
    info!(path = %path.display(), "Results exported");
    Ok(path)
}

/// Headline of the results screen.
pub fn result_line(state: &TournamentState, reason: EndReason) -> String {
    if reason == EndReason::TimedOut {
        return "Session timeout! Tournament ended.".to_string();
    }
    match state.standing() {
        TournamentResult::PlayerWins => format!("{} wins the tournament!", state.player_name()),
        TournamentResult::ComputerWins => "Computer wins the tournament!".to_string(),
        TournamentResult::Tie => "Tournament ended in a tie!".to_string(),
    }
}

/// Multi-line text summary of a finished tournament.
pub fn summary(state: &TournamentState, reason: EndReason, ended_at: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", result_line(state, reason));
    let _ = writeln!(
        out,
        "{}: {} - Computer: {}",
        state.player_name(),
        state.player_wins(),
        state.computer_wins()
    );
    for record in state.history() {
        let winner = match record.result() {
            PlayerResult::Win => state.player_name().as_str(),
            PlayerResult::Loss => "Computer",
            PlayerResult::Draw => "Draw",
        };
        let _ = writeln!(
            out,
            "Game {}: {} ({}s)",
            record.game_number(),
            winner,
            record.duration_ms() / 1000
        );
    }
    let total = elapsed_between(*state.start_time(), ended_at).as_secs();
    let _ = writeln!(out, "Total session time: {}m {}s", total / 60, total % 60);
    let _ = writeln!(out, "Difficulty: {}", state.difficulty().label());
    out
}

/// Export error.
#[derive(Debug, Clone, Display, Error)]
#[display("Export error: {} at {}:{}", message, file, line)]
pub struct ExportError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ExportError {
    /// Creates a new export error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
