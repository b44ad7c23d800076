//! Best-of-N tournament around single games: controller, clock and results.

mod clock;
mod controller;
mod export;
mod state;

pub use clock::{Clock, ManualClock, SessionTimer, SystemClock, TimerCheck, elapsed_between};
pub use controller::{
    EndReason, TournamentController, TournamentError, TournamentEvent, TournamentStatus,
};
pub use export::{
    ExportError, TSV_HEADER, result_line, results_filename, results_tsv, summary, write_results,
};
pub use state::{GameRecord, PlayerResult, SeriesRules, TournamentResult, TournamentState};
