//! Interactive terminal game loop.
//!
//! Reads cell choices from stdin, lets the computer answer after a short
//! thinking pause and polls the session clock once a second.

use anyhow::Result;
use bluey_tictactoe::{
    Difficulty, GameOutcome, Mark, Position, RngSource, SystemClock, TimerCheck, TournamentConfig,
    TournamentController, TournamentError, TournamentEvent, TournamentStatus, Turn, summary,
    write_results,
};
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{debug, error, info, instrument};

/// Everything the game loop needs from the command line.
#[derive(Debug)]
pub struct PlayOptions {
    /// Player name.
    pub name: String,
    /// Computer strength.
    pub difficulty: Difficulty,
    /// Tournament parameters.
    pub config: TournamentConfig,
    /// Seed for reproducible computer play.
    pub seed: Option<u64>,
    /// Where to write the results file, if anywhere.
    pub export_dir: Option<PathBuf>,
}

/// What the player typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Cell(Position),
    NewGame,
    Quit,
    Help,
    Unknown,
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim().to_ascii_lowercase().as_str() {
            "q" | "quit" | "exit" => Input::Quit,
            "n" | "new" => Input::NewGame,
            "h" | "help" | "?" => Input::Help,
            other => Position::parse_input(other).map_or(Input::Unknown, Input::Cell),
        }
    }
}

const HELP: &str = "Type 1-9 (or a name like \"center\" or \"top-left\") to place your X.\n\
                    n = restart this game, q = end the tournament.";

/// Plays one tournament to the end.
#[instrument(skip_all, fields(player = %options.name, difficulty = %options.difficulty))]
pub async fn run(options: PlayOptions) -> Result<()> {
    let rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let think_delay = options.config.computer_think_delay();
    let max_games = *options.config.games_per_tournament();

    let (tx, mut events) = mpsc::unbounded_channel();
    let mut controller =
        TournamentController::new(options.config, SystemClock, RngSource(rng)).with_events(tx);

    println!(
        "Tic-tac-toe: {} vs Computer ({})",
        options.name.trim(),
        options.difficulty.label()
    );
    println!("{HELP}");
    controller.start_tournament(&options.name, options.difficulty)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut needs_prompt = true;

    loop {
        while let Ok(event) = events.try_recv() {
            show_event(&controller, event, max_games, options.export_dir.as_deref());
        }
        if !controller.is_active() {
            break;
        }

        if controller.game().turn() == Turn::Computer {
            println!("Computer is thinking...");
            sleep(think_delay).await;
            controller.play_computer_move()?;
            needs_prompt = true;
            continue;
        }

        if needs_prompt {
            if !controller.game().history().is_empty() {
                println!("{}\n", controller.game().board().display());
            }
            if let Some(remaining) = controller.remaining_time() {
                let secs = remaining.as_secs();
                println!("[{}:{:02} left] Your move:", secs / 60, secs % 60);
            }
            needs_prompt = false;
        }

        tokio::select! {
            _ = ticker.tick() => {
                if let Some(TimerCheck::Expired) = controller.tick() {
                    debug!("Session expired during player turn");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("Input closed, ending tournament");
                    controller.force_end_tournament()?;
                    continue;
                };
                needs_prompt = handle_input(&mut controller, &line)?;
            }
        }
    }

    Ok(())
}

/// Applies one line of input. Returns whether to show the prompt again.
fn handle_input(controller: &mut TournamentController, line: &str) -> Result<bool> {
    match Input::parse(line) {
        Input::Cell(position) => match controller.submit_player_move(position.to_index()) {
            Ok(_) => Ok(true),
            Err(TournamentError::Move(err)) => {
                println!("{err}. Try another square.");
                Ok(true)
            }
            Err(err) => Err(err.into()),
        },
        Input::NewGame => {
            controller.start_new_game()?;
            Ok(true)
        }
        Input::Quit => {
            controller.force_end_tournament()?;
            Ok(false)
        }
        Input::Help => {
            println!("{HELP}");
            Ok(true)
        }
        Input::Unknown => {
            println!("Didn't catch that. Type 1-9, n or q.");
            Ok(true)
        }
    }
}

fn show_event(
    controller: &TournamentController,
    event: TournamentEvent,
    max_games: u32,
    export_dir: Option<&std::path::Path>,
) {
    match event {
        TournamentEvent::GameStarted { game_number } => {
            println!("\n=== Game {game_number} of {max_games} ===");
            println!("{}\n", controller.game().board().display());
        }
        TournamentEvent::CellMarked {
            index,
            mark: Mark::Computer,
        } => {
            if let Some(position) = Position::from_index(index) {
                println!("Computer plays {}", position.label());
            }
        }
        TournamentEvent::CellMarked { .. } => {}
        TournamentEvent::GameEnded { outcome, board, .. } => {
            println!("{}\n", board.display());
            let name = controller
                .state()
                .map(|s| s.player_name().as_str())
                .unwrap_or("Player");
            match outcome {
                GameOutcome::PlayerWin(_) => println!("{name} wins this game!"),
                GameOutcome::ComputerWin(_) => println!("Computer wins this game!"),
                GameOutcome::Draw | GameOutcome::InProgress => println!("It's a draw!"),
            }
        }
        TournamentEvent::TournamentAdvanced(state) => {
            println!(
                "Score: {} {} - Computer {}",
                state.player_name(),
                state.player_wins(),
                state.computer_wins()
            );
        }
        TournamentEvent::TournamentEnded { state, reason, .. } => {
            let ended_at = match controller.status() {
                TournamentStatus::Ended { ended_at, .. } => ended_at,
                TournamentStatus::Idle | TournamentStatus::InProgress => Utc::now(),
            };
            println!("\n{}", summary(&state, reason, ended_at));
            if let Some(dir) = export_dir {
                match write_results(dir, &state, Utc::now()) {
                    Ok(path) => println!("Results saved to {}", path.display()),
                    Err(err) => {
                        error!(error = %err, "Export failed");
                        println!("Could not save results: {}", err.message);
                    }
                }
            }
        }
        TournamentEvent::TimeWarning { remaining } => {
            let minutes = remaining.as_secs().div_ceil(60);
            if minutes == 1 {
                println!("1 minute remaining!");
            } else {
                println!("{minutes} minutes remaining!");
            }
            debug!(remaining_secs = remaining.as_secs(), "Time warning shown");
        }
    }
}
