//! Bluey tic-tac-toe - terminal front end.

#![warn(missing_docs)]

mod cli;
mod play;

use anyhow::Result;
use bluey_tictactoe::TournamentConfig;
use clap::Parser;
use cli::{Cli, Command};
use play::PlayOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout is the game display.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            name,
            difficulty,
            config,
            time_limit,
            seed,
            export_dir,
        } => {
            let mut tournament_config = match config {
                Some(path) => TournamentConfig::from_file(path)?,
                None => TournamentConfig::default(),
            };
            if let Some(secs) = time_limit {
                tournament_config = tournament_config.with_session_time_limit_secs(secs);
                tournament_config.validate()?;
            }
            info!(%name, %difficulty, "Starting play");
            play::run(PlayOptions {
                name,
                difficulty,
                config: tournament_config,
                seed,
                export_dir,
            })
            .await
        }
        Command::Config => {
            print!("{}", toml::to_string_pretty(&TournamentConfig::default())?);
            Ok(())
        }
    }
}
