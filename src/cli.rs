//! Command-line interface for bluey_tictactoe.

use bluey_tictactoe::Difficulty;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bluey tic-tac-toe - best-of-five against the computer
#[derive(Parser, Debug)]
#[command(name = "bluey_tictactoe")]
#[command(about = "Play a tic-tac-toe tournament against the computer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a tournament in the terminal
    Play {
        /// Player name shown in the score and the export
        #[arg(short, long)]
        name: String,

        /// Computer strength: easy (Bluey Mode) or hard (Dad Mode)
        #[arg(short, long, default_value = "easy")]
        difficulty: Difficulty,

        /// Path to a tournament config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the session time limit, in seconds
        #[arg(long)]
        time_limit: Option<u64>,

        /// Seed for the computer's random choices
        #[arg(long)]
        seed: Option<u64>,

        /// Write a TSV of the results into this directory when the tournament ends
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    /// Print the default tournament config as TOML
    Config,
}
