//! Tournament configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Tunable parameters for a tournament session.
///
/// Every field has a default, so an empty TOML file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct TournamentConfig {
    /// Wall-clock budget for the whole tournament, in seconds.
    #[serde(default = "default_session_time_limit_secs")]
    session_time_limit_secs: u64,

    /// Maximum number of games in a tournament.
    #[serde(default = "default_games_per_tournament")]
    games_per_tournament: u32,

    /// A side whose wins exceed this ends the tournament early.
    #[serde(default = "default_clinch_threshold")]
    clinch_threshold: u32,

    /// Pause before the computer moves, so its turn can be followed.
    #[serde(default = "default_computer_think_delay_ms")]
    computer_think_delay_ms: u64,

    /// Remaining-time marks (seconds) at which a warning is emitted once.
    #[serde(default = "default_time_warnings_secs")]
    time_warnings_secs: Vec<u64>,
}

fn default_session_time_limit_secs() -> u64 {
    30 * 60
}

fn default_games_per_tournament() -> u32 {
    5
}

fn default_clinch_threshold() -> u32 {
    2
}

fn default_computer_think_delay_ms() -> u64 {
    500
}

fn default_time_warnings_secs() -> Vec<u64> {
    vec![5 * 60, 60]
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            session_time_limit_secs: default_session_time_limit_secs(),
            games_per_tournament: default_games_per_tournament(),
            clinch_threshold: default_clinch_threshold(),
            computer_think_delay_ms: default_computer_think_delay_ms(),
            time_warnings_secs: default_time_warnings_secs(),
        }
    }
}

impl TournamentConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(
            session_time_limit_secs = config.session_time_limit_secs,
            games_per_tournament = config.games_per_tournament,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings under which a tournament could never be played.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_time_limit_secs == 0 {
            return Err(ConfigError::new(
                "session_time_limit_secs must be greater than zero".to_string(),
            ));
        }
        if self.games_per_tournament == 0 {
            return Err(ConfigError::new(
                "games_per_tournament must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Session budget as a [`Duration`].
    pub fn session_time_limit(&self) -> Duration {
        Duration::from_secs(self.session_time_limit_secs)
    }

    /// Computer thinking pause as a [`Duration`].
    pub fn computer_think_delay(&self) -> Duration {
        Duration::from_millis(self.computer_think_delay_ms)
    }

    /// Warning marks as [`Duration`]s.
    pub fn time_warnings(&self) -> Vec<Duration> {
        self.time_warnings_secs
            .iter()
            .map(|&secs| Duration::from_secs(secs))
            .collect()
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
