//! Settings read from the environment.

use okey_core::{BotDifficulty, TableConfig, DEFAULT_MAX_OPPONENT_MOVES};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    NotANumber { name: &'static str, value: String },

    #[error("OKEY_DIFFICULTY must be easy or medium, got {0:?}")]
    UnknownDifficulty(String),

    #[error("OKEY_MODE must be interactive or auto, got {0:?}")]
    UnknownMode(String),
}

/// How seat 1 is played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Moves are read from stdin
    #[default]
    Interactive,
    /// A bot plays seat 1 too
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub table: TableConfig,
    pub mode: Mode,
    /// Deals to simulate in auto mode
    pub deals: u32,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            table: TableConfig::default(),
            mode: Mode::default(),
            deals: 1,
        }
    }
}

impl CliConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let seed = lookup("OKEY_SEED")
            .map(|v| parse_number("OKEY_SEED", &v))
            .transpose()?;

        let difficulty = match lookup("OKEY_DIFFICULTY").as_deref() {
            None => BotDifficulty::default(),
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "easy" => BotDifficulty::Easy,
                "medium" => BotDifficulty::Medium,
                _ => return Err(ConfigError::UnknownDifficulty(v.to_string())),
            },
        };

        let max_opponent_moves = lookup("OKEY_MAX_OPPONENT_MOVES")
            .map(|v| parse_number("OKEY_MAX_OPPONENT_MOVES", &v))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_OPPONENT_MOVES);

        let mode = match lookup("OKEY_MODE").as_deref() {
            None => Mode::default(),
            Some(v) => match v.to_ascii_lowercase().as_str() {
                "interactive" => Mode::Interactive,
                "auto" => Mode::Auto,
                _ => return Err(ConfigError::UnknownMode(v.to_string())),
            },
        };

        let deals = lookup("OKEY_DEALS")
            .map(|v| parse_number("OKEY_DEALS", &v))
            .transpose()?
            .unwrap_or(1);

        Ok(Self {
            table: TableConfig {
                max_opponent_moves,
                seed,
                difficulty,
            },
            mode,
            deals,
        })
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::NotANumber {
        name,
        value: value.to_string(),
    })
}
