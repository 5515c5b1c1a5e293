//! Table configuration.

use crate::bot::{Bot, BotDifficulty};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Opponent moves allowed per human action before control is handed back
pub const DEFAULT_MAX_OPPONENT_MOVES: usize = 10;

/// Settings for a single-player table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Safety cap on opponent moves between two human actions
    pub max_opponent_moves: usize,
    /// Seed for shuffling and opponents; `None` draws from entropy
    pub seed: Option<u64>,
    pub difficulty: BotDifficulty,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_opponent_moves: DEFAULT_MAX_OPPONENT_MOVES,
            seed: None,
            difficulty: BotDifficulty::default(),
        }
    }
}

impl TableConfig {
    /// Random source used for shuffling
    pub fn shuffle_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Opponent policy; seeded apart from the shuffle
    pub fn bot(&self) -> Bot {
        match self.seed {
            Some(seed) => Bot::with_seed(self.difficulty, seed.wrapping_add(1)),
            None => Bot::new(self.difficulty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_defaults() {
        let config = TableConfig::default();
        assert_eq!(config.max_opponent_moves, 10);
        assert_eq!(config.seed, None);
        assert_eq!(config.difficulty, BotDifficulty::Medium);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TableConfig = serde_json::from_str(r#"{"difficulty":"easy"}"#).unwrap();
        assert_eq!(config.difficulty, BotDifficulty::Easy);
        assert_eq!(config.max_opponent_moves, DEFAULT_MAX_OPPONENT_MOVES);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = TableConfig {
            seed: Some(99),
            ..TableConfig::default()
        };
        let a: u64 = config.shuffle_rng().gen();
        let b: u64 = config.shuffle_rng().gen();
        assert_eq!(a, b);
    }
}
