//! Configuration, read from TOML. Every field has a default, so an empty
//! file is a valid configuration.
//!
//! ```toml
//! [engine]
//! book_ply_limit = 8
//! top_k = 3
//!
//! [game]
//! recall_rounds = 5
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub game: GameConfig,
}

/// Parameters of the AI move selector and its heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The opening book is consulted while fewer plies than this have
    /// been played.
    pub book_ply_limit: usize,
    /// Size of the pool of best moves the reply is drawn from.
    pub top_k: usize,
    pub opening_window: usize,
    pub repetition_penalty: f64,
    pub capture_multiplier: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            book_ply_limit: 8,
            top_k: 3,
            opening_window: 10,
            repetition_penalty: 0.1,
            capture_multiplier: 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub prediction_rounds: u32,
    pub prediction_hints: u32,
    /// Plies played before a recall round asks for the transcription.
    pub recall_plies: usize,
    /// 3, 5 or 7.
    pub recall_rounds: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            prediction_rounds: 5,
            prediction_hints: 3,
            recall_plies: 6,
            recall_rounds: 3,
        }
    }
}

/// Round counts a recall game may be played over.
pub const RECALL_ROUND_CHOICES: [u8; 3] = [3, 5, 7];

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        if !RECALL_ROUND_CHOICES.contains(&config.game.recall_rounds) {
            return Err(ConfigError::RecallRounds(config.game.recall_rounds));
        }
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[test]
fn empty_config_is_default() {
    assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
}

#[test]
fn partial_config() {
    let c = Config::from_toml_str("[engine]\ntop_k = 1\n[game]\nrecall_rounds = 7\n").unwrap();
    assert_eq!(c.engine.top_k, 1);
    assert_eq!(c.engine.book_ply_limit, 8);
    assert_eq!(c.game.recall_rounds, 7);
    assert_eq!(c.game.prediction_rounds, 5);
}

#[test]
fn rejected_config() {
    assert!(matches!(
        Config::from_toml_str("[game]\nrecall_rounds = 4\n"),
        Err(ConfigError::RecallRounds(4))
    ));
    assert!(matches!(
        Config::from_toml_str("[engine]\ntop_k = \"three\"\n"),
        Err(ConfigError::Decode(_))
    ));
}
