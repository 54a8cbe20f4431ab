use std::path::Path;

use crate::{
    engine::{MAX_DEPTH, SearchConfig},
    error::ConfigError,
    game::GameConfig,
    strategy::Strategy,
};

/// Settings for bot against bot matches.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct JudgeConfig {
    /// Number of matches a run plays, per pairing in a round robin.
    pub games: u32,
    /// A match still undecided after this many turns is abandoned.
    pub max_turns: u32,
    /// Strategies summed into the white bot's evaluator.
    pub white: Vec<Strategy>,
    pub black: Vec<Strategy>,
    /// Contestants for a round robin. When not empty every ordered pair plays
    /// and `white`/`black` are ignored.
    pub lineup: Vec<Vec<Strategy>>,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        JudgeConfig {
            games: 1,
            max_turns: 2000,
            white: vec![Strategy::PushForward],
            black: vec![Strategy::Killer, Strategy::PushForward],
            lineup: Vec::new(),
        }
    }
}

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchConfig,
    pub game: GameConfig,
    pub judge: JudgeConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.depth > MAX_DEPTH {
            return Err(ConfigError::Validation(format!(
                "search.depth must be <= {}",
                MAX_DEPTH
            )));
        }
        if self.game.max_turn_skips == 0 {
            return Err(ConfigError::Validation(
                "game.max_turn_skips must be > 0".into(),
            ));
        }
        if self.judge.max_turns == 0 {
            return Err(ConfigError::Validation(
                "judge.max_turns must be > 0".into(),
            ));
        }
        if self.judge.white.is_empty() || self.judge.black.is_empty() {
            return Err(ConfigError::Validation(
                "judge.white and judge.black need at least one strategy".into(),
            ));
        }
        if self.judge.lineup.iter().any(Vec::is_empty) {
            return Err(ConfigError::Validation(
                "judge.lineup entries need at least one strategy".into(),
            ));
        }
        Ok(())
    }
}
