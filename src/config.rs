//! Timing and reward configuration for a quiz session.
//!
//! Every delay is expressed in milliseconds and measured on the session's
//! virtual clock. Missing keys fall back to the standard values, so a config
//! file only needs to name what it changes.

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::reward::RewardTable;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuizConfig {
    /// Time between an option being picked and the answer being evaluated.
    pub selection_delay_ms: u64,
    /// Time between a correct answer and the level modal appearing.
    pub modal_delay_ms: u64,
    /// Time between a correct answer and the level/coin commit.
    pub level_commit_delay_ms: u64,
    /// How long the coin animation flag stays raised without a completion signal.
    pub coin_animation_ms: u64,
    /// Dismisses the modal automatically when set.
    pub auto_dismiss_ms: Option<u64>,
    pub rewards: RewardTable,
    /// Permutes each question's options once when the session starts.
    pub shuffle_options: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            selection_delay_ms: 350,
            modal_delay_ms: 600,
            level_commit_delay_ms: 2000,
            coin_animation_ms: 1500,
            auto_dismiss_ms: None,
            rewards: RewardTable::standard(),
            shuffle_options: false,
        }
    }
}

impl QuizConfig {
    /// Milestones at 2/5/9 with the slower 3 second commit.
    pub fn alternate() -> Self {
        Self {
            level_commit_delay_ms: 3000,
            rewards: RewardTable::alternate(),
            ..Self::default()
        }
    }

    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_json_str(&data)
    }

    pub fn selection_delay(&self) -> Duration {
        Duration::from_millis(self.selection_delay_ms)
    }

    pub fn modal_delay(&self) -> Duration {
        Duration::from_millis(self.modal_delay_ms)
    }

    pub fn level_commit_delay(&self) -> Duration {
        Duration::from_millis(self.level_commit_delay_ms)
    }

    pub fn coin_animation(&self) -> Duration {
        Duration::from_millis(self.coin_animation_ms)
    }

    pub fn auto_dismiss(&self) -> Option<Duration> {
        self.auto_dismiss_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = QuizConfig::from_json_str(r#"{"autoDismissMs": 4000}"#)
            .expect("partial config should parse");

        assert_eq!(config.auto_dismiss(), Some(Duration::from_millis(4000)));
        assert_eq!(config.modal_delay(), Duration::from_millis(600));
        assert_eq!(config.level_commit_delay(), Duration::from_millis(2000));
        assert_eq!(config.rewards, RewardTable::standard());
    }

    #[test]
    fn alternate_preset_uses_slower_commit() {
        let config = QuizConfig::alternate();

        assert_eq!(config.level_commit_delay(), Duration::from_millis(3000));
        assert_eq!(config.rewards.reward_for(2), 10);
    }

    #[test]
    fn malformed_config_is_parse_error() {
        let error = QuizConfig::from_json_str(r#"{"modalDelayMs": "soon"}"#)
            .expect_err("string delay should fail");

        assert!(matches!(error, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let root = tempfile::tempdir().expect("temporary directory should be created");
        let path = root.path().join("quiz.json");
        fs::write(&path, r#"{"shuffleOptions": true, "coinAnimationMs": 900}"#)
            .expect("config should be written");

        let config = QuizConfig::from_file(&path).expect("config should load");

        assert!(config.shuffle_options);
        assert_eq!(config.coin_animation(), Duration::from_millis(900));
    }
}
