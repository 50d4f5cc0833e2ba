//! Agent configuration
//!
//! The bridge sections (`[quantizer]`, `[engine]`, `[[actions]]`) sit at the
//! top level of the file, next to an `[episode]` section for the driver.

use std::path::{Path, PathBuf};
use std::time::Duration;

use narsbridge_core::{BridgeConfig, ConfigError};
use serde::{Deserialize, Serialize};

/// Per-episode driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeConfig {
    /// Pause after each observation so the engine can respond.
    #[serde(default = "default_settle_delay", with = "humantime_serde")]
    pub settle_delay: Duration,

    /// Term whose observation marks reward.
    #[serde(default = "default_goal_term")]
    pub goal_term: String,

    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Prune prototypes idle this many ticks after each episode.
    #[serde(default)]
    pub prune_age: Option<u64>,

    /// Where quantizer knowledge is loaded from and saved to.
    #[serde(default)]
    pub knowledge_path: Option<PathBuf>,
}

fn default_settle_delay() -> Duration {
    Duration::from_millis(100)
}

fn default_goal_term() -> String {
    "goal".to_string()
}

fn default_max_steps() -> usize {
    500
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            settle_delay: default_settle_delay(),
            goal_term: default_goal_term(),
            max_steps: default_max_steps(),
            prune_age: None,
            knowledge_path: None,
        }
    }
}

impl EpisodeConfig {
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    #[must_use]
    pub fn with_prune_age(mut self, age: u64) -> Self {
        self.prune_age = Some(age);
        self
    }

    #[must_use]
    pub fn with_knowledge_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.knowledge_path = Some(path.into());
        self
    }
}

/// Complete agent configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(flatten)]
    pub bridge: BridgeConfig,

    #[serde(default)]
    pub episode: EpisodeConfig,
}

impl AgentConfig {
    /// `config.toml` under the user config directory
    pub fn default_path() -> PathBuf {
        narsbridge_paths::config_dir().join("config.toml")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.bridge.validate()?;
        Ok(config)
    }

    /// Load the user config if present, filling unset log and knowledge
    /// paths with the data directory defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        let mut config = if path.exists() {
            Self::load(&path)?
        } else {
            Self::default()
        };
        config.apply_data_dir_defaults();
        Ok(config)
    }

    fn apply_data_dir_defaults(&mut self) {
        self.bridge.engine = self.bridge.engine.clone().with_default_log();
        if self.episode.knowledge_path.is_none() {
            self.episode.knowledge_path = Some(narsbridge_paths::knowledge_path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narsbridge_core::DialectKind;

    #[test]
    fn episode_defaults() {
        let config = EpisodeConfig::default();
        assert_eq!(config.settle_delay, Duration::from_millis(100));
        assert_eq!(config.goal_term, "goal");
        assert_eq!(config.max_steps, 500);
        assert_eq!(config.prune_age, None);
        assert_eq!(config.knowledge_path, None);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = AgentConfig::from_toml_str("").unwrap();
        assert_eq!(config, AgentConfig::default());
    }

    #[test]
    fn parses_bridge_and_episode_sections() {
        let config = AgentConfig::from_toml_str(
            r#"
            [quantizer]
            dimension = 16

            [engine]
            stop_grace_period = "2s"

            [engine.dialect]
            type = "open_nars"
            jar_path = "/opt/opennars.jar"

            [episode]
            settle_delay = "20ms"
            max_steps = 50
            prune_age = 1000
            knowledge_path = "/tmp/knowledge.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.bridge.quantizer.dimension, 16);
        assert_eq!(config.bridge.engine.stop_grace_period, Duration::from_secs(2));
        assert!(matches!(
            config.bridge.engine.dialect,
            DialectKind::OpenNars { .. }
        ));
        assert_eq!(config.episode.settle_delay, Duration::from_millis(20));
        assert_eq!(config.episode.max_steps, 50);
        assert_eq!(config.episode.prune_age, Some(1000));
        assert_eq!(
            config.episode.knowledge_path,
            Some(PathBuf::from("/tmp/knowledge.json"))
        );
    }

    #[test]
    fn out_of_range_quantizer_setting_is_rejected() {
        let err = AgentConfig::from_toml_str("[quantizer]\nlearning_rate = 0.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn data_dir_defaults_fill_only_unset_paths() {
        let mut config = AgentConfig::default();
        config.episode.knowledge_path = Some(PathBuf::from("/tmp/mine.json"));
        config.apply_data_dir_defaults();

        assert_eq!(
            config.episode.knowledge_path,
            Some(PathBuf::from("/tmp/mine.json"))
        );
        assert!(
            config
                .bridge
                .engine
                .log_path
                .unwrap()
                .ends_with("logs/ona.log")
        );
    }

    #[test]
    fn default_path_is_config_toml() {
        assert!(AgentConfig::default_path().ends_with("narsbridge/config.toml"));
    }
}
