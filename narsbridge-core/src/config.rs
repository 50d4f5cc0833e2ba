//! Bridge configuration loaded from TOML

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::actions::{ActionBinding, ActionMapper, default_bindings};
use crate::engine::EngineConfig;
use crate::error::ConfigError;
use crate::quantizer::QuantizerConfig;

/// Configuration for the core bridge components
///
/// ```toml
/// [quantizer]
/// dimension = 64
/// vigilance = 0.5
///
/// [engine]
/// program = "/opt/ona/NAR"
/// stop_grace_period = "500ms"
///
/// [[actions]]
/// op = "^left"
/// id = 0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub quantizer: QuantizerConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    /// Ordered action table; the standard table when absent.
    #[serde(default = "default_bindings")]
    pub actions: Vec<ActionBinding>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            quantizer: QuantizerConfig::default(),
            engine: EngineConfig::default(),
            actions: default_bindings(),
        }
    }
}

impl BridgeConfig {
    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject quantizer settings that would break the vigilance floor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.quantizer.validate().map_err(ConfigError::Invalid)
    }

    /// Mapper over the configured action table
    pub fn action_mapper(&self) -> ActionMapper {
        ActionMapper::from_bindings(&self.actions)
    }
}
