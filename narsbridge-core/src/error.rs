//! Error types for narsbridge-core

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for narsbridge-core
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Quantizer error: {0}")]
    Quantizer(#[from] QuantizerError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors from the event quantizer and its persisted state
#[derive(Error, Debug)]
pub enum QuantizerError {
    #[error("Vector has {actual} dimensions, quantizer expects {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Vector contains a non-finite component")]
    NonFinite,

    #[error("Invalid quantizer setting {name} = {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("Corrupt quantizer snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors loading bridge configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(#[source] QuantizerError),
}

/// Errors launching a reasoning engine process
///
/// These never cross the [`ReasoningEngine`](crate::engine::ReasoningEngine)
/// contract: a failed launch leaves the handle inert and is only logged.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Engine executable not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to spawn engine process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Engine process has no {0} pipe")]
    MissingPipe(&'static str),
}

/// Result type alias for narsbridge-core operations
pub type Result<T> = std::result::Result<T, BridgeError>;
