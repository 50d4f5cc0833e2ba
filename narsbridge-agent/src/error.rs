//! Error types for narsbridge-agent

use narsbridge_core::{BridgeError, ConfigError, QuantizerError};
use thiserror::Error;

/// Top-level error type for the episode driver
#[derive(Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Core(#[from] BridgeError),

    #[error("Encoder error: {0}")]
    Encoder(#[from] EncoderError),
}

impl From<QuantizerError> for AgentError {
    fn from(err: QuantizerError) -> Self {
        Self::Core(err.into())
    }
}

impl From<ConfigError> for AgentError {
    fn from(err: ConfigError) -> Self {
        Self::Core(err.into())
    }
}

/// Errors turning an observation into a vector
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EncoderError {
    #[error("Observation has {actual} values, encoder expects {expected}")]
    InputMismatch { expected: usize, actual: usize },
}

/// Error type for logging initialization.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to set global subscriber.
    #[error("failed to set global subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Result type alias for narsbridge-agent operations
pub type Result<T> = std::result::Result<T, AgentError>;
