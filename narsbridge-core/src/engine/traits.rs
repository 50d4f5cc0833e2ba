//! ReasoningEngine trait and related types
//!
//! One capability interface over every engine dialect. Callers never branch
//! on which dialect is behind it.

use serde::{Deserialize, Serialize};

use super::signals::Anticipation;

/// Lifecycle state of an engine handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Constructed, not yet started
    Idle,
    /// Process running and its output being read
    Running,
    /// Launch failed, the pipe broke or the output ended; every operation is a no-op
    Inert,
    /// Stopped by the caller
    Stopped,
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Inert => write!(f, "inert"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Handle to an external reasoning engine.
///
/// Transport failures never surface here: a handle that cannot launch or
/// loses its pipe turns inert and keeps answering with empty values. The
/// `get_*` methods never block; each returns what accumulated since the
/// previous call and resets it.
pub trait ReasoningEngine: Send {
    /// Dialect name, e.g. `"ona"`
    fn name(&self) -> &'static str;

    /// Launch the engine process; on failure the handle becomes inert
    fn start(&mut self);

    /// Current lifecycle state
    fn state(&self) -> EngineState;

    fn is_running(&self) -> bool {
        self.state() == EngineState::Running
    }

    /// Write one sentence followed by a newline and flush
    fn send(&mut self, sentence: &str);

    /// Ask the engine to perform the operation bound to `action_id`
    fn send_action(&mut self, action_id: i32);

    /// Most recently executed operation, if any
    fn get_action(&self) -> Option<String>;

    /// Highest surprise level observed since the last call
    fn get_prediction_error(&self) -> f64;

    /// Derived statements in emission order
    fn get_derived(&self) -> Vec<String>;

    /// Anticipated statements in emission order
    fn get_anticipations(&self) -> Vec<Anticipation>;

    /// Terminate the process and release the transcript; safe to repeat
    fn stop(&mut self);
}
