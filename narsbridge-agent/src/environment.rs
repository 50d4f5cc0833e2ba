//! The environment seam
//!
//! The agent never looks inside an environment: it resets it, steps it with
//! an integer action and falls back to the environment's own random action
//! when the engine has nothing to say.

/// Outcome of one environment step
#[derive(Debug, Clone, PartialEq)]
pub struct Step<O> {
    pub observation: O,
    pub reward: f64,
    /// The episode reached a terminal state
    pub done: bool,
    /// The episode was cut short, e.g. by a time limit
    pub truncated: bool,
}

impl<O> Step<O> {
    pub fn is_terminal(&self) -> bool {
        self.done || self.truncated
    }
}

/// An episodic environment with integer actions
pub trait Environment {
    type Observation;

    /// Start a new episode and return its first observation
    fn reset(&mut self) -> Self::Observation;

    fn step(&mut self, action: i32) -> Step<Self::Observation>;

    /// A random valid action, used for motor babbling
    fn sample_action(&mut self) -> i32;
}
