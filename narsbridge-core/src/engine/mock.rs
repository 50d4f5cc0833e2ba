//! Scripted engine for testing
//!
//! MockEngine lets tests drive the bridge without an engine process. Clones
//! share state, so a test can keep one clone for scripting and inspection
//! while the driver owns another.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::signals::Anticipation;
use super::traits::{EngineState, ReasoningEngine};
use crate::actions::ActionMapper;
use crate::narsese;

#[derive(Debug)]
struct MockState {
    state: EngineState,
    launchable: bool,
    actions: VecDeque<String>,
    errors: VecDeque<f64>,
    derived: Vec<String>,
    anticipations: Vec<Anticipation>,
    sent: Vec<String>,
}

/// In-memory implementation of [`ReasoningEngine`]
///
/// Each `get_action()` and `get_prediction_error()` call consumes one queued
/// value; the queues of derived statements and anticipations are drained
/// wholesale.
#[derive(Debug, Clone)]
pub struct MockEngine {
    inner: Arc<Mutex<MockState>>,
    mapper: ActionMapper,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::with_launch(true)
    }

    /// An engine whose launch fails, leaving it inert
    pub fn unavailable() -> Self {
        Self::with_launch(false)
    }

    fn with_launch(launchable: bool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState {
                state: EngineState::Idle,
                launchable,
                actions: VecDeque::new(),
                errors: VecDeque::new(),
                derived: Vec::new(),
                anticipations: Vec::new(),
                sent: Vec::new(),
            })),
            mapper: ActionMapper::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue an operation for a later `get_action()`
    pub fn queue_action(&self, op: impl Into<String>) {
        self.lock().actions.push_back(op.into());
    }

    /// Queue a prediction error for a later `get_prediction_error()`
    pub fn queue_error(&self, level: f64) {
        self.lock().errors.push_back(level);
    }

    pub fn push_derived(&self, statement: impl Into<String>) {
        self.lock().derived.push(statement.into());
    }

    pub fn push_anticipation(&self, anticipation: Anticipation) {
        self.lock().anticipations.push(anticipation);
    }

    /// Every sentence sent while running, in order
    pub fn sent(&self) -> Vec<String> {
        self.lock().sent.clone()
    }

    /// Sent observations only
    pub fn sent_observations(&self) -> Vec<String> {
        self.lock()
            .sent
            .iter()
            .filter(|s| narsese::observed_term(s).is_some())
            .cloned()
            .collect()
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReasoningEngine for MockEngine {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn start(&mut self) {
        let mut inner = self.lock();
        if inner.state == EngineState::Idle {
            inner.state = if inner.launchable {
                EngineState::Running
            } else {
                EngineState::Inert
            };
        }
    }

    fn state(&self) -> EngineState {
        self.lock().state
    }

    fn send(&mut self, sentence: &str) {
        let mut inner = self.lock();
        if inner.state == EngineState::Running {
            inner.sent.push(sentence.trim_end().to_string());
        }
    }

    fn send_action(&mut self, action_id: i32) {
        let sentence = narsese::operation_goal(self.mapper.op_for(action_id));
        self.send(&sentence);
    }

    fn get_action(&self) -> Option<String> {
        self.lock().actions.pop_front()
    }

    fn get_prediction_error(&self) -> f64 {
        self.lock().errors.pop_front().unwrap_or(0.0)
    }

    fn get_derived(&self) -> Vec<String> {
        std::mem::take(&mut self.lock().derived)
    }

    fn get_anticipations(&self) -> Vec<Anticipation> {
        std::mem::take(&mut self.lock().anticipations)
    }

    fn stop(&mut self) {
        self.lock().state = EngineState::Stopped;
    }
}
