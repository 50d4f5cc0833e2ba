//! Signals parsed from engine output and the slots that hold them
//!
//! The reader thread is the only producer and the caller the only consumer.
//! Each slot has its own lock, so a read-and-reset on one never waits on a
//! write to another.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// A statement the engine expects to observe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anticipation {
    pub confidence: f64,
    pub statement: String,
}

impl Anticipation {
    pub fn new(confidence: f64, statement: impl Into<String>) -> Self {
        Self {
            confidence,
            statement: statement.into(),
        }
    }
}

/// One typed observation extracted from an output line
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// The engine executed an operation, e.g. `^left`
    Action(String),
    /// The engine derived or answered a statement
    Derived(String),
    /// The engine expects a statement to become true
    Anticipation(Anticipation),
    /// The engine's expectations were violated at least this much
    Surprise(f64),
}

/// Read-and-reset storage for the four signal kinds
#[derive(Debug, Default)]
pub struct SignalSlots {
    action: Mutex<Option<String>>,
    error: Mutex<f64>,
    derived: Mutex<Vec<String>>,
    anticipations: Mutex<Vec<Anticipation>>,
}

fn lock<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SignalSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a signal: the action slot keeps the latest, the error slot the
    /// maximum, the queues append.
    pub fn apply(&self, signal: Signal) {
        match signal {
            Signal::Action(op) => *lock(&self.action) = Some(op),
            Signal::Surprise(level) => {
                let mut error = lock(&self.error);
                if level > *error {
                    *error = level;
                }
            }
            Signal::Derived(statement) => lock(&self.derived).push(statement),
            Signal::Anticipation(anticipation) => lock(&self.anticipations).push(anticipation),
        }
    }

    pub fn take_action(&self) -> Option<String> {
        lock(&self.action).take()
    }

    pub fn take_error(&self) -> f64 {
        std::mem::take(&mut *lock(&self.error))
    }

    pub fn take_derived(&self) -> Vec<String> {
        std::mem::take(&mut *lock(&self.derived))
    }

    pub fn take_anticipations(&self) -> Vec<Anticipation> {
        std::mem::take(&mut *lock(&self.anticipations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn empty_slots_read_as_defaults() {
        let slots = SignalSlots::new();
        assert_eq!(slots.take_action(), None);
        assert_eq!(slots.take_error(), 0.0);
        assert!(slots.take_derived().is_empty());
        assert!(slots.take_anticipations().is_empty());
    }

    #[test]
    fn last_action_wins() {
        let slots = SignalSlots::new();
        slots.apply(Signal::Action("^left".into()));
        slots.apply(Signal::Action("^right".into()));
        assert_eq!(slots.take_action().as_deref(), Some("^right"));
        assert_eq!(slots.take_action(), None);
    }

    #[test]
    fn surprise_accumulates_by_max() {
        let slots = SignalSlots::new();
        slots.apply(Signal::Surprise(0.3));
        slots.apply(Signal::Surprise(1.0));
        slots.apply(Signal::Surprise(0.3));
        assert_eq!(slots.take_error(), 1.0);
        assert_eq!(slots.take_error(), 0.0);
    }

    #[test]
    fn queues_preserve_order_and_drain() {
        let slots = SignalSlots::new();
        slots.apply(Signal::Derived("a".into()));
        slots.apply(Signal::Anticipation(Anticipation::new(0.5, "x")));
        slots.apply(Signal::Derived("b".into()));
        slots.apply(Signal::Anticipation(Anticipation::new(0.2, "y")));

        assert_eq!(slots.take_derived(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            slots.take_anticipations(),
            vec![Anticipation::new(0.5, "x"), Anticipation::new(0.2, "y")]
        );
        assert!(slots.take_derived().is_empty());
        assert!(slots.take_anticipations().is_empty());
    }

    #[test]
    fn concurrent_producer_loses_nothing() {
        let slots = Arc::new(SignalSlots::new());
        let producer = {
            let slots = Arc::clone(&slots);
            std::thread::spawn(move || {
                for i in 0..1_000 {
                    slots.apply(Signal::Derived(i.to_string()));
                }
            })
        };

        let mut seen = Vec::new();
        while !producer.is_finished() {
            seen.extend(slots.take_derived());
        }
        producer.join().unwrap();
        seen.extend(slots.take_derived());

        let expected: Vec<String> = (0..1_000).map(|i| i.to_string()).collect();
        assert_eq!(seen, expected);
    }
}
