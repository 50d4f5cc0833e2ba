//! Mapping between engine operation names and environment action ids

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Returned by [`ActionMapper::map_action`] for operations with no binding.
pub const UNKNOWN_ACTION: i32 = -1;

/// Operation returned by [`ActionMapper::op_for`] when an id has no binding.
pub const FALLBACK_OP: &str = "^wait";

/// One `op -> id` entry of an action table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBinding {
    pub op: String,
    pub id: i32,
}

impl ActionBinding {
    pub fn new(op: impl Into<String>, id: i32) -> Self {
        Self { op: op.into(), id }
    }
}

/// The standard operation table for grid-world style environments.
pub fn default_bindings() -> Vec<ActionBinding> {
    [
        ("^left", 0),
        ("^right", 1),
        ("^forward", 2),
        ("^move", 2),
        ("^pick", 3),
        ("^drop", 4),
        ("^toggle", 5),
        ("^activate", 5),
        ("^say", 6),
        ("^wait", 7),
    ]
    .into_iter()
    .map(|(op, id)| ActionBinding::new(op, id))
    .collect()
}

/// Bidirectional lookup between operation names and action ids.
///
/// Built once and read-only afterwards, so it can be shared freely across
/// threads. When several operations share an id, the reverse direction
/// resolves to the one bound first.
#[derive(Debug, Clone)]
pub struct ActionMapper {
    to_id: HashMap<String, i32>,
    to_op: HashMap<i32, String>,
}

impl ActionMapper {
    /// Create a mapper with the standard table
    pub fn new() -> Self {
        Self::from_bindings(&default_bindings())
    }

    /// Create a mapper from an ordered list of bindings
    pub fn from_bindings(bindings: &[ActionBinding]) -> Self {
        let mut to_id = HashMap::with_capacity(bindings.len());
        let mut to_op = HashMap::new();
        for binding in bindings {
            to_id.insert(binding.op.clone(), binding.id);
            to_op
                .entry(binding.id)
                .or_insert_with(|| binding.op.clone());
        }
        Self { to_id, to_op }
    }

    /// Action id for an operation name, or [`UNKNOWN_ACTION`]
    pub fn map_action(&self, op: &str) -> i32 {
        self.to_id
            .get(op.trim())
            .copied()
            .unwrap_or(UNKNOWN_ACTION)
    }

    /// Operation name for an action id, or [`FALLBACK_OP`]
    pub fn op_for(&self, action_id: i32) -> &str {
        self.to_op
            .get(&action_id)
            .map(String::as_str)
            .unwrap_or(FALLBACK_OP)
    }

    /// Number of operation names in the table
    pub fn len(&self) -> usize {
        self.to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_id.is_empty()
    }
}

impl Default for ActionMapper {
    fn default() -> Self {
        Self::new()
    }
}
