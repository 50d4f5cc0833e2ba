//! Dialect abstraction: how to launch an engine and read its output
//!
//! A [`Dialect`] owns everything protocol-specific. The generic
//! [`ProcessHandle`](super::ProcessHandle) owns the process, the pipes and
//! the reader thread, and feeds each output line to the dialect's
//! [`LineParser`].

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use super::config::SurprisePolicy;
use super::signals::Signal;
use crate::narsese;

/// Latest observation written to the engine, numbered in send order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentObservation {
    pub term: String,
    pub seq: u64,
}

/// Turns output lines into signals.
///
/// Lines the parser does not recognise yield no signals; parsing never
/// fails.
pub trait LineParser: Send + 'static {
    /// Parse one trimmed, non-empty output line.
    fn parse(&mut self, line: &str, last_sent: Option<&SentObservation>) -> Vec<Signal>;
}

/// One engine line protocol
pub trait Dialect: Send + Sync + 'static {
    type Parser: LineParser;

    fn name(&self) -> &'static str;

    /// Executable launched when the config names none
    fn default_program(&self) -> PathBuf;

    /// Arguments selecting the engine's interactive mode
    fn default_args(&self) -> Vec<String>;

    /// Sentences written right after launch
    fn preamble(&self) -> Vec<String> {
        Vec::new()
    }

    /// Sentence asking the engine to execute `op`
    fn goal_sentence(&self, op: &str) -> String {
        narsese::operation_goal(op)
    }

    fn parser(&self, policy: &SurprisePolicy) -> Self::Parser;
}

static OPERATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^[A-Za-z0-9_]+").expect("operation pattern is valid"));

static TRUTH_CONFIDENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r";([0-9.]+)%").expect("truth pattern is valid"));

static CONFIDENCE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"confidence=([0-9.]+)").expect("confidence pattern is valid"));

/// First `^op` token in `text`
pub(crate) fn operation_token(text: &str) -> Option<String> {
    OPERATION.find(text).map(|m| m.as_str().to_string())
}

/// Confidence from a `%frequency;confidence%` truth value
pub(crate) fn truth_confidence(text: &str) -> Option<f64> {
    TRUTH_CONFIDENCE.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Value of a `confidence=<c>` field
pub(crate) fn confidence_field(text: &str) -> Option<f64> {
    CONFIDENCE_FIELD.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Whether `term` occurs in `text` as a whole word
pub(crate) fn mentions_term(text: &str, term: &str) -> bool {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    !term.is_empty()
        && text.match_indices(term).any(|(start, _)| {
            let before = text[..start].chars().next_back();
            let after = text[start + term.len()..].chars().next();
            !before.is_some_and(is_word) && !after.is_some_and(is_word)
        })
}
