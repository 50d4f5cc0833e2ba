//! OpenNARS for Applications (ONA) shell dialect
//!
//! ONA is launched as `NAR shell` and reports on stdout with lines such as:
//!
//! ```text
//! ^left executed with args ({SELF})
//! OUT: <b --> seen>. :|: occurrenceTime=12 Truth: %1.00;0.58%
//! decision expectation=0.62 implication: <(<a --> seen> &/ ^left) =/> <goal --> seen>>.
//! Derived: <a --> b>. Priority=0.12 Truth: frequency=1.000000, confidence=0.810000
//! Revised: <a =/> b>. Truth: frequency=1.000000, confidence=0.620000
//! ```

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use super::config::SurprisePolicy;
use super::dialect::{
    Dialect, LineParser, SentObservation, confidence_field, mentions_term, operation_token,
    truth_confidence,
};
use super::signals::{Anticipation, Signal};

const DEFAULT_PROGRAM: &str = "./OpenNARS-for-Applications/NAR";

static DECISION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"decision expectation=([-0-9.]+) implication: (.*)")
        .expect("decision pattern is valid")
});

/// The ONA shell dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct Ona;

impl Dialect for Ona {
    type Parser = OnaParser;

    fn name(&self) -> &'static str {
        "ona"
    }

    fn default_program(&self) -> PathBuf {
        PathBuf::from(DEFAULT_PROGRAM)
    }

    fn default_args(&self) -> Vec<String> {
        vec!["shell".to_string()]
    }

    fn preamble(&self) -> Vec<String> {
        // Operation and derivation lines are only printed at full volume.
        vec!["*volume=100".to_string()]
    }

    fn parser(&self, policy: &SurprisePolicy) -> OnaParser {
        OnaParser::new(policy.clone())
    }
}

/// Parser for ONA shell output
#[derive(Debug, Clone)]
pub struct OnaParser {
    policy: SurprisePolicy,
}

impl OnaParser {
    pub fn new(policy: SurprisePolicy) -> Self {
        Self { policy }
    }
}

/// Text between the first `<` and the last `>`.
fn bracketed(line: &str) -> Option<&str> {
    let start = line.find('<')?;
    let end = line.rfind('>')?;
    (end > start + 1).then(|| &line[start + 1..end])
}

impl LineParser for OnaParser {
    fn parse(&mut self, line: &str, last_sent: Option<&SentObservation>) -> Vec<Signal> {
        let mut signals = Vec::new();

        if let Some((head, _)) = line.split_once(" executed with args") {
            let op = head.trim();
            if op.starts_with('^') {
                signals.push(Signal::Action(op.to_string()));
            }
        }

        if line.contains("Selected: ")
            && let Some(op) = operation_token(line)
        {
            signals.push(Signal::Action(op));
        }

        if let Some(content) = line.strip_prefix("OUT:") {
            let content = content.trim();
            if let Some(op) = operation_token(content) {
                signals.push(Signal::Action(op));
            }
            if !content.is_empty() {
                signals.push(Signal::Derived(content.to_string()));
            }
            if truth_confidence(content).is_some_and(|c| c > self.policy.output_confidence_threshold)
            {
                signals.push(Signal::Surprise(self.policy.floor));
            }
        }

        if let Some(content) = line.strip_prefix("Answer:") {
            let content = content.trim();
            if !content.is_empty() && !content.starts_with("None") {
                signals.push(Signal::Derived(content.to_string()));
            }
        }

        if let Some(captures) = DECISION.captures(line)
            && let Ok(expectation) = captures[1].parse::<f64>()
        {
            signals.push(Signal::Anticipation(Anticipation::new(
                expectation,
                captures[2].trim(),
            )));
        }

        if line.contains("Anticipating:") {
            signals.push(Signal::Anticipation(Anticipation::new(
                self.policy.default_anticipation_confidence,
                line,
            )));
        }

        if line.starts_with("Revised:") {
            signals.push(Signal::Surprise(self.policy.floor));
        }

        if line.contains("Derived") {
            if line.starts_with("Derived:")
                && let Some(term) = bracketed(line)
            {
                signals.push(Signal::Derived(term.to_string()));
            }

            // Only derivations about what was just observed count as surprise.
            let relevant = last_sent.is_none_or(|sent| mentions_term(line, &sent.term));
            if relevant
                && confidence_field(line)
                    .is_some_and(|c| c > self.policy.derived_confidence_threshold)
            {
                signals.push(Signal::Surprise(self.policy.floor));
            }
        }

        signals
    }
}
