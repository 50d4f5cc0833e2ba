//! OpenNARS (jar) dialect
//!
//! OpenNARS tags its console lines: `OUT:` for derived output, `Answer:` for
//! answers to questions, `ANTICIPATE:` for predicted events and `EXE:` for
//! executed operations. It prints no revision marker usable as a surprise
//! signal, so surprise is inferred by holding the consequents of anticipated
//! implications and checking them against the next observation the bridge
//! sends.

use std::collections::VecDeque;
use std::path::PathBuf;

use tracing::debug;

use super::config::SurprisePolicy;
use super::dialect::{Dialect, LineParser, SentObservation, operation_token, truth_confidence};
use super::signals::{Anticipation, Signal};
use crate::narsese;

/// Expectations kept before the oldest are discarded unresolved.
const MAX_EXPECTATIONS: usize = 256;

/// The OpenNARS jar dialect
#[derive(Debug, Clone)]
pub struct OpenNars {
    jar_path: PathBuf,
}

impl OpenNars {
    pub fn new(jar_path: impl Into<PathBuf>) -> Self {
        Self {
            jar_path: jar_path.into(),
        }
    }

    pub fn jar_path(&self) -> &PathBuf {
        &self.jar_path
    }
}

impl Default for OpenNars {
    fn default() -> Self {
        Self::new("opennars.jar")
    }
}

impl Dialect for OpenNars {
    type Parser = OpenNarsParser;

    fn name(&self) -> &'static str {
        "opennars"
    }

    fn default_program(&self) -> PathBuf {
        PathBuf::from("java")
    }

    fn default_args(&self) -> Vec<String> {
        vec![
            "-Xmx1024m".to_string(),
            "-jar".to_string(),
            self.jar_path.to_string_lossy().into_owned(),
        ]
    }

    fn parser(&self, policy: &SurprisePolicy) -> OpenNarsParser {
        OpenNarsParser::new(policy.clone())
    }
}

/// An anticipated consequent waiting for the next observation
#[derive(Debug, Clone, PartialEq)]
struct Expectation {
    term: String,
    armed_at: u64,
}

/// Parser for OpenNARS console output
#[derive(Debug, Clone)]
pub struct OpenNarsParser {
    policy: SurprisePolicy,
    expectations: VecDeque<Expectation>,
}

impl OpenNarsParser {
    pub fn new(policy: SurprisePolicy) -> Self {
        Self {
            policy,
            expectations: VecDeque::new(),
        }
    }

    /// Number of expectations not yet checked against an observation
    pub fn pending_expectations(&self) -> usize {
        self.expectations.len()
    }

    fn arm(&mut self, term: String, last_sent: Option<&SentObservation>) {
        if self.expectations.len() == MAX_EXPECTATIONS {
            self.expectations.pop_front();
        }
        self.expectations.push_back(Expectation {
            term,
            armed_at: last_sent.map_or(0, |sent| sent.seq),
        });
    }

    /// Resolve expectations armed before `sent`; true when none of them
    /// predicted it.
    fn resolve(&mut self, sent: &SentObservation) -> bool {
        let mut resolved = Vec::new();
        self.expectations.retain(|expectation| {
            if expectation.armed_at < sent.seq {
                resolved.push(expectation.term.clone());
                false
            } else {
                true
            }
        });

        let violated = !resolved.is_empty() && !resolved.contains(&sent.term);
        if violated {
            debug!(observed = %sent.term, expected = ?resolved, "Expectation violated");
        }
        violated
    }
}

impl LineParser for OpenNarsParser {
    fn parse(&mut self, line: &str, last_sent: Option<&SentObservation>) -> Vec<Signal> {
        let mut signals = Vec::new();

        if let Some(content) = line.strip_prefix("OUT:") {
            let content = content.trim();
            if !content.is_empty() {
                signals.push(Signal::Derived(content.to_string()));
            }
        } else if let Some(content) = line.strip_prefix("Answer:") {
            let content = content.trim();
            if !content.is_empty() {
                signals.push(Signal::Derived(content.to_string()));
            }
        } else if let Some((_, content)) = line.split_once("ANTICIPATE:") {
            let content = content.trim();
            if !content.is_empty() {
                let confidence = truth_confidence(content).unwrap_or(0.0);
                signals.push(Signal::Anticipation(Anticipation::new(confidence, content)));
                if let Some(term) = narsese::implication_consequent(content) {
                    self.arm(term, last_sent);
                }
            }
        }

        if let Some(rest) = line.strip_prefix("EXE:") {
            let op = operation_token(rest).unwrap_or_else(|| rest.trim().to_string());
            if !op.is_empty() {
                signals.push(Signal::Action(op));
            }
        }

        if let Some(sent) = last_sent
            && self.resolve(sent)
        {
            signals.push(Signal::Surprise(self.policy.mismatch_floor));
        }

        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANTICIPATE_TOCK: &str = "ANTICIPATE: <(<tick --> seen>) =/> <tock --> seen>>. %1.00;0.81%";

    fn parser() -> OpenNarsParser {
        OpenNarsParser::new(SurprisePolicy::default())
    }

    fn sent(term: &str, seq: u64) -> SentObservation {
        SentObservation {
            term: term.to_string(),
            seq,
        }
    }

    // ==================== Dialect Tests ====================

    #[test]
    fn dialect_runs_jar_with_java() {
        let dialect = OpenNars::new("/opt/opennars.jar");
        assert_eq!(dialect.default_program(), PathBuf::from("java"));
        assert_eq!(
            dialect.default_args(),
            vec!["-Xmx1024m", "-jar", "/opt/opennars.jar"]
        );
        assert!(dialect.preamble().is_empty());
    }

    // ==================== Tagged Line Tests ====================

    #[test]
    fn out_line_is_derived() {
        assert_eq!(
            parser().parse("OUT: <a --> b>. %1.00;0.90%", None),
            vec![Signal::Derived("<a --> b>. %1.00;0.90%".into())]
        );
    }

    #[test]
    fn answer_line_is_derived() {
        assert_eq!(
            parser().parse("Answer: <b --> seen>. :|: %1.00;0.47%", None),
            vec![Signal::Derived("<b --> seen>. :|: %1.00;0.47%".into())]
        );
    }

    #[test]
    fn anticipate_line_yields_anticipation() {
        let mut parser = parser();
        assert_eq!(
            parser.parse(ANTICIPATE_TOCK, None),
            vec![Signal::Anticipation(Anticipation::new(
                0.81,
                "<(<tick --> seen>) =/> <tock --> seen>>. %1.00;0.81%"
            ))]
        );
        assert_eq!(parser.pending_expectations(), 1);
    }

    #[test]
    fn anticipation_without_truth_has_zero_confidence() {
        assert_eq!(
            parser().parse("ANTICIPATE: <b --> seen>", None),
            vec![Signal::Anticipation(Anticipation::new(0.0, "<b --> seen>"))]
        );
    }

    #[test]
    fn exe_line_yields_operation() {
        assert_eq!(
            parser().parse("EXE: ^left", None),
            vec![Signal::Action("^left".into())]
        );
        assert_eq!(
            parser().parse("EXE: $0.30;0.20;0.95$ ^pick([{SELF}])=null", None),
            vec![Signal::Action("^pick".into())]
        );
    }

    #[test]
    fn exe_line_without_caret_uses_remainder() {
        assert_eq!(
            parser().parse("EXE: wait", None),
            vec![Signal::Action("wait".into())]
        );
        assert!(parser().parse("EXE:   ", None).is_empty());
    }

    // ==================== Expectation Tests ====================

    #[test]
    fn unexpected_observation_is_surprising() {
        let mut parser = parser();
        parser.parse(ANTICIPATE_TOCK, Some(&sent("tick", 1)));

        let signals = parser.parse("IN: <boom --> seen>. :|:", Some(&sent("boom", 2)));
        assert_eq!(signals, vec![Signal::Surprise(1.0)]);
        assert_eq!(parser.pending_expectations(), 0);

        assert!(parser.parse("IN: 5", Some(&sent("boom", 2))).is_empty());
    }

    #[test]
    fn expected_observation_confirms_silently() {
        let mut parser = parser();
        parser.parse(ANTICIPATE_TOCK, Some(&sent("tick", 1)));
        assert!(parser.parse("IN: <tock --> seen>. :|:", Some(&sent("tock", 2))).is_empty());
        assert_eq!(parser.pending_expectations(), 0);
    }

    #[test]
    fn expectation_waits_for_a_newer_observation() {
        let mut parser = parser();
        parser.parse(ANTICIPATE_TOCK, Some(&sent("tick", 1)));
        assert!(parser.parse("OUT: <x --> y>.", Some(&sent("tick", 1))).len() == 1);
        assert_eq!(parser.pending_expectations(), 1);
    }

    #[test]
    fn any_matching_expectation_confirms() {
        let mut parser = parser();
        parser.parse(ANTICIPATE_TOCK, Some(&sent("tick", 1)));
        parser.parse("ANTICIPATE: <(<tick --> seen>) =/> <tack --> seen>>.", Some(&sent("tick", 1)));
        assert!(parser.parse("IN: tack", Some(&sent("tack", 2))).is_empty());
    }

    #[test]
    fn expectations_are_bounded() {
        let mut parser = parser();
        for _ in 0..(MAX_EXPECTATIONS + 10) {
            parser.parse(ANTICIPATE_TOCK, None);
        }
        assert_eq!(parser.pending_expectations(), MAX_EXPECTATIONS);
    }

    #[test]
    fn unrecognised_lines_are_ignored() {
        for line in ["IN: <a --> b>.", "executed", "* volume", "ANTICIPATE:"] {
            assert!(parser().parse(line, None).is_empty(), "{line:?}");
        }
    }
}
