//! Outbound sentence formatting and term extraction
//!
//! Only the small slice of Narsese the bridge produces is modelled here:
//! timestamped observations, goals, operation goals and step requests.

/// Suffix marking a sentence as an event happening now.
pub const EVENT_MARKER: &str = ":|:";

/// Predicate used for everything the agent perceives.
pub const SEEN: &str = "seen";

/// `<term --> seen>. :|:`
pub fn observation(term: &str) -> String {
    format!("<{term} --> {SEEN}>. {EVENT_MARKER}")
}

/// `<term --> seen>! :|:`
pub fn goal(term: &str) -> String {
    format!("<{term} --> {SEEN}>! {EVENT_MARKER}")
}

/// Goal asking the engine to execute `op` itself: `<(*,{SELF}) --> op>! :|:`
pub fn operation_goal(op: &str) -> String {
    format!("<(*,{{SELF}}) --> {op}>! {EVENT_MARKER}")
}

/// Request `n` inference steps.
pub fn steps(n: u32) -> String {
    n.to_string()
}

/// Subject term of a timestamped judgement such as `<event_3 --> seen>. :|:`.
///
/// Goals, questions, step counts and shell commands have no observed term.
pub fn observed_term(sentence: &str) -> Option<String> {
    let body = sentence.trim().strip_suffix(EVENT_MARKER)?.trim_end();
    let statement = body.strip_suffix('.')?.trim_end();
    subject_term(statement)
}

/// Subject term of the consequent of a predictive implication (`=/>`).
///
/// A trailing truth value such as `%1.00;0.45%` is ignored.
pub fn implication_consequent(statement: &str) -> Option<String> {
    let (_, consequent) = statement.split_once("=/>")?;
    let consequent = consequent
        .split_once('%')
        .map_or(consequent, |(head, _)| head);
    subject_term(consequent.trim())
}

fn subject_term(statement: &str) -> Option<String> {
    let inner = statement.trim_start_matches(['<', '(']);
    let token = inner.split_whitespace().next()?;
    let token = token.trim_matches(['<', '>', '(', ')', '.']);
    (!token.is_empty()).then(|| token.to_string())
}
