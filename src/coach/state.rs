//! Coach session state — cursor over the checklist plus the answer ledger.

use chrono::{DateTime, Utc};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::checklist::Checklist;

/// A classified answer for one topic.
///
/// Serialized the way the browser front end stores it: `true`, `false`,
/// or `"unsure"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "AnswerRepr", try_from = "AnswerRepr")]
pub enum Answer {
    Prepared,
    Missing,
    Unsure,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AnswerRepr {
    Flag(bool),
    Word(String),
}

impl From<Answer> for AnswerRepr {
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Prepared => Self::Flag(true),
            Answer::Missing => Self::Flag(false),
            Answer::Unsure => Self::Word("unsure".to_string()),
        }
    }
}

impl TryFrom<AnswerRepr> for Answer {
    type Error = String;

    fn try_from(repr: AnswerRepr) -> Result<Self, Self::Error> {
        match repr {
            AnswerRepr::Flag(true) => Ok(Self::Prepared),
            AnswerRepr::Flag(false) => Ok(Self::Missing),
            AnswerRepr::Word(w) if w == "unsure" => Ok(Self::Unsure),
            AnswerRepr::Word(w) => Err(format!("unknown answer {w:?}")),
        }
    }
}

/// Per-session mapping from topic key to answer, in the order answers
/// were recorded. Append-only during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    entries: Vec<(String, Answer)>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Answer> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, answer)| *answer)
    }

    /// Record an answer. Panics if the topic already has one.
    pub fn record(&mut self, key: &str, answer: Answer) {
        assert!(
            self.get(key).is_none(),
            "ledger already holds an answer for {key}"
        );
        self.entries.push((key.to_string(), answer));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Answer)> {
        self.entries.iter().map(|(k, a)| (k.as_str(), *a))
    }

    /// Number of topics answered affirmatively.
    pub fn prepared_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, a)| *a == Answer::Prepared)
            .count()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Serialize for Ledger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, a)| (k, a)))
    }
}

/// Where the conversation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "position", rename_all = "snake_case")]
pub enum CoachPhase {
    NotStarted,
    /// Asking the topic at this 1-based position.
    Asking(usize),
    Summary,
}

impl CoachPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Summary)
    }

    /// Phase name without the position, matching the serde tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Asking(_) => "asking",
            Self::Summary => "summary",
        }
    }
}

impl std::fmt::Display for CoachPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asking(i) => write!(f, "asking({i})"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// State for one questionnaire run.
///
/// `cursor` is `0` before start, `1..=N` while asking, `N + 1` once the
/// summary has been reached.
#[derive(Debug, Clone, Serialize)]
pub struct CoachSession {
    cursor: usize,
    total: usize,
    ledger: Ledger,
    #[serde(skip_serializing_if = "Option::is_none")]
    started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

impl CoachSession {
    pub fn new(total: usize) -> Self {
        assert!(total > 0, "a session needs at least one topic");
        Self {
            cursor: 0,
            total,
            ledger: Ledger::new(),
            started_at: None,
            completed_at: None,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn phase(&self) -> CoachPhase {
        match self.cursor {
            0 => CoachPhase::NotStarted,
            i if i <= self.total => CoachPhase::Asking(i),
            i if i == self.total + 1 => CoachPhase::Summary,
            i => panic!("cursor {i} outside 0..={}", self.total + 1),
        }
    }

    /// `NotStarted` → `Asking(1)`.
    pub fn begin(&mut self) -> CoachPhase {
        assert_eq!(self.cursor, 0, "session already started");
        self.cursor = 1;
        self.started_at = Some(Utc::now());
        self.phase()
    }

    /// Record the answer for the current topic and advance the cursor.
    pub fn record(&mut self, key: &str, answer: Answer) -> CoachPhase {
        assert!(
            matches!(self.phase(), CoachPhase::Asking(_)),
            "cannot record an answer in phase {}",
            self.phase()
        );
        self.ledger.record(key, answer);
        self.cursor += 1;
        if self.cursor > self.total {
            self.completed_at = Some(Utc::now());
        }
        self.phase()
    }

    /// Back to `NotStarted` with an empty ledger.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.ledger.clear();
        self.started_at = None;
        self.completed_at = None;
    }

    /// Share of the checklist reached, as a rounded percentage in `0..=100`.
    pub fn progress_percent(&self) -> u8 {
        let reached = self.cursor.min(self.total) as f64;
        (100.0 * reached / self.total as f64).round() as u8
    }

    /// Panic if the cursor is out of range or the ledger holds an answer
    /// for a topic the cursor has not passed.
    pub fn check_invariants(&self, checklist: &Checklist) {
        assert_eq!(self.total, checklist.len(), "session/checklist size mismatch");
        assert!(
            self.cursor <= self.total + 1,
            "cursor {} outside 0..={}",
            self.cursor,
            self.total + 1
        );
        for (key, _) in self.ledger.iter() {
            let position = checklist
                .position_of(key)
                .unwrap_or_else(|| panic!("ledger holds unknown topic {key}"));
            assert!(
                position < self.cursor,
                "ledger holds {key} (position {position}) but cursor is {}",
                self.cursor
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_serializes_like_the_browser() {
        assert_eq!(serde_json::to_string(&Answer::Prepared).unwrap(), "true");
        assert_eq!(serde_json::to_string(&Answer::Missing).unwrap(), "false");
        assert_eq!(serde_json::to_string(&Answer::Unsure).unwrap(), "\"unsure\"");

        let parsed: Answer = serde_json::from_str("\"unsure\"").unwrap();
        assert_eq!(parsed, Answer::Unsure);
        assert!(serde_json::from_str::<Answer>("\"perhaps\"").is_err());
    }

    #[test]
    fn ledger_serializes_as_ordered_map() {
        let mut ledger = Ledger::new();
        ledger.record("water", Answer::Prepared);
        ledger.record("food", Answer::Unsure);
        let json = serde_json::to_value(&ledger).unwrap();
        assert_eq!(json, serde_json::json!({"water": true, "food": "unsure"}));
    }

    #[test]
    #[should_panic(expected = "already holds")]
    fn ledger_is_append_only() {
        let mut ledger = Ledger::new();
        ledger.record("water", Answer::Prepared);
        ledger.record("water", Answer::Missing);
    }

    #[test]
    fn phases_follow_cursor() {
        let mut session = CoachSession::new(2);
        assert_eq!(session.phase(), CoachPhase::NotStarted);
        assert_eq!(session.begin(), CoachPhase::Asking(1));
        assert!(session.started_at().is_some());
        assert_eq!(session.record("a", Answer::Missing), CoachPhase::Asking(2));
        assert!(session.completed_at().is_none());
        assert_eq!(session.record("b", Answer::Prepared), CoachPhase::Summary);
        assert!(session.completed_at().is_some());
        assert!(session.phase().is_terminal());
    }

    #[test]
    #[should_panic(expected = "cannot record")]
    fn record_before_start_panics() {
        let mut session = CoachSession::new(2);
        session.record("a", Answer::Prepared);
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = CoachSession::new(1);
        session.begin();
        session.record("a", Answer::Prepared);
        session.reset();
        assert_eq!(session.cursor(), 0);
        assert!(session.ledger().is_empty());
        assert!(session.started_at().is_none());
        assert!(session.completed_at().is_none());
    }

    #[test]
    fn progress_is_capped() {
        let mut session = CoachSession::new(4);
        assert_eq!(session.progress_percent(), 0);
        session.begin();
        assert_eq!(session.progress_percent(), 25);
        for key in ["a", "b", "c", "d"] {
            session.record(key, Answer::Prepared);
        }
        assert_eq!(session.progress_percent(), 100);
    }

    #[test]
    fn invariants_hold_through_a_run() {
        let checklist = Checklist::preparedness();
        let mut session = CoachSession::new(checklist.len());
        session.check_invariants(&checklist);
        session.begin();
        for topic in checklist.topics() {
            session.record(&topic.key, Answer::Unsure);
            session.check_invariants(&checklist);
        }
        assert_eq!(session.phase(), CoachPhase::Summary);
    }

    #[test]
    fn phase_serializes_with_position() {
        let json = serde_json::to_value(CoachPhase::Asking(3)).unwrap();
        assert_eq!(json, serde_json::json!({"phase": "asking", "position": 3}));
        let json = serde_json::to_value(CoachPhase::Summary).unwrap();
        assert_eq!(json, serde_json::json!({"phase": "summary"}));
    }
}
