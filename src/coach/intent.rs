//! Free-text intent matching.
//!
//! This is keyword matching, not language understanding: case-insensitive
//! substring checks in a fixed priority order. The first matching rule
//! wins, so "yes but not sure" is an affirmation. The classifier sits
//! behind [`IntentClassifier`] so a real NLU component can replace it
//! without touching the state machine.

use serde::{Deserialize, Serialize};

/// What the user meant when answering a checklist question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Affirm,
    Deny,
    Unsure,
    Unknown,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Affirm => "affirm",
            Self::Deny => "deny",
            Self::Unsure => "unsure",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Maps an utterance to exactly one [`Intent`].
pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Intent;
}

/// A priority-ordered keyword rule.
#[derive(Debug, Clone)]
struct KeywordRule {
    intent: Intent,
    keywords: Vec<String>,
}

/// Substring classifier with the rules evaluated in order.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    rules: Vec<KeywordRule>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new()
            .rule(Intent::Affirm, &["yes", "have"])
            .rule(Intent::Deny, &["no", "don't"])
            .rule(Intent::Unsure, &["not sure", "maybe"])
    }
}

impl KeywordClassifier {
    /// An empty classifier; everything is `Unknown` until rules are added.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule. Earlier rules take priority.
    pub fn rule(mut self, intent: Intent, keywords: &[&str]) -> Self {
        self.rules.push(KeywordRule {
            intent,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        });
        self
    }
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Intent {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lower.contains(k.as_str())))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::Unknown)
    }
}

/// Commands understood before the questionnaire starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpeningCommand {
    Start,
    TellMeMore,
}

impl OpeningCommand {
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        if lower.contains("yes") || lower.contains("start") {
            Some(Self::Start)
        } else if lower.contains("tell me more") {
            Some(Self::TellMeMore)
        } else {
            None
        }
    }
}

/// Actions offered once the summary has been shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalAction {
    Search,
    StartOver,
}

impl FinalAction {
    pub fn parse(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        if lower.contains("search") {
            Some(Self::Search)
        } else if lower.contains("start over") {
            Some(Self::StartOver)
        } else {
            None
        }
    }
}
