//! The display collaborator the coach engine renders through.
//!
//! The engine never owns presentation state. It pushes messages, quick
//! actions and the summary into a [`CoachDisplay`]; the display forwards
//! user text back into the engine and nothing else.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use super::summary::Summary;

/// Who a message is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Bot,
    User,
}

/// Rendering surface for the coach.
#[async_trait]
pub trait CoachDisplay: Send {
    /// Append a message to the conversation.
    async fn show_message(&mut self, text: &str, role: Role);

    /// Replace the current quick-action shortcuts. Selecting one is
    /// equivalent to submitting its label as text.
    async fn offer_quick_actions(&mut self, labels: &[&str]);

    /// Show the category-grouped report and score.
    async fn render_summary(&mut self, summary: &Summary);

    /// Leave the questionnaire for the search surface.
    async fn navigate_to_search(&mut self);

    /// Presentation pause. Never used for ordering.
    async fn pace(&mut self, _delay: Duration) {}

    /// Wipe the conversation, e.g. on restart.
    async fn clear(&mut self) {}
}

/// One thing the engine asked the display to do.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayEvent {
    Message { role: Role, text: String },
    QuickActions { labels: Vec<String> },
    Summary { summary: Summary },
    NavigateToSearch,
    Clear,
}

/// A display that records events instead of drawing them.
///
/// Backs the HTTP API, where the browser renders the events, and tests.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    events: Vec<DisplayEvent>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[DisplayEvent] {
        &self.events
    }

    /// Take everything recorded so far, leaving the transcript empty.
    pub fn drain(&mut self) -> Vec<DisplayEvent> {
        std::mem::take(&mut self.events)
    }

    /// Bot messages in order.
    pub fn bot_messages(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DisplayEvent::Message {
                    role: Role::Bot,
                    text,
                } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The most recently offered quick actions, if any.
    pub fn last_quick_actions(&self) -> Option<&[String]> {
        self.events.iter().rev().find_map(|e| match e {
            DisplayEvent::QuickActions { labels } => Some(labels.as_slice()),
            _ => None,
        })
    }
}

#[async_trait]
impl CoachDisplay for Transcript {
    async fn show_message(&mut self, text: &str, role: Role) {
        self.events.push(DisplayEvent::Message {
            role,
            text: text.to_string(),
        });
    }

    async fn offer_quick_actions(&mut self, labels: &[&str]) {
        self.events.push(DisplayEvent::QuickActions {
            labels: labels.iter().map(|l| l.to_string()).collect(),
        });
    }

    async fn render_summary(&mut self, summary: &Summary) {
        self.events.push(DisplayEvent::Summary {
            summary: summary.clone(),
        });
    }

    async fn navigate_to_search(&mut self) {
        self.events.push(DisplayEvent::NavigateToSearch);
    }

    async fn clear(&mut self) {
        self.events.push(DisplayEvent::Clear);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn transcript_records_in_order() {
        let mut t = Transcript::new();
        t.show_message("hello", Role::Bot).await;
        t.show_message("hi", Role::User).await;
        t.offer_quick_actions(&["Yes", "No"]).await;
        t.pace(Duration::from_secs(60)).await;
        t.navigate_to_search().await;

        assert_eq!(t.events().len(), 4);
        assert_eq!(t.bot_messages(), vec!["hello"]);
        assert_eq!(
            t.last_quick_actions().unwrap(),
            &["Yes".to_string(), "No".to_string()]
        );
        assert_eq!(t.events()[3], DisplayEvent::NavigateToSearch);

        let drained = t.drain();
        assert_eq!(drained.len(), 4);
        assert!(t.events().is_empty());
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_value(DisplayEvent::Message {
            role: Role::Bot,
            text: "hi".into(),
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "message", "role": "bot", "text": "hi"})
        );

        let json = serde_json::to_value(DisplayEvent::NavigateToSearch).unwrap();
        assert_eq!(json, serde_json::json!({"type": "navigate_to_search"}));
    }
}
