//! Fixed bot messages and quick-action labels for the coach.

pub const GREETING: &str = "Hi! I'm your emergency preparedness coach. I'll help you assess your readiness for emergencies. This will only take a few minutes. Ready to start?";

/// Shown when the user asks for more detail before starting.
pub fn more_info(topic_count: usize) -> String {
    format!(
        "I'll ask you about {topic_count} key areas of emergency preparedness. For each one, you can answer yes, no, or tell me more. At the end, I'll give you a personalized summary of what you have and what you might need. It's completely private - no data is stored. Ready to begin?"
    )
}

pub const OPENING_FALLBACK: &str =
    "Just say \"start\" when you're ready, or ask me to tell you more.";

pub const ENCOURAGEMENT: &str =
    "That's okay! This is something to consider adding to your emergency kit. Every step counts!";

pub const CAUTION: &str =
    "It's good to double-check! Mark this as something to review. Better safe than sorry!";

pub const CLARIFICATION: &str =
    "I didn't quite understand. Do you have this item/plan in place?";

pub const COMPLETED: &str =
    "Great job completing the assessment! Here's your personalized emergency preparedness summary:";

pub const SEARCH_OFFER: &str =
    "Would you like to search for specific information about any of these topics?";

pub const START_ACTIONS: &[&str] = &["Yes, let's start!", "Tell me more first"];
pub const BEGIN_ACTIONS: &[&str] = &["Yes, let's start!"];
pub const ANSWER_ACTIONS: &[&str] = &["Yes", "No", "Not sure"];
pub const FINAL_ACTIONS: &[&str] = &["Go to search", "Start over"];
