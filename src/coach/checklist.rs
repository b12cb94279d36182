//! The preparedness checklist — an ordered, immutable list of topics.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::ChecklistError;

/// One checklist question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    /// Stable identifier, unique within a checklist.
    pub key: String,
    /// The question asked of the user.
    pub prompt: String,
    /// Shown after an affirmative answer.
    pub follow_up: String,
    /// Grouping label for the summary. Not unique.
    pub category: String,
}

impl Topic {
    pub fn new(
        key: impl Into<String>,
        prompt: impl Into<String>,
        follow_up: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            prompt: prompt.into(),
            follow_up: follow_up.into(),
            category: category.into(),
        }
    }

    /// The prompt up to its first `?`, used as the summary line.
    pub fn short_label(&self) -> &str {
        self.prompt.split('?').next().unwrap_or(&self.prompt).trim_end()
    }
}

/// The ordered sequence of topics. Order defines question sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Checklist {
    topics: Vec<Topic>,
}

impl Checklist {
    /// Build a checklist, rejecting empty lists and duplicate keys.
    pub fn new(topics: Vec<Topic>) -> Result<Self, ChecklistError> {
        if topics.is_empty() {
            return Err(ChecklistError::Empty);
        }
        let mut seen = HashSet::new();
        for topic in &topics {
            if !seen.insert(topic.key.as_str()) {
                return Err(ChecklistError::DuplicateKey(topic.key.clone()));
            }
        }
        Ok(Self { topics })
    }

    /// Number of topics (`N`).
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Always false for a constructed checklist; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    /// Topic at a 1-based position, matching the session cursor.
    pub fn at_position(&self, position: usize) -> Option<&Topic> {
        position.checked_sub(1).and_then(|i| self.topics.get(i))
    }

    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.topics.iter().position(|t| t.key == key).map(|i| i + 1)
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for topic in &self.topics {
            if !out.contains(&topic.category.as_str()) {
                out.push(&topic.category);
            }
        }
        out
    }

    /// The emergency preparedness assessment: ten topics across eight categories.
    pub fn preparedness() -> Self {
        let topics = vec![
            Topic::new(
                "musterPoint",
                "Do you have a designated family meeting point in case of emergency?",
                "Great! Make sure everyone knows where it is. Consider having both a nearby location (like a neighbor's house) and a distant location (like a relative's home in another town).",
                "Planning",
            ),
            Topic::new(
                "water",
                "Do you have emergency water supplies? (Recommended: 1 gallon per person per day for at least 3 days)",
                "Remember to also have water purification tablets or a way to boil water. Store water in a cool, dark place and replace every 6 months.",
                "Supplies",
            ),
            Topic::new(
                "food",
                "Do you have non-perishable food for at least 3 days?",
                "Good! Don't forget a manual can opener. Choose foods that don't require cooking or refrigeration. Check expiration dates regularly.",
                "Supplies",
            ),
            Topic::new(
                "firstAid",
                "Do you have a well-stocked first aid kit?",
                "Excellent! Make sure it includes any prescription medications you need. Consider taking a first aid course too.",
                "Medical",
            ),
            Topic::new(
                "flashlights",
                "Do you have flashlights and extra batteries?",
                "Great! Keep one in each room and check batteries every 6 months. Consider hand-crank or solar flashlights too.",
                "Equipment",
            ),
            Topic::new(
                "radio",
                "Do you have a battery-powered or hand-crank radio?",
                "Perfect! This will help you stay informed during power outages. NOAA Weather Radio is especially useful.",
                "Communication",
            ),
            Topic::new(
                "cash",
                "Do you have emergency cash in small bills?",
                "Smart thinking! ATMs and credit card machines may not work. Keep cash in a waterproof container.",
                "Financial",
            ),
            Topic::new(
                "documents",
                "Do you have copies of important documents in a waterproof container?",
                "Excellent! Include IDs, insurance policies, bank info, and medical records. Consider digital copies too.",
                "Documentation",
            ),
            Topic::new(
                "plan",
                "Does your family have a written emergency plan?",
                "Wonderful! Review it every 6 months and practice it. Include out-of-state contacts and evacuation routes.",
                "Planning",
            ),
            Topic::new(
                "localThreats",
                "Do you know the specific threats in your area? (floods, earthquakes, tornadoes, etc.)",
                "Good awareness! Make sure your kit and plan address these specific risks. Sign up for local emergency alerts.",
                "Awareness",
            ),
        ];
        Self { topics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preparedness_has_ten_unique_topics() {
        let checklist = Checklist::preparedness();
        assert_eq!(checklist.len(), 10);
        // Round-trips through the validating constructor.
        let rebuilt = Checklist::new(checklist.topics().to_vec()).unwrap();
        assert_eq!(rebuilt, checklist);
    }

    #[test]
    fn categories_in_first_seen_order() {
        let checklist = Checklist::preparedness();
        assert_eq!(
            checklist.categories(),
            vec![
                "Planning",
                "Supplies",
                "Medical",
                "Equipment",
                "Communication",
                "Financial",
                "Documentation",
                "Awareness",
            ]
        );
    }

    #[test]
    fn positions_are_one_based() {
        let checklist = Checklist::preparedness();
        assert!(checklist.at_position(0).is_none());
        assert_eq!(checklist.at_position(1).unwrap().key, "musterPoint");
        assert_eq!(checklist.at_position(10).unwrap().key, "localThreats");
        assert!(checklist.at_position(11).is_none());
        assert_eq!(checklist.position_of("water"), Some(2));
        assert_eq!(checklist.position_of("nope"), None);
    }

    #[test]
    fn rejects_empty_and_duplicates() {
        assert_eq!(Checklist::new(vec![]).unwrap_err(), ChecklistError::Empty);

        let dup = vec![
            Topic::new("a", "A?", "ok", "X"),
            Topic::new("a", "B?", "ok", "Y"),
        ];
        assert_eq!(
            Checklist::new(dup).unwrap_err(),
            ChecklistError::DuplicateKey("a".into())
        );
    }

    #[test]
    fn short_label_cuts_at_question_mark() {
        let checklist = Checklist::preparedness();
        let water = checklist.at_position(2).unwrap();
        assert_eq!(water.short_label(), "Do you have emergency water supplies");

        let no_mark = Topic::new("k", "Plain statement", "", "C");
        assert_eq!(no_mark.short_label(), "Plain statement");
    }
}
