//! Readiness summary built from the ledger once every topic has been asked.

use serde::Serialize;

use super::checklist::Checklist;
use super::state::{Answer, Ledger};

/// Tri-state marker shown next to each summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    Check,
    Cross,
    Question,
}

impl Marker {
    /// Unanswered topics render the same as unsure ones.
    pub fn for_answer(answer: Option<Answer>) -> Self {
        match answer {
            Some(Answer::Prepared) => Self::Check,
            Some(Answer::Missing) => Self::Cross,
            Some(Answer::Unsure) | None => Self::Question,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Check => "✓",
            Self::Cross => "✗",
            Self::Question => "?",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryItem {
    pub key: String,
    pub label: String,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub items: Vec<SummaryItem>,
}

/// Readiness level selected by score threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessTier {
    /// 80% and above.
    Commendation,
    /// 50% up to 80%.
    Encouragement,
    /// Below 50%.
    Starter,
}

impl ReadinessTier {
    pub fn for_percentage(percentage: u8) -> Self {
        if percentage >= 80 {
            Self::Commendation
        } else if percentage >= 50 {
            Self::Encouragement
        } else {
            Self::Starter
        }
    }

    pub fn message(&self, percentage: u8) -> String {
        let body = match self {
            Self::Commendation => {
                "Excellent work! You're well-prepared for emergencies. Keep maintaining your supplies and reviewing your plans."
            }
            Self::Encouragement => {
                "You're on the right track! Focus on filling the gaps in your preparedness, especially the items marked with ✗."
            }
            Self::Starter => {
                "You've made a start! Emergency preparedness is a journey. Begin with the basics: water, food, and a family plan."
            }
        };
        format!("You're {percentage}% prepared! {body}")
    }
}

/// The grouped report plus the score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub groups: Vec<CategoryGroup>,
    pub prepared: usize,
    /// Topic count, not ledger size.
    pub total: usize,
    pub percentage: u8,
    pub tier: ReadinessTier,
    pub message: String,
}

impl Summary {
    /// Pure function of the checklist and ledger.
    pub fn generate(checklist: &Checklist, ledger: &Ledger) -> Self {
        let groups = checklist
            .categories()
            .into_iter()
            .map(|category| CategoryGroup {
                category: category.to_string(),
                items: checklist
                    .topics()
                    .iter()
                    .filter(|t| t.category == category)
                    .map(|t| SummaryItem {
                        key: t.key.clone(),
                        label: t.short_label().to_string(),
                        marker: Marker::for_answer(ledger.get(&t.key)),
                    })
                    .collect(),
            })
            .collect();

        let prepared = ledger.prepared_count();
        let total = checklist.len();
        let percentage = score(prepared, total);
        let tier = ReadinessTier::for_percentage(percentage);

        Self {
            groups,
            prepared,
            total,
            percentage,
            tier,
            message: tier.message(percentage),
        }
    }

    /// Plain-text rendering of the grouped report, for text channels.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::new();
        for group in &self.groups {
            lines.push(format!("{}:", group.category));
            for item in &group.items {
                lines.push(format!("  {} {}", item.marker.symbol(), item.label));
            }
        }
        lines.join("\n")
    }
}

/// Rounded percentage, half away from zero.
fn score(prepared: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (100.0 * prepared as f64 / total as f64).round() as u8
}
