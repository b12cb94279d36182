//! Preparedness coach — a scripted questionnaire over a fixed checklist.
//!
//! The coach asks one checklist topic at a time, classifies the free-text
//! reply, records it in the session ledger, and once every topic has been
//! asked renders a category-grouped readiness summary with a score.
//! Rendering goes through the [`CoachDisplay`] collaborator; the engine
//! owns the session state.

pub mod checklist;
pub mod display;
pub mod engine;
pub mod intent;
pub mod prompts;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod summary;

pub use checklist::{Checklist, Topic};
pub use display::{CoachDisplay, DisplayEvent, Role, Transcript};
pub use engine::CoachEngine;
pub use intent::{FinalAction, Intent, IntentClassifier, KeywordClassifier, OpeningCommand};
pub use routes::{CoachRouteState, coach_routes};
pub use sessions::{CoachSessions, CoachStatus, spawn_expiry_task};
pub use state::{Answer, CoachPhase, CoachSession, Ledger};
pub use summary::{CategoryGroup, Marker, ReadinessTier, Summary, SummaryItem};
