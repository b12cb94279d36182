//! CoachEngine — drives one questionnaire session through its phases.
//!
//! Transition table:
//!
//! | phase        | input                  | effect                                   |
//! |--------------|------------------------|------------------------------------------|
//! | `NotStarted` | start ("yes"/"start")  | → `Asking(1)`, ask first topic           |
//! | `NotStarted` | "tell me more"         | explain, offer start                     |
//! | `NotStarted` | anything else          | clarify, re-offer opening actions        |
//! | `Asking(i)`  | affirm / deny / unsure | record, respond, → `Asking(i+1)`/Summary |
//! | `Asking(i)`  | unknown                | clarify, re-offer answers                |
//! | `Summary`    | "search"               | navigate to search                       |
//! | `Summary`    | "start over"           | reset, → `NotStarted`, greet again       |
//! | `Summary`    | anything else          | dropped                                  |

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::CoachConfig;

use super::checklist::Checklist;
use super::display::{CoachDisplay, Role};
use super::intent::{FinalAction, Intent, IntentClassifier, KeywordClassifier, OpeningCommand};
use super::prompts;
use super::state::{Answer, CoachPhase, CoachSession};
use super::summary::Summary;

/// Owns a session and the rules for moving it forward.
pub struct CoachEngine {
    checklist: Arc<Checklist>,
    classifier: Box<dyn IntentClassifier>,
    session: CoachSession,
    summary: Option<Summary>,
    config: CoachConfig,
}

impl CoachEngine {
    pub fn new(checklist: Arc<Checklist>, config: CoachConfig) -> Self {
        let session = CoachSession::new(checklist.len());
        Self {
            checklist,
            classifier: Box::new(KeywordClassifier::default()),
            session,
            summary: None,
            config,
        }
    }

    /// Swap the answer classifier.
    pub fn with_classifier(mut self, classifier: impl IntentClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn phase(&self) -> CoachPhase {
        self.session.phase()
    }

    pub fn session(&self) -> &CoachSession {
        &self.session
    }

    pub fn checklist(&self) -> &Checklist {
        &self.checklist
    }

    /// The summary, once the session has reached it.
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// Greet the user and offer to start.
    pub async fn start(&mut self, display: &mut dyn CoachDisplay) {
        display.show_message(prompts::GREETING, Role::Bot).await;
        display.offer_quick_actions(prompts::START_ACTIONS).await;
    }

    /// Process one utterance to completion and return the resulting phase.
    ///
    /// Blank input is ignored.
    pub async fn handle(&mut self, text: &str, display: &mut dyn CoachDisplay) -> CoachPhase {
        let text = text.trim();
        if text.is_empty() {
            return self.phase();
        }

        display.show_message(text, Role::User).await;
        display.pace(self.config.input_delay).await;

        match self.phase() {
            CoachPhase::NotStarted => self.handle_opening(text, display).await,
            CoachPhase::Asking(position) => self.handle_answer(position, text, display).await,
            CoachPhase::Summary => self.handle_final_action(text, display).await,
        }

        self.session.check_invariants(&self.checklist);
        self.phase()
    }

    async fn handle_opening(&mut self, text: &str, display: &mut dyn CoachDisplay) {
        match OpeningCommand::parse(text) {
            Some(OpeningCommand::Start) => {
                self.session.begin();
                info!(topics = self.checklist.len(), "Preparedness assessment started");
                self.ask_current(display).await;
            }
            Some(OpeningCommand::TellMeMore) => {
                let info = prompts::more_info(self.checklist.len());
                display.show_message(&info, Role::Bot).await;
                display.offer_quick_actions(prompts::BEGIN_ACTIONS).await;
            }
            None => {
                debug!(text, "Unrecognized input before start");
                display.show_message(prompts::OPENING_FALLBACK, Role::Bot).await;
                display.offer_quick_actions(prompts::START_ACTIONS).await;
            }
        }
    }

    async fn handle_answer(&mut self, position: usize, text: &str, display: &mut dyn CoachDisplay) {
        let topic = self
            .checklist
            .at_position(position)
            .expect("cursor within checklist while asking");
        let intent = self.classifier.classify(text);
        debug!(topic = %topic.key, %intent, "Classified answer");

        let (answer, reply) = match intent {
            Intent::Affirm => (Answer::Prepared, topic.follow_up.clone()),
            Intent::Deny => (Answer::Missing, prompts::ENCOURAGEMENT.to_string()),
            Intent::Unsure => (Answer::Unsure, prompts::CAUTION.to_string()),
            Intent::Unknown => {
                display.show_message(prompts::CLARIFICATION, Role::Bot).await;
                display.offer_quick_actions(prompts::ANSWER_ACTIONS).await;
                return;
            }
        };

        let key = topic.key.clone();
        let next = self.session.record(&key, answer);
        debug!(topic = %key, phase = %next, "Recorded answer");

        display.show_message(&reply, Role::Bot).await;
        display.pace(self.config.follow_up_delay).await;

        match next {
            CoachPhase::Asking(_) => self.ask_current(display).await,
            CoachPhase::Summary => self.enter_summary(display).await,
            CoachPhase::NotStarted => unreachable!("recording an answer never rewinds"),
        }
    }

    async fn handle_final_action(&mut self, text: &str, display: &mut dyn CoachDisplay) {
        match FinalAction::parse(text) {
            Some(FinalAction::Search) => {
                info!("Leaving assessment for search");
                display.navigate_to_search().await;
            }
            Some(FinalAction::StartOver) => {
                info!("Restarting assessment");
                self.session.reset();
                self.summary = None;
                display.clear().await;
                self.start(display).await;
            }
            None => debug!(text, "Ignoring input after summary"),
        }
    }

    async fn ask_current(&mut self, display: &mut dyn CoachDisplay) {
        let CoachPhase::Asking(position) = self.phase() else {
            panic!("ask_current called in phase {}", self.phase());
        };
        let topic = self
            .checklist
            .at_position(position)
            .expect("cursor within checklist while asking");
        display.show_message(&topic.prompt, Role::Bot).await;
        display.offer_quick_actions(prompts::ANSWER_ACTIONS).await;
    }

    async fn enter_summary(&mut self, display: &mut dyn CoachDisplay) {
        let summary = Summary::generate(&self.checklist, self.session.ledger());
        info!(
            prepared = summary.prepared,
            total = summary.total,
            percentage = summary.percentage,
            "Preparedness assessment complete"
        );

        display.show_message(prompts::COMPLETED, Role::Bot).await;
        display.render_summary(&summary).await;
        display.pace(self.config.summary_delay).await;
        display.show_message(&summary.message, Role::Bot).await;
        display.show_message(prompts::SEARCH_OFFER, Role::Bot).await;
        display.offer_quick_actions(prompts::FINAL_ACTIONS).await;

        self.summary = Some(summary);
    }
}
