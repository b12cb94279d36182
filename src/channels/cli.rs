//! CLI channel — stdin/stdout rendition of the coach and search surfaces.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::{BackendClient, QueryRequest, QueryResponse};
use crate::coach::{CoachDisplay, CoachEngine, Role, Summary};
use crate::error::ChannelError;

pub const SEARCH_GREETING: &str = "Hello! I'm your emergency knowledge assistant. I can help you with survival tips, emergency procedures, medical advice, and preparedness information. What would you like to know?";

pub const SUGGESTED_PROMPTS: &[&str] = &[
    "What are basic emergency preparedness steps?",
    "How do I purify water?",
    "First aid for burns",
    "72-hour emergency kit checklist",
];

/// Renders coach output as plain text lines.
///
/// Quick actions are numbered; typing the number submits the label.
pub struct CliDisplay<W> {
    out: W,
    actions: Vec<String>,
    search_requested: bool,
}

impl<W: Write + Send> CliDisplay<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            actions: Vec::new(),
            search_requested: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Map a quick-action number to its label; anything else passes through.
    pub fn resolve(&self, input: &str) -> String {
        input
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.actions.get(i))
            .cloned()
            .unwrap_or_else(|| input.trim().to_string())
    }

    /// Whether the coach asked to leave for search since the last call.
    pub fn take_search_request(&mut self) -> bool {
        std::mem::take(&mut self.search_requested)
    }

    fn clear_actions(&mut self) {
        self.actions.clear();
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}") {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

#[async_trait]
impl<W: Write + Send> CoachDisplay for CliDisplay<W> {
    async fn show_message(&mut self, text: &str, role: Role) {
        // The terminal already echoes what the user typed.
        if role == Role::Bot {
            self.line(&format!("\n{text}"));
        }
    }

    async fn offer_quick_actions(&mut self, labels: &[&str]) {
        self.actions = labels.iter().map(|l| l.to_string()).collect();
        let rendered: Vec<String> = labels
            .iter()
            .enumerate()
            .map(|(i, l)| format!("[{}] {}", i + 1, l))
            .collect();
        self.line(&format!("  {}", rendered.join("  ")));
    }

    async fn render_summary(&mut self, summary: &Summary) {
        self.line("");
        self.line(&summary.to_text());
        self.line(&format!(
            "\nPrepared: {}/{} ({}%)",
            summary.prepared, summary.total, summary.percentage
        ));
    }

    async fn navigate_to_search(&mut self) {
        self.search_requested = true;
    }

    async fn pace(&mut self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    async fn clear(&mut self) {
        self.clear_actions();
        self.line("\n────────────────────────────────────────");
    }
}

/// Reply to `/context on|off`.
pub fn context_notice(use_context: bool) -> String {
    let (status, effect) = if use_context {
        ("enabled", "search documents to help answer your questions")
    } else {
        ("disabled", "respond directly without searching documents")
    };
    format!("Document context {status}. I'll {effect}.")
}

/// Which surface input lines are routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Coach,
    Search,
}

/// Whether the read loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal session: the coach first, search once the coach hands off.
pub struct CliSession<W> {
    engine: CoachEngine,
    backend: BackendClient,
    display: CliDisplay<W>,
    mode: Mode,
    conversation_id: Uuid,
    use_context: bool,
}

impl<W: Write + Send> CliSession<W> {
    pub fn new(engine: CoachEngine, backend: BackendClient, out: W) -> Self {
        Self {
            engine,
            backend,
            display: CliDisplay::new(out),
            mode: Mode::Coach,
            conversation_id: Uuid::new_v4(),
            use_context: true,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn engine(&self) -> &CoachEngine {
        &self.engine
    }

    pub fn conversation_id(&self) -> Uuid {
        self.conversation_id
    }

    pub fn use_context(&self) -> bool {
        self.use_context
    }

    pub fn into_output(self) -> W {
        self.display.into_inner()
    }

    /// Greet and read lines until EOF or `/quit`.
    ///
    /// Stops with [`ChannelError::Output`] once the terminal can no longer
    /// be written to.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<(), ChannelError> {
        self.engine.start(&mut self.display).await;
        self.prompt()?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await.map_err(ChannelError::Input)? {
            if self.handle_line(&line).await == Flow::Quit {
                break;
            }
            self.prompt()?;
        }
        Ok(())
    }

    /// Route one input line.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let line = line.trim();
        match line {
            "" => return Flow::Continue,
            "/quit" => return Flow::Quit,
            "/status" => {
                self.show_status().await;
                return Flow::Continue;
            }
            "/coach" => {
                self.mode = Mode::Coach;
                self.display.line("\nBack to the preparedness coach.");
                return Flow::Continue;
            }
            "/search" => {
                self.enter_search().await;
                return Flow::Continue;
            }
            "/new" => {
                self.new_conversation().await;
                return Flow::Continue;
            }
            _ => {}
        }
        if let Some(arg) = line.strip_prefix("/context") {
            self.set_context(arg.trim());
            return Flow::Continue;
        }

        let text = self.display.resolve(line);
        match self.mode {
            Mode::Coach => {
                self.engine.handle(&text, &mut self.display).await;
                if self.display.take_search_request() {
                    self.enter_search().await;
                }
            }
            Mode::Search => self.ask(&text).await,
        }
        Flow::Continue
    }

    async fn enter_search(&mut self) {
        info!(conversation_id = %self.conversation_id, "Switching to search");
        self.mode = Mode::Search;
        self.display.show_message(SEARCH_GREETING, Role::Bot).await;
        self.display.offer_quick_actions(SUGGESTED_PROMPTS).await;
    }

    /// Forget the search conversation and greet again.
    async fn new_conversation(&mut self) {
        self.conversation_id = Uuid::new_v4();
        info!(conversation_id = %self.conversation_id, "New conversation");
        self.display.clear().await;
        self.enter_search().await;
    }

    fn set_context(&mut self, arg: &str) {
        self.use_context = match arg {
            "on" => true,
            "off" => false,
            _ => {
                self.display.line("Usage: /context on|off");
                return;
            }
        };
        self.display.line(&format!("\n{}", context_notice(self.use_context)));
    }

    async fn ask(&mut self, query: &str) {
        // Suggested prompts only apply to the first question.
        self.display.clear_actions();

        let request = QueryRequest::new(query)
            .in_conversation(self.conversation_id.to_string(), self.use_context);
        match self.backend.query(&request).await {
            Ok(response) => {
                self.show_answer(&response);
                if response.status.is_some() {
                    self.show_status().await;
                }
            }
            Err(e) => {
                warn!("Query failed: {}", e);
                self.display.line(&format!(
                    "\nI'm sorry, I encountered an error. Please try again. Error: {e}"
                ));
            }
        }
    }

    fn show_answer(&mut self, response: &QueryResponse) {
        self.display.line(&format!("\n{}", response.answer));
        if response.matches.is_empty() {
            return;
        }
        self.display.line("\nSources:");
        for source in &response.matches {
            let url = self.backend.source_url(&source.filename);
            self.display.line(&format!("  {} <{}>", source.filename, url));
            self.display.line(&format!("    {}", source.snippet()));
        }
    }

    async fn show_status(&mut self) {
        match self.backend.status().await {
            Ok(status) => self.display.line(&status.describe()),
            Err(e) => {
                warn!("Failed to check status: {}", e);
                self.display.line(&format!("Status unavailable: {e}"));
            }
        }
    }

    fn prompt(&mut self) -> Result<(), ChannelError> {
        write!(self.display.out, "\n> ")
            .and_then(|_| self.display.out.flush())
            .map_err(ChannelError::Output)
    }
}
