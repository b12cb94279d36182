//! Wire types for the assistant backend.

use serde::{Deserialize, Serialize};

/// Characters of source text shown under each citation.
pub const SNIPPET_CHARS: usize = 150;

/// Body of `POST /query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_context: Option<bool>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            conversation_id: None,
            use_context: None,
        }
    }

    /// Continue a conversation. With `use_context` off the backend answers
    /// directly without searching documents.
    pub fn in_conversation(mut self, conversation_id: impl Into<String>, use_context: bool) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self.use_context = Some(use_context);
        self
    }
}

/// A retrieved passage backing an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMatch {
    pub filename: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl SourceMatch {
    /// The first [`SNIPPET_CHARS`] characters of the passage, followed by `...`.
    pub fn snippet(&self) -> String {
        let head: String = self.text.chars().take(SNIPPET_CHARS).collect();
        format!("{head}...")
    }
}

/// Response of `POST /query`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub matches: Vec<SourceMatch>,
    /// Present when the backend wants the client to refresh its status badge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<serde_json::Value>,
}

/// Document ingestion progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionStatus {
    pub in_progress: bool,
    #[serde(default)]
    pub progress_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_file: Option<String>,
}

/// Response of `GET /status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStatus {
    pub documents_indexed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingestion: Option<IngestionStatus>,
}

impl IndexStatus {
    /// One-line status badge.
    pub fn describe(&self) -> String {
        let mut parts = vec![format!("📚 {} docs", self.documents_indexed)];
        match &self.ingestion {
            Some(ingestion) if ingestion.in_progress => {
                parts.push(format!("⏳ Ingesting: {:.0}%", ingestion.progress_percent));
                if let Some(file) = &ingestion.current_file {
                    parts.push(file.clone());
                }
            }
            _ if self.documents_indexed == 0 => {
                parts.push("⚠️ No documents indexed yet".to_string());
            }
            _ => parts.push("✓ Ready".to_string()),
        }
        parts.join("  ")
    }
}
