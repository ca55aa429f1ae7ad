use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama generate request
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    /// Model name (e.g., "llama2:7b", "llama3.2")
    pub model: String,

    /// Prompt text
    pub prompt: String,

    /// Always false, the whole response is read at once
    pub stream: bool,

    /// Per-call timeout, falls back to the client default
    #[serde(skip)]
    pub timeout: Option<Duration>,
}

impl GenerateRequest {
    /// Create non-streaming request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
            timeout: None,
        }
    }

    /// Override the client timeout for this call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Result of one hierarchical summarization run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryOutcome {
    /// Final combined summary, trimmed
    pub final_summary: String,

    /// Number of chunks the input was split into
    pub chunk_count: usize,

    /// One entry per chunk in chunk order, placeholders included
    pub chunk_summaries: Vec<String>,
}
