use hiersum_llm::SummaryOutcome;
use serde::{Deserialize, Serialize};

/// Summarize request (urlencoded form or JSON body)
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    /// Text to summarize
    #[serde(default)]
    pub text: String,
}

/// Summarize response
#[derive(Debug, Serialize, Deserialize)]
pub struct SummarizeResponse {
    /// Final summary
    pub summary: String,

    /// Number of chunks
    pub chunks: usize,

    /// Per-chunk summaries in chunk order
    pub chunk_summaries: Vec<String>,
}

impl From<SummaryOutcome> for SummarizeResponse {
    fn from(outcome: SummaryOutcome) -> Self {
        Self {
            summary: outcome.final_summary,
            chunks: outcome.chunk_count,
            chunk_summaries: outcome.chunk_summaries,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,

    /// Debug rendering of the error chain
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            trace: None,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub backend_url: String,
    pub backend_reachable: bool,
}
