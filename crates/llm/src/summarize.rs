use hiersum_common::{AppConfig, BackendError, HierSumError, Result};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::chunking::{chunk_text, TextChunk};
use crate::llm_trait::LlmClient;
use crate::prompts::{chunk_error_placeholder, chunk_prompt, combine_prompt};
use crate::types::{GenerateRequest, SummaryOutcome};

/// Hierarchical summarizer for long text
///
/// Each chunk is summarized on its own, strictly in order, then the partial
/// summaries are merged by one combination request. A failed chunk leaves a
/// placeholder in its slot and a failed combination falls back to the
/// stitched partial summaries, so only empty input can fail a run.
pub struct Summarizer {
    client: Arc<dyn LlmClient>,
    model: String,
    max_chunk_chars: usize,
}

impl Summarizer {
    /// Create new summarizer
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        max_chunk_chars: usize,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            max_chunk_chars,
        }
    }

    /// Create summarizer with model and chunk size taken from configuration
    pub fn from_config(client: Arc<dyn LlmClient>, config: &AppConfig) -> Self {
        Self::new(client, config.llm_model.clone(), config.max_chunk_chars)
    }

    /// Model used for every request
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Summarize text: chunk, summarize each chunk, combine
    pub async fn summarize(&self, text: &str) -> Result<SummaryOutcome> {
        let chunks = chunk_text(text, self.max_chunk_chars);
        info!(
            "Input length {} chars -> {} chunk(s) (max {})",
            text.chars().count(),
            chunks.len(),
            self.max_chunk_chars
        );

        if chunks.is_empty() {
            return Err(HierSumError::invalid_input("no text to summarize"));
        }

        let mut chunk_summaries = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let summary = match self.summarize_chunk(chunk, chunks.len()).await {
                Ok(summary) => summary.trim().to_string(),
                Err(e) => {
                    error!("Chunk {} failed: {}", chunk.index, e);
                    chunk_error_placeholder(chunk.index, &e)
                }
            };
            chunk_summaries.push(summary);
        }

        let final_summary = if let [only] = chunk_summaries.as_slice() {
            debug!("Single chunk, skipping combination step");
            only.clone()
        } else {
            match self.combine(&chunk_summaries).await {
                Ok(combined) => combined,
                Err(e) => {
                    error!("Final combine failed: {}", e);
                    chunk_summaries.join(" ")
                }
            }
        };

        Ok(SummaryOutcome {
            final_summary: final_summary.trim().to_string(),
            chunk_count: chunks.len(),
            chunk_summaries,
        })
    }

    /// Summarize a single chunk
    async fn summarize_chunk(
        &self,
        chunk: &TextChunk,
        total: usize,
    ) -> std::result::Result<String, BackendError> {
        info!(
            "Summarizing chunk {}/{} (len {} chars)",
            chunk.index,
            total,
            chunk.char_len()
        );
        let request = GenerateRequest::new(self.model.clone(), chunk_prompt(&chunk.text));
        self.client.generate(request).await
    }

    /// Merge chunk summaries into one
    async fn combine(
        &self,
        chunk_summaries: &[String],
    ) -> std::result::Result<String, BackendError> {
        let combined = chunk_summaries.join("\n\n");
        info!(
            "Combining {} chunk summaries into final summary (len {} chars)",
            chunk_summaries.len(),
            combined.chars().count()
        );
        let request = GenerateRequest::new(self.model.clone(), combine_prompt(&combined));
        self.client.generate(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::{CHUNK_INSTRUCTION, COMBINE_INSTRUCTION};
    use async_trait::async_trait;
    use std::sync::Mutex;

    type Reply = Box<dyn Fn(&str) -> std::result::Result<String, BackendError> + Send + Sync>;

    /// Backend that answers from a script and records every request
    struct ScriptedClient {
        reply: Reply,
        requests: Mutex<Vec<GenerateRequest>>,
    }

    impl ScriptedClient {
        fn new<F>(reply: F) -> Arc<Self>
        where
            F: Fn(&str) -> std::result::Result<String, BackendError> + Send + Sync + 'static,
        {
            Arc::new(Self {
                reply: Box::new(reply),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn prompts(&self) -> Vec<String> {
            self.requests
                .lock()
                .unwrap()
                .iter()
                .map(|r| r.prompt.clone())
                .collect()
        }

        fn combine_calls(&self) -> usize {
            self.prompts()
                .iter()
                .filter(|p| p.starts_with(COMBINE_INSTRUCTION))
                .count()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        async fn generate(
            &self,
            request: GenerateRequest,
        ) -> std::result::Result<String, BackendError> {
            let reply = (self.reply)(&request.prompt);
            self.requests.lock().unwrap().push(request);
            reply
        }

        async fn test_connection(&self) -> std::result::Result<bool, BackendError> {
            Ok(true)
        }
    }

    fn ok_or_combined(prompt: &str) -> std::result::Result<String, BackendError> {
        if prompt.starts_with(COMBINE_INSTRUCTION) {
            Ok("combined".to_string())
        } else {
            Ok("ok".to_string())
        }
    }

    fn summarizer(client: Arc<ScriptedClient>, max_chunk_chars: usize) -> Summarizer {
        Summarizer::new(client, "test-model", max_chunk_chars)
    }

    #[tokio::test]
    async fn test_three_chunks_are_combined() {
        let client = ScriptedClient::new(ok_or_combined);
        let outcome = summarizer(client.clone(), 2).summarize("A. B. C.").await.unwrap();

        assert_eq!(outcome.final_summary, "combined");
        assert_eq!(outcome.chunk_count, 3);
        assert_eq!(outcome.chunk_summaries, vec!["ok", "ok", "ok"]);
        assert_eq!(client.combine_calls(), 1);

        let prompts = client.prompts();
        assert_eq!(prompts.len(), 4);
        assert_eq!(prompts[0], format!("{}\n\nA.", CHUNK_INSTRUCTION));
        assert_eq!(prompts[2], format!("{}\n\nC.", CHUNK_INSTRUCTION));
        assert!(prompts[3].ends_with("ok\n\nok\n\nok"));
    }

    #[tokio::test]
    async fn test_single_chunk_skips_combination() {
        let client = ScriptedClient::new(|_| Ok("  the only summary \n".to_string()));
        let outcome = summarizer(client.clone(), 2500)
            .summarize("One short paragraph. Nothing more.")
            .await
            .unwrap();

        assert_eq!(outcome.chunk_count, 1);
        assert_eq!(outcome.final_summary, "the only summary");
        assert_eq!(outcome.chunk_summaries, vec!["the only summary"]);
        assert_eq!(client.combine_calls(), 0);
        assert_eq!(client.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_chunk_gets_placeholder() {
        let client = ScriptedClient::new(|prompt| {
            if prompt.ends_with("B.") {
                Err(BackendError::status(500, "boom"))
            } else {
                ok_or_combined(prompt)
            }
        });
        let outcome = summarizer(client.clone(), 2).summarize("A. B. C.").await.unwrap();

        assert_eq!(outcome.chunk_count, 3);
        assert_eq!(outcome.chunk_summaries[0], "ok");
        assert_eq!(
            outcome.chunk_summaries[1],
            "[Error summarizing chunk 2: backend returned HTTP 500: boom]"
        );
        assert_eq!(outcome.chunk_summaries[2], "ok");
        assert_eq!(outcome.final_summary, "combined");

        // the placeholder is part of the combination input
        let prompts = client.prompts();
        assert!(prompts[3].contains("[Error summarizing chunk 2:"));
    }

    #[tokio::test]
    async fn test_failed_combination_stitches_summaries() {
        let client = ScriptedClient::new(|prompt| {
            if prompt.starts_with(COMBINE_INSTRUCTION) {
                Err(BackendError::Timeout(std::time::Duration::from_secs(600)))
            } else {
                Ok(format!("summary of {}", prompt.rsplit("\n\n").next().unwrap_or_default()))
            }
        });
        let outcome = summarizer(client, 2).summarize("A. B. C.").await.unwrap();

        assert_eq!(
            outcome.final_summary,
            "summary of A. summary of B. summary of C."
        );
        assert_eq!(outcome.chunk_count, 3);
    }

    #[tokio::test]
    async fn test_everything_failing_still_returns_outcome() {
        let client =
            ScriptedClient::new(|_| Err(BackendError::Transport("connection refused".to_string())));
        let outcome = summarizer(client.clone(), 2).summarize("A. B.").await.unwrap();

        assert_eq!(outcome.chunk_count, 2);
        assert_eq!(
            outcome.final_summary,
            "[Error summarizing chunk 1: backend transport error: connection refused] \
             [Error summarizing chunk 2: backend transport error: connection refused]"
        );
        assert_eq!(client.combine_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected_without_calls() {
        let client = ScriptedClient::new(ok_or_combined);
        let err = summarizer(client.clone(), 100).summarize("  \n ").await.unwrap_err();

        assert!(matches!(err, HierSumError::InvalidInput(_)));
        assert!(client.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_chunk_count_matches_chunker_and_order() {
        let text: String = (0..40)
            .map(|i| format!("This is sentence {i} of the document."))
            .collect::<Vec<_>>()
            .join(" ");
        let expected = chunk_text(&text, 120);

        let client = ScriptedClient::new(ok_or_combined);
        let outcome = summarizer(client.clone(), 120).summarize(&text).await.unwrap();

        assert_eq!(outcome.chunk_count, expected.len());
        assert_eq!(outcome.chunk_summaries.len(), expected.len());

        let prompts = client.prompts();
        for (prompt, chunk) in prompts.iter().zip(&expected) {
            assert_eq!(prompt, &chunk_prompt(&chunk.text));
        }
        assert!(prompts.last().unwrap().starts_with(COMBINE_INSTRUCTION));
    }

    #[tokio::test]
    async fn test_requests_use_configured_model() {
        let client = ScriptedClient::new(ok_or_combined);
        let config = AppConfig {
            llm_model: "mistral:7b".to_string(),
            max_chunk_chars: 2,
            ..AppConfig::default()
        };
        let summarizer = Summarizer::from_config(client.clone(), &config);
        assert_eq!(summarizer.model(), "mistral:7b");

        summarizer.summarize("A. B.").await.unwrap();
        let requests = client.requests.lock().unwrap();
        assert!(requests.iter().all(|r| r.model == "mistral:7b" && !r.stream));
    }
}
