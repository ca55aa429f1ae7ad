use async_trait::async_trait;
use hiersum_common::error::truncate_chars;
use hiersum_common::{BackendError, Result};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::extract::extract_response_text;
use crate::llm_trait::LlmClient;
use crate::types::GenerateRequest;

/// Characters of the raw body written to the debug log
const LOG_BODY_LIMIT: usize = 800;

/// Ollama API client
///
/// One POST per call, no retries. A failed call is final; callers decide
/// how to degrade.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    base_url: String,
    client: Client,
    timeout: Duration,
}

impl OllamaClient {
    /// Create new Ollama client with a default per-call timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!("Ollama client initialized: {} (timeout {:?})", base_url, timeout);
        Ok(Self {
            base_url,
            client,
            timeout,
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    /// Generate text with Ollama
    pub async fn generate(
        &self,
        request: GenerateRequest,
    ) -> std::result::Result<String, BackendError> {
        let url = self.generate_url();
        let timeout = request.timeout.unwrap_or(self.timeout);

        info!(
            "Sending generate request - Model: {}, Prompt length: {} chars",
            request.model,
            request.prompt.chars().count()
        );
        let started = Instant::now();

        let response = self
            .client
            .post(&url)
            .timeout(timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(e, timeout))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::from_reqwest(e, timeout))?;

        info!(
            "Received response - Status: {}, Elapsed: {:.2}s",
            status,
            started.elapsed().as_secs_f64()
        );
        debug!(
            "Raw response (truncated): {}",
            truncate_chars(&body, LOG_BODY_LIMIT).replace('\n', "\\n")
        );

        if !status.is_success() {
            return Err(BackendError::status(status.as_u16(), &body));
        }

        let data: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| BackendError::malformed(e, &body))?;

        let extracted = extract_response_text(&data);
        if extracted.is_fallback() {
            warn!("No known text field in backend response, returning rendered body");
        } else {
            debug!("Extracted response text via {:?}", extracted.rule);
        }

        Ok(extracted.text)
    }

    /// Test connection to Ollama
    pub async fn test_connection(&self) -> std::result::Result<bool, BackendError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| BackendError::from_reqwest(e, self.timeout))?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn generate(
        &self,
        request: GenerateRequest,
    ) -> std::result::Result<String, BackendError> {
        OllamaClient::generate(self, request).await
    }

    async fn test_connection(&self) -> std::result::Result<bool, BackendError> {
        OllamaClient::test_connection(self).await
    }
}
