use hiersum_common::{AppConfig, Result};
use hiersum_llm::{LlmClient, OllamaClient, Summarizer};
use std::sync::Arc;

/// Shared application state
///
/// Read-only after startup; requests share nothing else.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Generation backend
    pub client: Arc<dyn LlmClient>,

    /// Hierarchical summarizer
    pub summarizer: Summarizer,
}

impl AppState {
    /// Create new application state backed by Ollama
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = OllamaClient::new(config.ollama_base_url.clone(), config.request_timeout())?;
        Ok(Self::with_client(config, Arc::new(client)))
    }

    /// Create state around an existing client
    pub fn with_client(config: AppConfig, client: Arc<dyn LlmClient>) -> Self {
        let summarizer = Summarizer::from_config(client.clone(), &config);
        Self {
            config,
            client,
            summarizer,
        }
    }
}
