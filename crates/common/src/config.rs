use crate::error::HierSumError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// hiersum application configuration
///
/// Built once at startup and passed explicitly to the client, the
/// summarizer and the server. Never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Ollama API base URL
    pub ollama_base_url: String,

    /// LLM summarization model name
    pub llm_model: String,

    /// Per-call backend timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum characters per chunk
    pub max_chunk_chars: usize,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ollama_base_url: "http://localhost:11434".to_string(),
            llm_model: "llama2:7b".to_string(),
            request_timeout_secs: 600,
            max_chunk_chars: 2500,
            server_host: "127.0.0.1".to_string(),
            server_port: 5000,
            log_dir: PathBuf::from("./log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, HierSumError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let defaults = Self::default();

        let config = Self {
            ollama_base_url: std::env::var("OLLAMA_URL")
                .unwrap_or(defaults.ollama_base_url),
            llm_model: std::env::var("OLLAMA_MODEL")
                .unwrap_or(defaults.llm_model),
            request_timeout_secs: Self::get_env_parsed("OLLAMA_TIMEOUT")?
                .unwrap_or(defaults.request_timeout_secs),
            max_chunk_chars: Self::get_env_parsed("MAX_CHUNK_CHARS")?
                .unwrap_or(defaults.max_chunk_chars),
            server_host: std::env::var("SERVER_HOST")
                .unwrap_or(defaults.server_host),
            server_port: Self::get_env_parsed("SERVER_PORT")?
                .unwrap_or(defaults.server_port),
            log_dir: std::env::var("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: std::env::var("LOG_LEVEL")
                .unwrap_or(defaults.log_level),
        };

        config.validate()?;

        Ok(config)
    }

    /// Parse an optional numeric environment variable
    fn get_env_parsed<T>(key: &str) -> Result<Option<T>, HierSumError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match std::env::var(key) {
            Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|e| {
                HierSumError::config(format!("Invalid value for {}: '{}' ({})", key, raw, e))
            }),
            Err(_) => Ok(None),
        }
    }

    /// Per-call backend timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), HierSumError> {
        if self.llm_model.trim().is_empty() {
            return Err(HierSumError::config("Model name cannot be empty"));
        }

        // Validate Ollama URL
        if !self.ollama_base_url.starts_with("http://")
            && !self.ollama_base_url.starts_with("https://")
        {
            return Err(HierSumError::config("Ollama base URL must start with http:// or https://"));
        }

        if self.request_timeout_secs == 0 {
            return Err(HierSumError::config("Request timeout must be at least 1 second"));
        }

        if self.max_chunk_chars == 0 {
            return Err(HierSumError::config("Max chunk size must be positive"));
        }

        // Validate port range
        if self.server_port == 0 {
            return Err(HierSumError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}
