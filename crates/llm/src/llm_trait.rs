use async_trait::async_trait;
use hiersum_common::BackendError;

use crate::types::GenerateRequest;

/// Common trait for generation backends
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate text from a prompt
    async fn generate(&self, request: GenerateRequest) -> Result<String, BackendError>;

    /// Test connection/availability
    async fn test_connection(&self) -> Result<bool, BackendError>;
}
