//! Embedding provider trait definition

use async_trait::async_trait;

use super::{EmbeddingRequest, EmbeddingResponse};
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// External service that turns text into vectors (OpenAI, Cohere, a local model...)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate embeddings for the given input
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError>;

    fn provider_name(&self) -> &'static str;

    fn default_model(&self) -> &'static str;

    /// Output size of `model`, when known
    fn dimensions(&self, model: &str) -> Option<usize>;
}
