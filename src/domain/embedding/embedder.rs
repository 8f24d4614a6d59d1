//! Document/query embedding facade over an [`EmbeddingProvider`]

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::{Embedding, EmbeddingProvider, EmbeddingRequest};
use crate::config::EmbeddingSettings;
use crate::domain::DomainError;

/// Binds a provider to a model name and exposes the two calls the vector
/// store needs: batch document embedding and single query embedding.
///
/// Provider failures are returned unchanged; there is no retry or fallback.
#[derive(Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    model: String,
}

impl fmt::Debug for Embedder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Embedder")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.model)
            .finish()
    }
}

impl Embedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Use the model named in the application's embedding settings
    pub fn from_settings(
        provider: Arc<dyn EmbeddingProvider>,
        settings: &EmbeddingSettings,
    ) -> Self {
        Self::new(provider, settings.model.as_str())
    }

    /// Use the provider's own default model
    pub fn with_default_model(provider: Arc<dyn EmbeddingProvider>) -> Self {
        let model = provider.default_model();
        Self::new(provider, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.provider_name()
    }

    /// Embed a batch of texts with a single provider call
    pub async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest::batch(&self.model, texts.to_vec());
        let response = self.provider.embed(request).await?;

        if response.embeddings().len() != texts.len() {
            return Err(DomainError::provider(
                self.provider.provider_name(),
                format!(
                    "Expected {} embeddings, provider returned {}",
                    texts.len(),
                    response.embeddings().len()
                ),
            ));
        }

        self.check_dimensions(response.embeddings())?;

        debug!(
            model = %response.model(),
            count = texts.len(),
            prompt_tokens = response.usage().prompt_tokens(),
            total_tokens = response.usage().total_tokens(),
            "Embedded document batch"
        );

        Ok(response.into_ordered_vectors())
    }

    /// Embed a single query text
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest::single(&self.model, text);
        let response = self.provider.embed(request).await?;

        let embedding = response.first().ok_or_else(|| {
            DomainError::provider(self.provider.provider_name(), "No embedding returned")
        })?;
        self.check_dimensions(std::slice::from_ref(embedding))?;

        Ok(embedding.vector().to_vec())
    }

    /// Every vector must have the size the provider reports for the model.
    /// Providers that don't know the size are trusted.
    fn check_dimensions(&self, embeddings: &[Embedding]) -> Result<(), DomainError> {
        let Some(expected) = self.provider.dimensions(&self.model) else {
            return Ok(());
        };

        match embeddings.iter().find(|e| e.dimensions() != expected) {
            Some(wrong) => Err(DomainError::dimension_mismatch(expected, wrong.dimensions())),
            None => Ok(()),
        }
    }
}
