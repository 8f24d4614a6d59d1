//! Score-gated retrieval

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::domain::vector_store::{Document, DocumentFilter, ScoredDocument, VectorStore};
use crate::domain::DomainError;

/// Limits applied by a [`ScoreThresholdRetriever`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrieverConfig {
    /// Hits scoring strictly below this are dropped
    pub min_similarity_score: f32,

    /// Upper bound on returned hits
    pub max_k: usize,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            min_similarity_score: 0.2,
            max_k: 1,
        }
    }
}

impl RetrieverConfig {
    pub fn new(min_similarity_score: f32, max_k: usize) -> Self {
        Self {
            min_similarity_score,
            max_k,
        }
    }

    pub fn with_min_similarity_score(mut self, score: f32) -> Self {
        self.min_similarity_score = score;
        self
    }

    pub fn with_max_k(mut self, max_k: usize) -> Self {
        self.max_k = max_k;
        self
    }
}

/// Runs a top-`max_k` similarity search and keeps only hits scoring at least
/// `min_similarity_score`. An empty result is a miss, not an error.
pub struct ScoreThresholdRetriever {
    store: Arc<dyn VectorStore>,
    config: RetrieverConfig,
    filter: Option<Arc<DocumentFilter>>,
}

impl fmt::Debug for ScoreThresholdRetriever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreThresholdRetriever")
            .field("store", &self.store)
            .field("config", &self.config)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

impl ScoreThresholdRetriever {
    pub fn from_vector_store(store: Arc<dyn VectorStore>, config: RetrieverConfig) -> Self {
        Self {
            store,
            config,
            filter: None,
        }
    }

    /// Restrict candidates to documents passing `filter`
    pub fn with_filter(mut self, filter: Arc<DocumentFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Embed `query` and return the documents clearing the threshold
    pub async fn retrieve(&self, query: &str) -> Result<Vec<Document>, DomainError> {
        let hits = self.retrieve_with_scores(query).await?;
        Ok(hits.into_iter().map(|hit| hit.document).collect())
    }

    /// Same as [`retrieve`](Self::retrieve), keeping each hit's score
    pub async fn retrieve_with_scores(
        &self,
        query: &str,
    ) -> Result<Vec<ScoredDocument>, DomainError> {
        let embedding = self.store.embedder().embed_query(query).await?;
        self.retrieve_by_vector(&embedding).await
    }

    /// Threshold-gated search for callers that already hold the query embedding
    pub async fn retrieve_by_vector(
        &self,
        embedding: &[f32],
    ) -> Result<Vec<ScoredDocument>, DomainError> {
        let hits = self
            .store
            .similarity_search_vector_with_score(
                embedding,
                self.config.max_k,
                self.filter.as_deref(),
            )
            .await?;
        let candidates = hits.len();

        let kept: Vec<ScoredDocument> = hits
            .into_iter()
            .filter(|hit| hit.score >= self.config.min_similarity_score)
            .collect();

        debug!(
            candidates,
            kept = kept.len(),
            min_similarity_score = self.config.min_similarity_score,
            "Threshold retrieval finished"
        );

        Ok(kept)
    }
}
