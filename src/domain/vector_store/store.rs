//! Vector store trait and factory

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use super::{Document, DocumentFilter, Metadata, ScoredDocument, VectorRecord};
use crate::domain::embedding::Embedder;
use crate::domain::DomainError;

/// Produces metadata for the `i`-th text of a batch
pub type MetadataFn = dyn Fn(usize) -> Metadata + Send + Sync;

/// Store of embedded records searchable by similarity
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Embedder used for text queries and text/document inserts
    fn embedder(&self) -> &Embedder;

    /// Append pre-embedded records
    async fn add_vectors(&self, records: Vec<VectorRecord>) -> Result<(), DomainError>;

    /// Embed `texts` in one batch and append them, tagging each with `metadata_for(i)`
    async fn add_texts(
        &self,
        texts: Vec<String>,
        metadata_for: &MetadataFn,
    ) -> Result<(), DomainError> {
        let embeddings = self.embedder().embed_documents(&texts).await?;

        let records = texts
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (text, embedding))| VectorRecord::new(text, embedding, metadata_for(i)))
            .collect();

        self.add_vectors(records).await
    }

    /// Embed the documents' content in one batch and append them
    async fn add_documents(&self, documents: Vec<Document>) -> Result<(), DomainError> {
        let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
        let embeddings = self.embedder().embed_documents(&texts).await?;

        let records = documents
            .into_iter()
            .zip(embeddings)
            .map(|(document, embedding)| VectorRecord::from_document(document, embedding))
            .collect();

        self.add_vectors(records).await
    }

    /// Every record whose document view passes `filter`, in insertion order
    async fn scan(&self, filter: Option<&DocumentFilter>) -> Result<Vec<VectorRecord>, DomainError>;

    /// Top `k` records by similarity to `query`, highest first
    async fn similarity_search_vector_with_score(
        &self,
        query: &[f32],
        k: usize,
        filter: Option<&DocumentFilter>,
    ) -> Result<Vec<ScoredDocument>, DomainError>;

    /// Embed `query` and return the top `k` matches with their scores
    async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
        filter: Option<&DocumentFilter>,
    ) -> Result<Vec<ScoredDocument>, DomainError> {
        let embedding = self.embedder().embed_query(query).await?;
        self.similarity_search_vector_with_score(&embedding, k, filter)
            .await
    }

    /// Embed `query` and return the top `k` matching documents
    async fn similarity_search(
        &self,
        query: &str,
        k: usize,
        filter: Option<&DocumentFilter>,
    ) -> Result<Vec<Document>, DomainError> {
        let results = self.similarity_search_with_score(query, k, filter).await?;
        Ok(results.into_iter().map(|r| r.document).collect())
    }

    /// Relevance-and-diversity search: take the `fetch_k` best matches, then
    /// greedily keep `k` of them trading similarity to the query (`lambda` = 1)
    /// against similarity to already kept results (`lambda` = 0).
    async fn max_marginal_relevance_search(
        &self,
        query: &str,
        k: usize,
        fetch_k: usize,
        lambda: f32,
        filter: Option<&DocumentFilter>,
    ) -> Result<Vec<Document>, DomainError>;

    /// Drop every record
    async fn clear(&self) -> Result<(), DomainError>;

    async fn len(&self) -> Result<usize, DomainError>;

    async fn is_empty(&self) -> Result<bool, DomainError> {
        Ok(self.len().await? == 0)
    }
}

/// Creates fresh, empty stores sharing one embedder and scoring function
pub trait VectorStoreFactory: Send + Sync + Debug {
    fn create(&self) -> Arc<dyn VectorStore>;

    /// Embedder handed to every created store
    fn embedder(&self) -> &Embedder;
}
