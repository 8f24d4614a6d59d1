//! In-memory vector store using linear search

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::embedding::Embedder;
use crate::domain::similarity::{default_similarity, SimilarityFunction};
use crate::domain::vector_store::{
    maximal_marginal_relevance, rank_by_similarity, Document, DocumentFilter, Metadata,
    ScoredDocument, VectorRecord, VectorStore, VectorStoreFactory,
};
use crate::domain::DomainError;

/// Append-only in-memory vector store
///
/// Every search scores every record. The scoring function is fixed at
/// construction.
#[derive(Debug)]
pub struct InMemoryVectorStore {
    embedder: Embedder,
    similarity: Arc<dyn SimilarityFunction>,
    records: RwLock<Vec<VectorRecord>>,
}

impl InMemoryVectorStore {
    /// Create an empty store scoring with cosine similarity
    pub fn new(embedder: Embedder) -> Self {
        Self::with_similarity(embedder, default_similarity())
    }

    /// Create an empty store with a custom scoring function
    pub fn with_similarity(embedder: Embedder, similarity: Arc<dyn SimilarityFunction>) -> Self {
        Self {
            embedder,
            similarity,
            records: RwLock::new(Vec::new()),
        }
    }

    /// Build a store from raw texts; `metadatas[i]` tags `texts[i]` when present
    pub async fn from_texts(
        texts: Vec<String>,
        metadatas: Vec<Metadata>,
        embedder: Embedder,
    ) -> Result<Self, DomainError> {
        let store = Self::new(embedder);
        let metadata_for = move |i: usize| metadatas.get(i).cloned().unwrap_or_default();
        store.add_texts(texts, &metadata_for).await?;
        Ok(store)
    }

    /// Build a store from documents
    pub async fn from_documents(
        documents: Vec<Document>,
        embedder: Embedder,
    ) -> Result<Self, DomainError> {
        let store = Self::new(embedder);
        store.add_documents(documents).await?;
        Ok(store)
    }

    pub fn similarity(&self) -> &Arc<dyn SimilarityFunction> {
        &self.similarity
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn embedder(&self) -> &Embedder {
        &self.embedder
    }

    async fn add_vectors(&self, records: Vec<VectorRecord>) -> Result<(), DomainError> {
        let mut stored = self.records.write().await;
        stored.extend(records);

        debug!(total = stored.len(), "Appended vectors");

        Ok(())
    }

    async fn scan(
        &self,
        filter: Option<&DocumentFilter>,
    ) -> Result<Vec<VectorRecord>, DomainError> {
        let records = self.records.read().await;

        Ok(records
            .iter()
            .filter(|record| filter.is_none_or(|f| f(&record.to_document())))
            .cloned()
            .collect())
    }

    async fn similarity_search_vector_with_score(
        &self,
        query: &[f32],
        k: usize,
        filter: Option<&DocumentFilter>,
    ) -> Result<Vec<ScoredDocument>, DomainError> {
        let records = self.records.read().await;
        let ranked = rank_by_similarity(&records, query, k, filter, self.similarity.as_ref())?;

        Ok(ranked
            .into_iter()
            .map(|(index, score)| ScoredDocument::new(records[index].to_document(), score))
            .collect())
    }

    async fn max_marginal_relevance_search(
        &self,
        query: &str,
        k: usize,
        fetch_k: usize,
        lambda: f32,
        filter: Option<&DocumentFilter>,
    ) -> Result<Vec<Document>, DomainError> {
        let embedding = self.embedder.embed_query(query).await?;

        let records = self.records.read().await;
        let ranked = rank_by_similarity(
            &records,
            &embedding,
            fetch_k,
            filter,
            self.similarity.as_ref(),
        )?;

        let candidates: Vec<&[f32]> = ranked
            .iter()
            .map(|(index, _)| records[*index].embedding())
            .collect();
        let picked = maximal_marginal_relevance(
            &embedding,
            &candidates,
            k,
            lambda,
            self.similarity.as_ref(),
        );

        Ok(picked
            .into_iter()
            .map(|i| records[ranked[i].0].to_document())
            .collect())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.records.write().await.clear();
        Ok(())
    }

    async fn len(&self) -> Result<usize, DomainError> {
        Ok(self.records.read().await.len())
    }
}

/// Creates [`InMemoryVectorStore`]s sharing one embedder and scoring function
#[derive(Debug, Clone)]
pub struct InMemoryVectorStoreFactory {
    embedder: Embedder,
    similarity: Arc<dyn SimilarityFunction>,
}

impl InMemoryVectorStoreFactory {
    pub fn new(embedder: Embedder) -> Self {
        Self::with_similarity(embedder, default_similarity())
    }

    pub fn with_similarity(embedder: Embedder, similarity: Arc<dyn SimilarityFunction>) -> Self {
        Self {
            embedder,
            similarity,
        }
    }
}

impl VectorStoreFactory for InMemoryVectorStoreFactory {
    fn create(&self) -> Arc<dyn VectorStore> {
        Arc::new(InMemoryVectorStore::with_similarity(
            self.embedder.clone(),
            self.similarity.clone(),
        ))
    }

    fn embedder(&self) -> &Embedder {
        &self.embedder
    }
}
