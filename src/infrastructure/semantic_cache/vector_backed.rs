//! Semantic cache with one vector store per namespace

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::domain::embedding::{Embedder, EmbeddingProvider};
use crate::domain::retriever::ScoreThresholdRetriever;
use crate::domain::semantic_cache::{
    decode_generations, encode_generations, namespace_id, Generation, SemanticCache,
    SemanticCacheConfig, SemanticCacheStats, METADATA_CACHE_KEY, METADATA_PROMPT,
    METADATA_RETURN_VALUE,
};
use crate::domain::vector_store::{
    Document, Metadata, VectorRecord, VectorStore, VectorStoreFactory,
};
use crate::domain::DomainError;
use crate::infrastructure::vector_store::InMemoryVectorStoreFactory;

/// Semantic cache partitioned by hashed caller key
///
/// Namespace stores are created on the first update (or an explicit
/// [`ensure_namespace`](Self::ensure_namespace)) and dropped whole on clear.
/// The prompt is embedded before the namespace map is locked; the lock is
/// then held for the rest of the operation, so a concurrent clear can never
/// leave an update writing into a store that is no longer reachable.
#[derive(Debug)]
pub struct VectorStoreSemanticCache {
    factory: Arc<dyn VectorStoreFactory>,
    config: SemanticCacheConfig,
    namespaces: RwLock<HashMap<String, Arc<dyn VectorStore>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl VectorStoreSemanticCache {
    pub fn new(factory: Arc<dyn VectorStoreFactory>, config: SemanticCacheConfig) -> Self {
        Self {
            factory,
            config,
            namespaces: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cache backed by in-memory stores scoring with cosine similarity
    pub fn in_memory(embedder: Embedder, config: SemanticCacheConfig) -> Self {
        Self::new(Arc::new(InMemoryVectorStoreFactory::new(embedder)), config)
    }

    /// In-memory cache wired from the embedding and semantic_cache sections
    pub fn from_config(provider: Arc<dyn EmbeddingProvider>, config: &AppConfig) -> Self {
        let embedder = Embedder::from_settings(provider, &config.embedding);
        Self::in_memory(embedder, config.semantic_cache.clone())
    }

    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    /// Namespace id derived from a caller key
    pub fn namespace_id(&self, key: &str) -> String {
        namespace_id(&self.config.namespace_prefix, key)
    }

    /// Return the store for `key`, creating an empty one if absent
    pub async fn ensure_namespace(&self, key: &str) -> Arc<dyn VectorStore> {
        let id = self.namespace_id(key);
        let mut namespaces = self.namespaces.write().await;

        Self::store_for(&mut namespaces, &id, self.factory.as_ref())
    }

    pub async fn has_namespace(&self, key: &str) -> bool {
        let id = self.namespace_id(key);
        self.namespaces.read().await.contains_key(&id)
    }

    pub async fn namespace_count(&self) -> usize {
        self.namespaces.read().await.len()
    }

    fn store_for(
        namespaces: &mut HashMap<String, Arc<dyn VectorStore>>,
        id: &str,
        factory: &dyn VectorStoreFactory,
    ) -> Arc<dyn VectorStore> {
        namespaces
            .entry(id.to_string())
            .or_insert_with(|| {
                debug!(namespace = %id, "Creating semantic cache namespace");
                factory.create()
            })
            .clone()
    }

    fn record_miss(&self, namespace: &str) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(namespace = %namespace, "Semantic cache miss");
    }

    fn decode_hit(document: &Document) -> Result<Vec<Generation>, DomainError> {
        let payload = document
            .metadata_str(METADATA_RETURN_VALUE)
            .ok_or_else(|| {
                DomainError::decoding(
                    format!("Cached entry has no string `{}` field", METADATA_RETURN_VALUE),
                    serde_json::to_string(&document.metadata).unwrap_or_default(),
                )
            })?;

        decode_generations(payload)
    }
}

#[async_trait]
impl SemanticCache for VectorStoreSemanticCache {
    async fn lookup(
        &self,
        prompt: &str,
        key: &str,
    ) -> Result<Option<Vec<Generation>>, DomainError> {
        let id = self.namespace_id(key);

        // No namespace means no entries; skip the embedding call
        if !self.namespaces.read().await.contains_key(&id) {
            self.record_miss(&id);
            return Ok(None);
        }

        let embedding = self.factory.embedder().embed_query(prompt).await?;

        let namespaces = self.namespaces.read().await;
        let Some(store) = namespaces.get(&id) else {
            self.record_miss(&id);
            return Ok(None);
        };

        let retriever = ScoreThresholdRetriever::from_vector_store(
            store.clone(),
            self.config.retriever_config(),
        );
        let hits = retriever.retrieve_by_vector(&embedding).await?;

        let mut generations = Vec::new();
        for hit in &hits {
            let decoded = Self::decode_hit(&hit.document).inspect_err(|e| {
                warn!(namespace = %id, error = %e, "Failed to decode cached generations");
            })?;
            generations.extend(decoded);
        }

        if generations.is_empty() {
            self.record_miss(&id);
            return Ok(None);
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        debug!(
            namespace = %id,
            similarity = hits.first().map(|h| h.score).unwrap_or_default(),
            generations = generations.len(),
            "Semantic cache hit"
        );

        Ok(Some(generations))
    }

    async fn update(
        &self,
        prompt: &str,
        key: &str,
        value: &[Generation],
    ) -> Result<(), DomainError> {
        let id = self.namespace_id(key);
        let payload = encode_generations(value)?;
        let embedding = self.factory.embedder().embed_query(prompt).await?;

        let mut metadata = Metadata::new();
        metadata.insert(METADATA_CACHE_KEY.to_string(), key.into());
        metadata.insert(METADATA_PROMPT.to_string(), prompt.into());
        metadata.insert(METADATA_RETURN_VALUE.to_string(), payload.into());

        let mut namespaces = self.namespaces.write().await;
        let store = Self::store_for(&mut namespaces, &id, self.factory.as_ref());
        store
            .add_vectors(vec![VectorRecord::new(prompt, embedding, metadata)])
            .await?;

        debug!(namespace = %id, generations = value.len(), "Cached generations");

        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), DomainError> {
        let id = self.namespace_id(key);
        let mut namespaces = self.namespaces.write().await;

        if let Some(store) = namespaces.remove(&id) {
            store.clear().await?;
            debug!(namespace = %id, "Cleared semantic cache namespace");
        }

        Ok(())
    }

    async fn stats(&self) -> Result<SemanticCacheStats, DomainError> {
        let namespaces = self.namespaces.read().await;

        let mut total_entries = 0;
        for store in namespaces.values() {
            total_entries += store.len().await?;
        }

        Ok(SemanticCacheStats {
            namespaces: namespaces.len(),
            total_entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::StubEmbeddingProvider;
    use serde_json::json;

    const JFK_PROMPT: &str = "Who killed John F. Kennedy?";

    fn cache_with(
        provider: StubEmbeddingProvider,
        config: SemanticCacheConfig,
    ) -> VectorStoreSemanticCache {
        let embedder = Embedder::new(Arc::new(provider), "mock-embedding");
        VectorStoreSemanticCache::in_memory(embedder, config)
    }

    fn cache() -> VectorStoreSemanticCache {
        cache_with(
            StubEmbeddingProvider::new("mock", 64),
            SemanticCacheConfig::new().with_score_threshold(0.9),
        )
    }

    #[tokio::test]
    async fn test_update_then_lookup_same_prompt() {
        let cache = cache();

        cache
            .update(JFK_PROMPT, "llm:key", &[Generation::new("Lee Harvey Oswald")])
            .await
            .unwrap();

        let cached = cache.lookup(JFK_PROMPT, "llm:key").await.unwrap();

        assert_eq!(cached, Some(vec![Generation::new("Lee Harvey Oswald")]));
    }

    #[tokio::test]
    async fn test_lookup_returns_text_only() {
        let cache = cache();
        let mut info = serde_json::Map::new();
        info.insert("finish_reason".into(), json!("stop"));

        cache
            .update("p", "k", &[Generation::new("X").with_generation_info(info)])
            .await
            .unwrap();

        let cached = cache.lookup("p", "k").await.unwrap().unwrap();

        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].text, "X");
        assert!(cached[0].generation_info.is_none());
    }

    #[tokio::test]
    async fn test_clear_then_lookup_misses() {
        let cache = cache();
        cache
            .update("prompt test 1", "llm:key", &[Generation::new("one")])
            .await
            .unwrap();
        assert!(cache.has_namespace("llm:key").await);

        cache.clear("llm:key").await.unwrap();

        assert!(!cache.has_namespace("llm:key").await);
        assert_eq!(cache.lookup("prompt test 1", "llm:key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_does_not_reuse_old_store() {
        let cache = cache();
        let old = cache.ensure_namespace("k").await;
        cache.update("p", "k", &[Generation::new("v")]).await.unwrap();
        assert_eq!(old.len().await.unwrap(), 1);

        cache.clear("k").await.unwrap();
        cache.update("p2", "k", &[Generation::new("w")]).await.unwrap();

        let fresh = cache.ensure_namespace("k").await;
        assert!(!Arc::ptr_eq(&old, &fresh));
        assert_eq!(old.len().await.unwrap(), 0);
        assert_eq!(fresh.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_clear_unknown_namespace_is_noop() {
        let cache = cache();

        cache.clear("never-used").await.unwrap();

        assert_eq!(cache.namespace_count().await, 0);
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let cache = cache();
        cache
            .update(JFK_PROMPT, "model-a", &[Generation::new("answer a")])
            .await
            .unwrap();

        assert_eq!(cache.lookup(JFK_PROMPT, "model-b").await.unwrap(), None);

        cache
            .update(JFK_PROMPT, "model-b", &[Generation::new("answer b")])
            .await
            .unwrap();

        assert_eq!(
            cache.lookup(JFK_PROMPT, "model-a").await.unwrap(),
            Some(vec![Generation::new("answer a")])
        );
        assert_eq!(
            cache.lookup(JFK_PROMPT, "model-b").await.unwrap(),
            Some(vec![Generation::new("answer b")])
        );
    }

    #[tokio::test]
    async fn test_lookup_on_absent_namespace_creates_nothing() {
        let provider = Arc::new(StubEmbeddingProvider::new("mock", 8));
        let cache = VectorStoreSemanticCache::in_memory(
            Embedder::new(provider.clone(), "mock-embedding"),
            SemanticCacheConfig::default(),
        );

        assert_eq!(cache.lookup("anything", "k").await.unwrap(), None);

        assert!(!cache.has_namespace("k").await);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_dissimilar_prompt_misses() {
        let provider = StubEmbeddingProvider::new("mock", 2)
            .with_vector("cats", vec![1.0, 0.0])
            .with_vector("dogs", vec![0.0, 1.0]);
        let cache = cache_with(provider, SemanticCacheConfig::new().with_score_threshold(0.5));

        cache.update("cats", "k", &[Generation::new("meow")]).await.unwrap();

        assert_eq!(cache.lookup("dogs", "k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_similar_prompt_hits() {
        let provider = StubEmbeddingProvider::new("mock", 2)
            .with_vector("capital of France?", vec![1.0, 0.1])
            .with_vector("what is the capital of France", vec![1.0, 0.15]);
        let cache = cache_with(provider, SemanticCacheConfig::new().with_score_threshold(0.95));

        cache
            .update("capital of France?", "k", &[Generation::new("Paris")])
            .await
            .unwrap();

        assert_eq!(
            cache
                .lookup("what is the capital of France", "k")
                .await
                .unwrap(),
            Some(vec![Generation::new("Paris")])
        );
    }

    #[tokio::test]
    async fn test_max_k_concatenates_matches() {
        let provider = StubEmbeddingProvider::new("mock", 2)
            .with_vector("q1", vec![1.0, 0.0])
            .with_vector("q2", vec![1.0, 0.05]);
        let cache = cache_with(
            provider,
            SemanticCacheConfig::new().with_score_threshold(0.9).with_max_k(2),
        );

        cache.update("q1", "k", &[Generation::new("a")]).await.unwrap();
        cache
            .update("q2", "k", &[Generation::new("b"), Generation::new("c")])
            .await
            .unwrap();

        let cached = cache.lookup("q1", "k").await.unwrap().unwrap();
        let texts: Vec<&str> = cached.iter().map(|g| g.text.as_str()).collect();

        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_empty_value_collapses_to_none() {
        let cache = cache();

        cache.update("p", "k", &[]).await.unwrap();

        assert!(cache.has_namespace("k").await);
        assert_eq!(cache.lookup("p", "k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_malformed_payload_fails_lookup() {
        let cache = cache();
        let store = cache.ensure_namespace("k").await;
        let embedding = store.embedder().embed_query("p").await.unwrap();

        let mut metadata = Metadata::new();
        metadata.insert(METADATA_RETURN_VALUE.to_string(), json!(r#"[{"text":7}]"#));
        store
            .add_vectors(vec![VectorRecord::new("p", embedding, metadata)])
            .await
            .unwrap();

        let result = cache.lookup("p", "k").await;

        match result {
            Err(DomainError::Decoding { payload, .. }) => assert_eq!(payload, r#"[{"text":7}]"#),
            other => panic!("expected decoding error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_payload_field_fails_lookup() {
        let cache = cache();
        let store = cache.ensure_namespace("k").await;
        let embedding = store.embedder().embed_query("p").await.unwrap();
        store
            .add_vectors(vec![VectorRecord::new("p", embedding, Metadata::new())])
            .await
            .unwrap();

        assert!(matches!(
            cache.lookup("p", "k").await,
            Err(DomainError::Decoding { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_stores_packed_metadata() {
        let cache = cache();
        cache
            .update(JFK_PROMPT, "llm:key", &[Generation::new("Lee Harvey Oswald")])
            .await
            .unwrap();

        let store = cache.ensure_namespace("llm:key").await;
        let records = store.scan(None).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].content(), JFK_PROMPT);
        assert_eq!(records[0].metadata().get(METADATA_CACHE_KEY), Some(&json!("llm:key")));
        assert_eq!(records[0].metadata().get(METADATA_PROMPT), Some(&json!(JFK_PROMPT)));
        assert_eq!(
            records[0].metadata().get(METADATA_RETURN_VALUE),
            Some(&json!(r#"[{"text":"Lee Harvey Oswald"}]"#))
        );
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates_from_update() {
        let cache = cache_with(
            StubEmbeddingProvider::new("mock", 8).with_error("connection refused"),
            SemanticCacheConfig::default(),
        );

        let result = cache.update("p", "k", &[Generation::new("v")]).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
        assert!(!cache.has_namespace("k").await);
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates_from_lookup() {
        let cache = cache_with(
            StubEmbeddingProvider::new("mock", 8).with_error("connection refused"),
            SemanticCacheConfig::default(),
        );
        cache.ensure_namespace("k").await;

        let result = cache.lookup("p", "k").await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_stats() {
        let cache = cache();
        cache.update("p", "a", &[Generation::new("1")]).await.unwrap();
        cache.update("q", "a", &[Generation::new("2")]).await.unwrap();
        cache.update("p", "b", &[Generation::new("3")]).await.unwrap();

        cache.lookup("p", "a").await.unwrap();
        cache.lookup("p", "missing").await.unwrap();

        let stats = cache.stats().await.unwrap();

        assert_eq!(stats.namespaces, 2);
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_namespace_id_uses_configured_prefix() {
        let cache = cache_with(
            StubEmbeddingProvider::new("mock", 8),
            SemanticCacheConfig::new().with_namespace_prefix("llm"),
        );

        assert!(cache.namespace_id("gpt-4").starts_with("llm:"));
        assert_eq!(cache.namespace_id("gpt-4"), cache.namespace_id("gpt-4"));
        assert_ne!(cache.namespace_id("gpt-4"), cache.namespace_id("gpt-3.5"));
    }

    #[tokio::test]
    async fn test_from_config_uses_embedding_and_cache_sections() {
        let config = AppConfig::from_toml_str(
            r#"
            [embedding]
            model = "text-embedding-3-large"

            [semantic_cache]
            score_threshold = 0.5
            namespace_prefix = "llm"
            "#,
        )
        .unwrap();
        let provider = StubEmbeddingProvider::new("mock", 2)
            .with_vector("cats", vec![1.0, 0.0])
            .with_vector("kittens", vec![0.8, 0.6]);

        let cache = VectorStoreSemanticCache::from_config(Arc::new(provider), &config);
        cache.update("cats", "k", &[Generation::new("meow")]).await.unwrap();

        assert!(cache.namespace_id("k").starts_with("llm:"));
        assert_eq!(cache.config().retriever_config().min_similarity_score, 0.5);
        assert_eq!(
            cache.ensure_namespace("k").await.embedder().model(),
            "text-embedding-3-large"
        );
        // cosine 0.8 clears the configured 0.5 threshold
        assert_eq!(
            cache.lookup("kittens", "k").await.unwrap(),
            Some(vec![Generation::new("meow")])
        );
    }
}
