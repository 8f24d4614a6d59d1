//! Semantic Vector Cache
//!
//! In-memory vector similarity search with a semantic LLM response cache on top:
//! - Brute-force ranking over embedded records with pluggable similarity functions
//! - Score-threshold retrieval
//! - Per-namespace caching of generations keyed by prompt similarity

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    Document, DomainError, Embedder, EmbeddingProvider, Generation, RetrieverConfig,
    ScoreThresholdRetriever, SemanticCache, SemanticCacheConfig, SemanticCacheStats,
    SimilarityFunction, VectorStore,
};
pub use infrastructure::logging::{init_logging, try_init_logging};
pub use infrastructure::semantic_cache::VectorStoreSemanticCache;
pub use infrastructure::vector_store::{InMemoryVectorStore, InMemoryVectorStoreFactory};
