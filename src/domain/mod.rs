//! Domain layer - Core contracts and algorithms

pub mod embedding;
pub mod error;
pub mod retriever;
pub mod semantic_cache;
pub mod similarity;
pub mod vector_store;

pub use embedding::{Embedder, EmbeddingProvider};
pub use error::DomainError;
pub use retriever::{RetrieverConfig, ScoreThresholdRetriever};
pub use semantic_cache::{Generation, SemanticCache, SemanticCacheConfig, SemanticCacheStats};
pub use similarity::{
    CosineSimilarity, DotProduct, EuclideanSimilarity, FnSimilarity, SimilarityFunction,
};
pub use vector_store::{
    Document, DocumentFilter, Metadata, ScoredDocument, VectorRecord, VectorStore,
    VectorStoreFactory,
};
