//! Semantic cache implementations

mod vector_backed;

pub use vector_backed::VectorStoreSemanticCache;
