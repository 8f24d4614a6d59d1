//! Semantic cache domain models and traits
//!
//! Matches semantically similar prompts rather than requiring exact key
//! matches. Each caller key gets its own isolated vector store.

mod config;
mod namespace;
mod payload;
mod repository;

pub use config::SemanticCacheConfig;
pub use namespace::namespace_id;
pub use payload::{decode_generations, encode_generations, Generation};
pub use repository::{
    SemanticCache, SemanticCacheStats, METADATA_CACHE_KEY, METADATA_PROMPT,
    METADATA_RETURN_VALUE,
};
