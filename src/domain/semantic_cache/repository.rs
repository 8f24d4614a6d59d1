//! Semantic cache trait and types

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Generation;
use crate::domain::DomainError;

/// Metadata key holding the caller's namespace key
pub const METADATA_CACHE_KEY: &str = "cache_key";
/// Metadata key holding the original prompt
pub const METADATA_PROMPT: &str = "prompt";
/// Metadata key holding the encoded generations
pub const METADATA_RETURN_VALUE: &str = "return_val";

/// Statistics for the semantic cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticCacheStats {
    /// Namespaces currently holding a store
    pub namespaces: usize,
    /// Entries across all namespaces
    pub total_entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl SemanticCacheStats {
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;

        if total == 0 {
            return 0.0;
        }

        self.hits as f32 / total as f32
    }
}

/// Cache of generations keyed by prompt similarity within a namespace
///
/// A namespace is addressed by an arbitrary caller key (typically a model
/// identifier plus its settings) and is fully isolated from every other.
#[async_trait]
pub trait SemanticCache: Send + Sync + Debug {
    /// Generations cached for prompts similar enough to `prompt` under `key`,
    /// or `None` on a miss. A match whose payload decodes to nothing is also `None`.
    async fn lookup(
        &self,
        prompt: &str,
        key: &str,
    ) -> Result<Option<Vec<Generation>>, DomainError>;

    /// Cache `value` for `prompt` under `key`
    async fn update(
        &self,
        prompt: &str,
        key: &str,
        value: &[Generation],
    ) -> Result<(), DomainError>;

    /// Drop the namespace for `key` and everything in it
    async fn clear(&self, key: &str) -> Result<(), DomainError>;

    async fn stats(&self) -> Result<SemanticCacheStats, DomainError>;
}
