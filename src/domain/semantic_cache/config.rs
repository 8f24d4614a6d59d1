//! Semantic cache configuration

use serde::{Deserialize, Serialize};

use crate::domain::retriever::RetrieverConfig;

/// Configuration for the namespace-partitioned semantic cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Minimum similarity for a hit; `None` falls back to the retriever default.
    /// Values outside `[0, 1]` are clamped when lookups are configured.
    #[serde(default)]
    pub score_threshold: Option<f32>,

    /// Maximum number of matched entries merged into one lookup result
    #[serde(default = "default_max_k")]
    pub max_k: usize,

    /// Prefix of every derived namespace id
    #[serde(default = "default_namespace_prefix")]
    pub namespace_prefix: String,
}

fn default_max_k() -> usize {
    1
}

fn default_namespace_prefix() -> String {
    "cache".to_string()
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            score_threshold: None,
            max_k: default_max_k(),
            namespace_prefix: default_namespace_prefix(),
        }
    }
}

impl SemanticCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_score_threshold(mut self, threshold: f32) -> Self {
        self.score_threshold = Some(threshold);
        self
    }

    pub fn with_max_k(mut self, max_k: usize) -> Self {
        self.max_k = max_k;
        self
    }

    pub fn with_namespace_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.namespace_prefix = prefix.into();
        self
    }

    /// Retriever limits used for every namespace lookup
    pub fn retriever_config(&self) -> RetrieverConfig {
        let threshold = self
            .score_threshold
            .map(|t| t.clamp(0.0, 1.0))
            .unwrap_or(RetrieverConfig::default().min_similarity_score);

        RetrieverConfig::new(threshold, self.max_k)
    }
}
