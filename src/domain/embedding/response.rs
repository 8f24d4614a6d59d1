//! Embedding response types

use serde::{Deserialize, Serialize};

/// One vector returned by a provider, tagged with its position in the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    index: usize,
    embedding: Vec<f32>,
}

impl Embedding {
    /// Vector computed for the input at `index`
    pub fn new(index: usize, embedding: Vec<f32>) -> Self {
        Self { index, embedding }
    }

    /// Position of the input text this vector was computed for
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw vector components
    pub fn vector(&self) -> &[f32] {
        &self.embedding
    }

    /// Number of components
    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }

    /// Take ownership of the raw vector
    pub fn into_vector(self) -> Vec<f32> {
        self.embedding
    }
}

/// Token accounting reported by the provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbeddingUsage {
    prompt_tokens: u32,
    total_tokens: u32,
}

impl EmbeddingUsage {
    /// Usage for one request
    pub fn new(prompt_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            total_tokens,
        }
    }

    /// Tokens consumed by the input texts
    pub fn prompt_tokens(&self) -> u32 {
        self.prompt_tokens
    }

    /// Tokens billed for the request
    pub fn total_tokens(&self) -> u32 {
        self.total_tokens
    }
}

/// Response from an embedding request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    model: String,
    data: Vec<Embedding>,
    usage: EmbeddingUsage,
}

impl EmbeddingResponse {
    /// Response carrying `data` produced by `model`
    pub fn new(model: String, data: Vec<Embedding>, usage: EmbeddingUsage) -> Self {
        Self { model, data, usage }
    }

    /// Model that produced the vectors
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Vectors in the order the provider returned them
    pub fn embeddings(&self) -> &[Embedding] {
        &self.data
    }

    /// First vector, for single-input requests
    pub fn first(&self) -> Option<&Embedding> {
        self.data.first()
    }

    /// Token accounting for the request
    pub fn usage(&self) -> &EmbeddingUsage {
        &self.usage
    }

    /// Consume the response, returning raw vectors ordered by input position
    pub fn into_ordered_vectors(self) -> Vec<Vec<f32>> {
        let mut data = self.data;
        data.sort_by_key(Embedding::index);
        data.into_iter().map(Embedding::into_vector).collect()
    }
}
