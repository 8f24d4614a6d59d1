//! Embedding request types

use serde::{Deserialize, Serialize};

/// Text(s) to embed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmbeddingInput {
    /// A single query text
    Single(String),
    /// A batch of document texts, embedded in one provider call
    Batch(Vec<String>),
}

impl EmbeddingInput {
    /// Borrow every text, in request order
    pub fn as_vec(&self) -> Vec<&str> {
        match self {
            EmbeddingInput::Single(s) => vec![s.as_str()],
            EmbeddingInput::Batch(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

/// Request to generate embeddings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    model: String,
    input: EmbeddingInput,
}

impl EmbeddingRequest {
    /// Request `input` from `model`
    pub fn new(model: impl Into<String>, input: EmbeddingInput) -> Self {
        Self {
            model: model.into(),
            input,
        }
    }

    /// Request for one query text
    pub fn single(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(model, EmbeddingInput::Single(text.into()))
    }

    /// Request for a batch of document texts
    pub fn batch(model: impl Into<String>, texts: Vec<String>) -> Self {
        Self::new(model, EmbeddingInput::Batch(texts))
    }

    /// Model the provider should embed with
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Texts to embed, in request order
    pub fn inputs(&self) -> Vec<&str> {
        self.input.as_vec()
    }
}
