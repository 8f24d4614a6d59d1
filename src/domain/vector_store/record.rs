//! Stored records and the document view exposed to callers and filters

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Free-form per-record metadata
pub type Metadata = HashMap<String, serde_json::Value>;

/// Predicate applied to the document view of a record during scans and searches
pub type DocumentFilter = dyn Fn(&Document) -> bool + Send + Sync;

/// Text plus metadata, without the embedding
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Metadata value as a string slice, if present and textual
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(serde_json::Value::as_str)
    }
}

/// One stored (content, embedding, metadata) triple
///
/// Records are never mutated once appended to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    content: String,
    embedding: Vec<f32>,
    #[serde(default)]
    metadata: Metadata,
}

impl VectorRecord {
    pub fn new(content: impl Into<String>, embedding: Vec<f32>, metadata: Metadata) -> Self {
        Self {
            content: content.into(),
            embedding,
            metadata,
        }
    }

    pub fn from_document(document: Document, embedding: Vec<f32>) -> Self {
        Self::new(document.page_content, embedding, document.metadata)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn embedding(&self) -> &[f32] {
        &self.embedding
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }

    /// Rebuild the caller-facing view; the embedding is left behind
    pub fn to_document(&self) -> Document {
        Document {
            page_content: self.content.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

/// A document returned from a similarity search along with its score
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

impl ScoredDocument {
    pub fn new(document: Document, score: f32) -> Self {
        Self { document, score }
    }
}
