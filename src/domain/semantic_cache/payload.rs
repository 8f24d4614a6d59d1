//! Cached generation payload codec
//!
//! Payloads are JSON arrays of `{"text": ...}` objects. Encoding keeps only
//! the text of each generation; decoding ignores extra fields but rejects
//! the whole payload if any entry lacks a string `text`.

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// One generated output stored in the cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,

    /// Provider-specific extras (finish reason, logprobs...), never cached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_info: Option<serde_json::Map<String, serde_json::Value>>,
}

impl Generation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            generation_info: None,
        }
    }

    pub fn with_generation_info(
        mut self,
        info: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        self.generation_info = Some(info);
        self
    }
}

#[derive(Serialize)]
struct StoredGeneration<'a> {
    text: &'a str,
}

/// Serialize generations, dropping everything but their text
pub fn encode_generations(generations: &[Generation]) -> Result<String, DomainError> {
    let stored: Vec<StoredGeneration<'_>> = generations
        .iter()
        .map(|g| StoredGeneration { text: &g.text })
        .collect();

    serde_json::to_string(&stored)
        .map_err(|e| DomainError::internal(format!("Failed to serialize generations: {}", e)))
}

/// Parse a stored payload back into generations
pub fn decode_generations(payload: &str) -> Result<Vec<Generation>, DomainError> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| DomainError::decoding(format!("Invalid JSON: {}", e), payload))?;

    let entries = value
        .as_array()
        .ok_or_else(|| DomainError::decoding("Expected a JSON array", payload))?;

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            entry
                .get("text")
                .and_then(serde_json::Value::as_str)
                .map(Generation::new)
                .ok_or_else(|| {
                    DomainError::decoding(
                        format!("Entry {} has no string `text` field", i),
                        payload,
                    )
                })
        })
        .collect()
}
