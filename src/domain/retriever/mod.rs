//! Retrievers built on top of a vector store

mod threshold;

pub use threshold::{RetrieverConfig, ScoreThresholdRetriever};
